#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use rdkafka_conf::config::{
    Capabilities, ClientConfig, ConfigRegistry, Feature, InstanceKind, PropertyDescriptor,
    TopicConfig, ValueKind,
};
use rdkafka_conf::error::ConfigResult;

#[path = "utils/logging.rs"]
pub mod logging;

pub use self::logging::init_test_logger;

/// A registry without any optional capability.
pub fn bare_registry() -> Arc<ConfigRegistry> {
    Arc::new(ConfigRegistry::new(Capabilities::none()))
}

/// A registry with every optional capability.
pub fn full_registry() -> Arc<ConfigRegistry> {
    Arc::new(ConfigRegistry::new(Capabilities::all()))
}

/// A registry with transport security only.
pub fn ssl_registry() -> Arc<ConfigRegistry> {
    Arc::new(ConfigRegistry::new(Capabilities::none().with(Feature::Ssl)))
}

pub fn client_config(registry: Arc<ConfigRegistry>, overrides: HashMap<&str, &str>) -> ClientConfig {
    ClientConfig::from_pairs(registry, overrides).expect("Failed to build client config")
}

/// Sets a single property on a fresh configuration object of the given kind.
pub fn set_on(
    registry: &Arc<ConfigRegistry>,
    kind: InstanceKind,
    name: &str,
    value: &str,
) -> ConfigResult<()> {
    match kind {
        InstanceKind::Client => ClientConfig::with_registry(registry.clone())
            .set(name, value)
            .map(|_| ()),
        InstanceKind::Topic => TopicConfig::with_registry(registry.clone())
            .set(name, value)
            .map(|_| ()),
    }
}

pub fn other_kind(kind: InstanceKind) -> InstanceKind {
    match kind {
        InstanceKind::Client => InstanceKind::Topic,
        InstanceKind::Topic => InstanceKind::Client,
    }
}

/// A value the property accepts from text, or `None` if it cannot be set
/// from text at all.
pub fn sample_value(desc: &PropertyDescriptor) -> Option<String> {
    if desc.read_only {
        return None;
    }
    match desc.kind {
        ValueKind::Int { min, .. } => Some(min.to_string()),
        ValueKind::Bool => Some("true".to_string()),
        ValueKind::Enum(symbols) => symbols.first().map(|s| s.name.to_string()),
        ValueKind::Flags(symbols) => symbols.first().map(|s| s.to_string()),
        ValueKind::Str { .. } => Some("value".to_string()),
        ValueKind::Patterns => Some("^__.*".to_string()),
        ValueKind::Pointer | ValueKind::Alias(_) => None,
    }
}
