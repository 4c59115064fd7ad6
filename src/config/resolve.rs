//! Effective values of a topic configuration.
//!
//! A topic property marked as inheriting takes its value from the client
//! configuration the topic configuration was derived from when it was never
//! set on the topic, or when it holds the inherit sentinel. The resolved
//! view is computed on demand: it never writes back to the topic
//! configuration, and resolving again picks up later changes to the client.

use std::collections::HashMap;
use std::time::Duration;

use serde::ser::{Serialize, Serializer};

use crate::config::property::{InstanceKind, PropertyDescriptor};
use crate::config::registry::ConfigRegistry;
use crate::config::store::{ConfigSource, PropertyStore};
use crate::config::table::{AutoOffsetReset, CompressionCodec, OffsetStoreMethod};
use crate::config::value::{self, Value};

/// The effective value of one topic property.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ResolvedValue {
    /// Property name.
    #[serde(skip)]
    pub name: &'static str,
    /// Typed value.
    #[serde(skip)]
    pub value: Value,
    /// Canonical text of the value, redacted for secrets.
    #[serde(rename = "value")]
    pub text: String,
    /// Provenance of the value, on the client when inherited.
    pub source: ConfigSource,
    /// Whether the value comes from the client configuration.
    pub inherited: bool,
}

/// Read-only view of the effective values of a topic configuration.
#[derive(Clone, Debug)]
pub struct ResolvedTopicConfig {
    values: Vec<ResolvedValue>,
    index: HashMap<&'static str, usize>,
}

fn resolve_one(
    registry: &ConfigRegistry,
    desc: &'static PropertyDescriptor,
    topic: &PropertyStore,
    parent: Option<&PropertyStore>,
) -> Option<ResolvedValue> {
    let entry = topic.get(desc.name)?;
    let inherit = match desc.inherit {
        Some(inherit) => inherit,
        None => return Some(own_value(desc, &entry.value, entry.source)),
    };
    let at_sentinel = inherit.sentinel.is_some() && entry.value.as_int() == inherit.sentinel;
    if entry.source.is_explicit() && !at_sentinel {
        return Some(own_value(desc, &entry.value, entry.source));
    }
    let from = match registry.find(inherit.from, InstanceKind::Client) {
        Ok(from) => from,
        Err(_) => return Some(own_value(desc, &entry.value, entry.source)),
    };
    let (value, source) = match parent.and_then(|p| p.get(from.name)) {
        Some(parent_entry) => (parent_entry.value.clone(), parent_entry.source),
        None => (
            value::default_value(from, registry.capabilities()),
            ConfigSource::Default,
        ),
    };
    Some(ResolvedValue {
        name: desc.name,
        text: value::to_text(from, &value),
        value,
        source,
        inherited: true,
    })
}

fn own_value(desc: &'static PropertyDescriptor, value: &Value, source: ConfigSource) -> ResolvedValue {
    let text = if desc.sensitive && matches!(value, Value::Str(Some(_))) {
        super::REDACTED.to_string()
    } else {
        value::to_text(desc, value)
    };
    ResolvedValue {
        name: desc.name,
        value: value.clone(),
        text,
        source,
        inherited: false,
    }
}

impl ResolvedTopicConfig {
    pub(crate) fn new(
        registry: &ConfigRegistry,
        topic: &PropertyStore,
        parent: Option<&PropertyStore>,
    ) -> ResolvedTopicConfig {
        let values: Vec<ResolvedValue> = registry
            .descriptors(InstanceKind::Topic)
            .filter(|d| !d.is_alias() && !d.is_pointer())
            .filter_map(|d| resolve_one(registry, d, topic, parent))
            .collect();
        let index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name, i))
            .collect();
        ResolvedTopicConfig { values, index }
    }

    /// The effective value of a property, by its canonical name.
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.index.get(name).map(|i| &self.values[*i])
    }

    /// The canonical text of a property's effective value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).map(|v| v.text.as_str())
    }

    /// Provenance of a property's effective value.
    pub fn source(&self, name: &str) -> Option<ConfigSource> {
        self.get(name).map(|v| v.source)
    }

    /// Returns `true` if the effective value comes from the client.
    pub fn is_inherited(&self, name: &str) -> bool {
        self.get(name).map_or(false, |v| v.inherited)
    }

    /// Iterates over the effective values, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        self.values.iter()
    }

    fn int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|v| v.value.as_int())
    }

    /// Effective compression codec. Never `Inherit`.
    pub fn compression_codec(&self) -> CompressionCodec {
        self.int("compression.codec")
            .and_then(CompressionCodec::from_value)
            .unwrap_or(CompressionCodec::None)
    }

    /// Effective offset store method.
    pub fn offset_store_method(&self) -> OffsetStoreMethod {
        self.int("offset.store.method")
            .and_then(OffsetStoreMethod::from_value)
            .unwrap_or(OffsetStoreMethod::Broker)
    }

    /// What to do when there is no valid initial offset.
    pub fn auto_offset_reset(&self) -> AutoOffsetReset {
        self.int("auto.offset.reset")
            .and_then(AutoOffsetReset::from_value)
            .unwrap_or(AutoOffsetReset::End)
    }

    /// Acknowledgements required from the leader.
    pub fn required_acks(&self) -> i32 {
        self.int("request.required.acks").unwrap_or(1)
    }

    /// Local message timeout, `None` if infinite.
    pub fn message_timeout(&self) -> Option<Duration> {
        match self.int("message.timeout.ms") {
            Some(ms) if ms > 0 => Some(Duration::from_millis(ms as u64)),
            _ => None,
        }
    }
}

impl Serialize for ResolvedTopicConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter().map(|v| (v.name, v)))
    }
}
