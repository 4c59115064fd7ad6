//! Scope enforcement and error classification of property sets.

use rdkafka_conf::config::{ClientConfig, InstanceKind, TopicConfig};
use rdkafka_conf::error::{ConfRes, ConfigError};

use crate::utils::*;

mod utils;

#[test]
fn test_set_succeeds_only_in_scope() {
    init_test_logger();
    let registry = full_registry();
    for kind in [InstanceKind::Client, InstanceKind::Topic] {
        let other = other_kind(kind);
        for desc in registry.descriptors(kind).filter(|d| !d.is_alias()) {
            let value = match sample_value(desc) {
                Some(value) => value,
                None => continue,
            };
            assert_eq!(
                set_on(&registry, kind, desc.name, &value),
                Ok(()),
                "{} on {}",
                desc.name,
                kind
            );
            if registry.descriptors(other).any(|d| d.name == desc.name) {
                continue;
            }
            assert_eq!(
                set_on(&registry, other, desc.name, &value),
                Err(ConfigError::ScopeViolation {
                    name: desc.name.to_string(),
                    kind: other,
                }),
                "{} on {}",
                desc.name,
                other
            );
        }
    }
}

#[test]
fn test_scope_violation_is_never_stored() {
    init_test_logger();
    let mut topic = TopicConfig::with_registry(bare_registry());
    let err = topic.set("client.id", "rogue").unwrap_err();
    assert_eq!(err.conf_res(), ConfRes::Unknown);
    assert!(topic.dump().iter().all(|(name, _)| *name != "client.id"));
    assert!(matches!(
        topic.get("client.id"),
        Err(ConfigError::ScopeViolation { .. })
    ));
}

#[test]
fn test_aliases_keep_their_scope() {
    init_test_logger();
    let registry = bare_registry();
    assert_eq!(set_on(&registry, InstanceKind::Topic, "acks", "-1"), Ok(()));
    assert_eq!(
        set_on(&registry, InstanceKind::Client, "acks", "1"),
        Err(ConfigError::ScopeViolation {
            name: "acks".to_string(),
            kind: InstanceKind::Client,
        })
    );
    assert_eq!(
        set_on(&registry, InstanceKind::Topic, "bootstrap.servers", "localhost"),
        Err(ConfigError::ScopeViolation {
            name: "bootstrap.servers".to_string(),
            kind: InstanceKind::Topic,
        })
    );
}

#[test]
fn test_same_name_different_meaning() {
    init_test_logger();
    let registry = bare_registry();
    let mut client = ClientConfig::with_registry(registry.clone());
    let mut topic = TopicConfig::with_registry(registry);
    // The client-level commit interval accepts 0, the topic-level one does not.
    client.set("auto.commit.interval.ms", "0").unwrap();
    assert!(matches!(
        topic.set("auto.commit.interval.ms", "0"),
        Err(ConfigError::RangeError { min: 10, .. })
    ));
    // Only the topic-level codec knows the inherit sentinel.
    topic.set("compression.codec", "inherit").unwrap();
    assert!(matches!(
        client.set("compression.codec", "inherit"),
        Err(ConfigError::UnknownEnumValue { .. })
    ));
}

#[test]
fn test_error_classes() {
    init_test_logger();
    let mut config = ClientConfig::with_registry(bare_registry());
    let unknown = config.set("no.such.property", "1").unwrap_err();
    assert_eq!(unknown, ConfigError::UnknownProperty("no.such.property".to_string()));
    assert_eq!(unknown.conf_res(), ConfRes::Unknown);
    assert_eq!(unknown.property(), "no.such.property");

    let invalid = config.set("socket.timeout.ms", "soon").unwrap_err();
    assert_eq!(invalid.conf_res(), ConfRes::Invalid);
    assert_eq!(
        invalid.to_string(),
        "Invalid value for configuration property \"socket.timeout.ms\": \"soon\" is not an integer"
    );

    let bad_enum = config.set("broker.address.family", "v5").unwrap_err();
    assert_eq!(
        bad_enum,
        ConfigError::UnknownEnumValue {
            name: "broker.address.family".to_string(),
            value: "v5".to_string(),
            valid: vec!["any", "v4", "v6"],
        }
    );
}
