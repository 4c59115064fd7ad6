//! Range checks and text round-trips of property values.

use maplit::hashmap;

use rdkafka_conf::config::{ClientConfig, InstanceKind, TopicConfig, ValueKind};
use rdkafka_conf::error::ConfigError;

use crate::utils::*;

mod utils;

#[test]
fn test_integer_bounds() {
    init_test_logger();
    let registry = full_registry();
    for kind in [InstanceKind::Client, InstanceKind::Topic] {
        for desc in registry.descriptors(kind) {
            let (min, max) = match desc.kind {
                ValueKind::Int { min, max } => (i64::from(min), i64::from(max)),
                _ => continue,
            };
            for ok in [min, max] {
                assert_eq!(
                    set_on(&registry, kind, desc.name, &ok.to_string()),
                    Ok(()),
                    "{} = {}",
                    desc.name,
                    ok
                );
            }
            for bad in [min - 1, max + 1] {
                match set_on(&registry, kind, desc.name, &bad.to_string()) {
                    Err(ConfigError::RangeError { value, .. }) => assert_eq!(value, bad),
                    other => panic!("{} = {}: {:?}", desc.name, bad, other),
                }
            }
        }
    }
}

#[test]
fn test_huge_integers_are_range_errors() {
    init_test_logger();
    let mut config = ClientConfig::with_registry(bare_registry());
    assert_eq!(
        config.set("log_level", "99999999999999999999").unwrap_err(),
        ConfigError::RangeError {
            name: "log_level".to_string(),
            value: i64::MAX,
            min: 0,
            max: 7,
        }
    );
    assert_eq!(
        config.set("log_level", "-99999999999999999999").unwrap_err(),
        ConfigError::RangeError {
            name: "log_level".to_string(),
            value: i64::MIN,
            min: 0,
            max: 7,
        }
    );
    assert!(matches!(
        config.set("log_level", "9999999999999999999x"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(config.get("log_level").unwrap(), "6");
}

#[test]
fn test_errors_name_the_alias_used() {
    init_test_logger();
    let mut topic = TopicConfig::with_registry(bare_registry());
    match topic.set("acks", "all").unwrap_err() {
        ConfigError::InvalidValue { name, .. } => assert_eq!(name, "acks"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        topic.set("acks", "1001").unwrap_err(),
        ConfigError::RangeError {
            name: "acks".to_string(),
            value: 1001,
            min: -1,
            max: 1000,
        }
    );
    assert_eq!(
        topic.set("request.required.acks", "all").unwrap_err().property(),
        "request.required.acks"
    );

    let mut config = ClientConfig::with_registry(bare_registry());
    let err = config.set("compression.type", "zstd").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownEnumValue { .. }), "{:?}", err);
    assert_eq!(err.property(), "compression.type");
    assert!(err.to_string().contains("compression.type"), "{}", err);
    assert_eq!(
        config.learn("compression.type", "zstd").unwrap_err().property(),
        "compression.type"
    );
}

#[test]
fn test_round_trip_is_idempotent() {
    init_test_logger();
    let registry = full_registry();
    let mut client = ClientConfig::with_registry(registry.clone());
    let mut topic = TopicConfig::with_registry(registry.clone());
    for desc in registry.descriptors(InstanceKind::Client).filter(|d| !d.is_alias()) {
        if let Some(value) = sample_value(desc) {
            client.set(desc.name, &value).unwrap();
            let first = client.get(desc.name).unwrap();
            client.set(desc.name, &first).unwrap();
            assert_eq!(client.get(desc.name).unwrap(), first, "{}", desc.name);
        }
    }
    for desc in registry.descriptors(InstanceKind::Topic).filter(|d| !d.is_alias()) {
        if let Some(value) = sample_value(desc) {
            topic.set(desc.name, &value).unwrap();
            let first = topic.get(desc.name).unwrap();
            topic.set(desc.name, &first).unwrap();
            assert_eq!(topic.get(desc.name).unwrap(), first, "{}", desc.name);
        }
    }
}

#[test]
fn test_canonical_text() {
    init_test_logger();
    let client = client_config(
        bare_registry(),
        hashmap! {
            "bootstrap.servers" => "broker1:9092,broker2",
            "compression.type" => "SNAPPY",
            "socket.keepalive.enable" => "T",
            "statistics.interval.ms" => " 1000 ",
            "debug" => "cgrp, broker",
            "topic.blacklist" => "^__.*, secret$",
        },
    );
    assert_eq!(client.get("metadata.broker.list").unwrap(), "broker1:9092,broker2");
    assert_eq!(client.get("bootstrap.servers").unwrap(), "broker1:9092,broker2");
    assert_eq!(client.get("compression.codec").unwrap(), "snappy");
    assert_eq!(client.get("socket.keepalive.enable").unwrap(), "true");
    assert_eq!(client.get("statistics.interval.ms").unwrap(), "1000");
    assert_eq!(client.get("debug").unwrap(), "broker,cgrp");
    assert_eq!(client.get("topic.blacklist").unwrap(), "^__.*,secret$");
    assert!(client.is_topic_blacklisted("__consumer_offsets"));
    assert!(client.is_topic_blacklisted("top_secret"));
    assert!(!client.is_topic_blacklisted("orders"));
}

#[test]
fn test_flags_all() {
    init_test_logger();
    let mut client = ClientConfig::with_registry(bare_registry());
    client.set("debug", "all").unwrap();
    assert_eq!(client.get("debug").unwrap(), "all");
    client.set("debug", "").unwrap();
    assert_eq!(client.get("debug").unwrap(), "");
}

#[test]
fn test_enum_synonyms() {
    init_test_logger();
    let mut topic = TopicConfig::with_registry(bare_registry());
    for (symbol, canonical) in [
        ("smallest", "smallest"),
        ("earliest", "smallest"),
        ("Beginning", "smallest"),
        ("latest", "largest"),
        ("end", "largest"),
        ("error", "error"),
    ] {
        topic.set("auto.offset.reset", symbol).unwrap();
        assert_eq!(topic.get("auto.offset.reset").unwrap(), canonical);
    }
}

#[test]
fn test_wire_strings() {
    init_test_logger();
    let client = client_config(
        bare_registry(),
        hashmap! {
            "client.id" => "billing",
            "group.id" => "billing-consumers",
        },
    );
    let client_id = client.client_id_wire().unwrap();
    assert_eq!(client_id.as_str(), "billing");
    assert_eq!(&client_id.as_wire()[..2], &[0, 7]);
    assert_eq!(client.group_id().as_deref(), Some("billing-consumers"));
    assert_eq!(client.group_id_wire().unwrap().len(), 17);

    let defaults = ClientConfig::with_registry(bare_registry());
    assert_eq!(defaults.client_id(), "rdkafka");
    assert_eq!(defaults.group_id(), None);
    assert!(defaults.group_id_wire().is_none());
}

#[test]
fn test_typed_accessors() {
    init_test_logger();
    let client = client_config(
        bare_registry(),
        hashmap! {
            "session.timeout.ms" => "6000",
            "heartbeat.interval.ms" => "500",
        },
    );
    assert_eq!(client.session_timeout().as_millis(), 6000);
    assert_eq!(client.heartbeat_interval().as_millis(), 500);
    assert_eq!(client.get("group.protocol.type").unwrap(), "consumer");
}

#[test]
fn test_from_pairs_stops_at_first_error() {
    init_test_logger();
    let result = ClientConfig::from_pairs(
        bare_registry(),
        vec![("client.id", "ok"), ("log_level", "42"), ("debug", "all")],
    );
    assert!(matches!(result, Err(ConfigError::RangeError { value: 42, .. })));
    let topic = TopicConfig::from_pairs(bare_registry(), vec![("acks", "all")]);
    assert!(matches!(topic, Err(ConfigError::InvalidValue { .. })));
}
