//! Properties that depend on optional capabilities.

use rdkafka_conf::config::{ClientConfig, Feature, InstanceKind, SecurityProtocol, ValueKind};
use rdkafka_conf::error::{ConfRes, ConfigError};

use crate::utils::*;

mod utils;

#[test]
fn test_gated_properties_fail_before_value_checks() {
    init_test_logger();
    let registry = bare_registry();
    let mut config = ClientConfig::with_registry(registry.clone());
    let gated: Vec<_> = registry
        .descriptors(InstanceKind::Client)
        .filter(|d| d.feature.is_some())
        .collect();
    assert!(gated.len() >= 14);
    for desc in gated {
        for value in ["", "x", "-1", "99999999999"] {
            let err = config.set(desc.name, value).unwrap_err();
            assert_eq!(
                err,
                ConfigError::FeatureUnavailable {
                    name: desc.name.to_string(),
                    feature: desc.feature.unwrap(),
                },
                "{} = {:?}",
                desc.name,
                value
            );
            assert_eq!(err.conf_res(), ConfRes::Invalid);
        }
        assert!(config.get(desc.name).is_err());
        assert!(config.source(desc.name).is_err());
    }
}

#[test]
fn test_aliases_of_gated_properties() {
    init_test_logger();
    let mut config = ClientConfig::with_registry(bare_registry());
    assert_eq!(
        config.set("sasl.mechanism", "PLAIN").unwrap_err(),
        ConfigError::FeatureUnavailable {
            name: "sasl.mechanism".to_string(),
            feature: Feature::Sasl,
        }
    );
    assert_eq!(
        config.set("sasl.mechanisms", "PLAIN").unwrap_err().property(),
        "sasl.mechanisms"
    );

    let mut config = ClientConfig::with_registry(full_registry());
    config.set("sasl.mechanism", "PLAIN").unwrap();
    assert_eq!(config.get("sasl.mechanisms").unwrap(), "PLAIN");
    assert_eq!(config.auth().unwrap().mechanisms(), Some("PLAIN"));
}

#[test]
fn test_gated_enum_symbols() {
    init_test_logger();
    let mut config = ClientConfig::with_registry(bare_registry());
    assert!(matches!(
        config.set("security.protocol", "ssl"),
        Err(ConfigError::FeatureUnavailable { feature: Feature::Ssl, .. })
    ));
    assert!(matches!(
        config.set("security.protocol", "sasl_ssl"),
        Err(ConfigError::FeatureUnavailable { feature: Feature::Sasl, .. })
    ));
    assert_eq!(config.security_protocol(), SecurityProtocol::Plaintext);

    let mut config = ClientConfig::with_registry(ssl_registry());
    config.set("security.protocol", "SSL").unwrap();
    assert_eq!(config.security_protocol(), SecurityProtocol::Ssl);
    assert!(config.set("security.protocol", "sasl_plaintext").is_err());
    assert_eq!(config.get("security.protocol").unwrap(), "ssl");
}

#[test]
fn test_substructures_follow_capabilities() {
    init_test_logger();
    let bare = ClientConfig::with_registry(bare_registry());
    assert!(bare.security().is_none());
    assert!(bare.auth().is_none());

    let mut ssl = ClientConfig::with_registry(ssl_registry());
    ssl.set("ssl.ca.location", "/etc/ssl/certs")
        .unwrap()
        .set("ssl.key.password", "secret")
        .unwrap();
    {
        let security = ssl.security().unwrap();
        assert_eq!(security.ca_location(), Some("/etc/ssl/certs"));
        assert_eq!(security.key_password(), Some("secret"));
        assert_eq!(security.crl_location(), None);
    }
    assert!(ssl.auth().is_none());
    assert!(matches!(
        ssl.set("sasl.username", "alice"),
        Err(ConfigError::FeatureUnavailable { feature: Feature::Sasl, .. })
    ));

    let full = ClientConfig::with_registry(full_registry());
    assert!(full.security().is_some());
    assert_eq!(full.auth().unwrap().service_name(), Some("kafka"));
}

#[test]
fn test_builtin_features_reflect_capabilities() {
    init_test_logger();
    let bare = ClientConfig::with_registry(bare_registry());
    assert_eq!(bare.get("builtin.features").unwrap(), "gzip,snappy,regex,lz4");
    let ssl = ClientConfig::with_registry(ssl_registry());
    assert_eq!(ssl.get("builtin.features").unwrap(), "gzip,snappy,ssl,regex,lz4");
    let full = ClientConfig::with_registry(full_registry());
    assert_eq!(full.get("builtin.features").unwrap(), "gzip,snappy,ssl,sasl,regex,lz4");
}

#[test]
fn test_dump_skips_unavailable_properties() {
    init_test_logger();
    let registry = ssl_registry();
    let config = ClientConfig::with_registry(registry.clone());
    let names: Vec<_> = config.dump().into_iter().map(|(name, _)| name).collect();
    assert!(names.contains(&"ssl.ca.location"));
    assert!(!names.iter().any(|n| n.starts_with("sasl.")));
    let json = config.to_json();
    assert!(json.get("ssl.cipher.suites").is_some());
    assert!(json.get("sasl.username").is_none());

    // Gated properties are still described by the registry.
    let desc = registry.find("sasl.username", InstanceKind::Client).unwrap();
    assert!(matches!(desc.kind, ValueKind::Str { .. }));
    assert_eq!(desc.feature, Some(Feature::Sasl));
}
