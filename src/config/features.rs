//! Optional capabilities and the substructures that depend on them.
//!
//! Transport security (`ssl.*`) and authentication (`sasl.*`) properties are
//! only stored when the registry reports the matching capability. The
//! substructures holding them are allocated when the configuration object is
//! created, and only if the capability is present, so the same binary can be
//! exercised with and without them.

use std::fmt;

use serde::Serialize;

use crate::config::property::{InstanceKind, PropertyDescriptor};
use crate::config::registry::ConfigRegistry;
use crate::config::store::PropertyStore;
use crate::error::{ConfigError, ConfigResult};
use crate::log::trace;

/// An optional capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Transport security.
    Ssl,
    /// SASL authentication.
    Sasl,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Feature::Ssl => write!(f, "ssl"),
            Feature::Sasl => write!(f, "sasl"),
        }
    }
}

/// The set of capabilities available to a registry, resolved once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    ssl: bool,
    sasl: bool,
}

impl Capabilities {
    /// Capabilities selected by the cargo features this crate was built with.
    pub fn builtin() -> Capabilities {
        Capabilities {
            ssl: cfg!(feature = "ssl"),
            sasl: cfg!(feature = "sasl"),
        }
    }

    /// No optional capability.
    pub fn none() -> Capabilities {
        Capabilities::default()
    }

    /// Every optional capability.
    pub fn all() -> Capabilities {
        Capabilities {
            ssl: true,
            sasl: true,
        }
    }

    /// Returns a copy with the given capability enabled.
    pub fn with(mut self, feature: Feature) -> Capabilities {
        match feature {
            Feature::Ssl => self.ssl = true,
            Feature::Sasl => self.sasl = true,
        }
        self
    }

    /// Returns `true` if the capability is available.
    pub fn is_available(&self, feature: Feature) -> bool {
        match feature {
            Feature::Ssl => self.ssl,
            Feature::Sasl => self.sasl,
        }
    }

    pub(crate) fn require(&self, feature: Feature, name: &str) -> ConfigResult<()> {
        if self.is_available(feature) {
            Ok(())
        } else {
            Err(ConfigError::FeatureUnavailable {
                name: name.to_string(),
                feature,
            })
        }
    }
}

fn feature_store(registry: &ConfigRegistry, feature: Feature) -> PropertyStore {
    PropertyStore::with_defaults(registry, InstanceKind::Client, |d: &PropertyDescriptor| {
        d.feature == Some(feature)
    })
}

/// Transport security settings.
#[derive(Clone)]
pub struct SecurityConfig {
    store: PropertyStore,
}

impl SecurityConfig {
    fn new(registry: &ConfigRegistry) -> SecurityConfig {
        SecurityConfig {
            store: feature_store(registry, Feature::Ssl),
        }
    }

    /// Cipher suites, if configured.
    pub fn cipher_suites(&self) -> Option<&str> {
        self.store.str("ssl.cipher.suites")
    }

    /// Path of the client's private key.
    pub fn key_location(&self) -> Option<&str> {
        self.store.str("ssl.key.location")
    }

    /// Private key passphrase.
    pub fn key_password(&self) -> Option<&str> {
        self.store.str("ssl.key.password")
    }

    /// Path of the client's public key.
    pub fn certificate_location(&self) -> Option<&str> {
        self.store.str("ssl.certificate.location")
    }

    /// Path of the CA certificate(s).
    pub fn ca_location(&self) -> Option<&str> {
        self.store.str("ssl.ca.location")
    }

    /// Path of the certificate revocation list.
    pub fn crl_location(&self) -> Option<&str> {
        self.store.str("ssl.crl.location")
    }
}

impl Drop for SecurityConfig {
    fn drop(&mut self) {
        trace!("Destroying security config");
        let released = self.store.release_all();
        trace!("Destroyed security config ({} properties)", released);
    }
}

/// SASL authentication settings.
#[derive(Clone)]
pub struct AuthConfig {
    store: PropertyStore,
}

impl AuthConfig {
    fn new(registry: &ConfigRegistry) -> AuthConfig {
        AuthConfig {
            store: feature_store(registry, Feature::Sasl),
        }
    }

    /// Space-separated list of SASL mechanisms.
    pub fn mechanisms(&self) -> Option<&str> {
        self.store.str("sasl.mechanisms")
    }

    /// Kerberos service name.
    pub fn service_name(&self) -> Option<&str> {
        self.store.str("sasl.kerberos.service.name")
    }

    /// Kerberos principal.
    pub fn principal(&self) -> Option<&str> {
        self.store.str("sasl.kerberos.principal")
    }

    /// Command used to refresh the Kerberos ticket.
    pub fn kinit_cmd(&self) -> Option<&str> {
        self.store.str("sasl.kerberos.kinit.cmd")
    }

    /// Kerberos keytab path.
    pub fn keytab(&self) -> Option<&str> {
        self.store.str("sasl.kerberos.keytab")
    }

    /// Minimum time between key refresh attempts.
    pub fn relogin_min_time_ms(&self) -> i32 {
        self.store.int("sasl.kerberos.min.time.before.relogin")
    }

    /// PLAIN mechanism user name.
    pub fn username(&self) -> Option<&str> {
        self.store.str("sasl.username")
    }

    /// PLAIN mechanism password.
    pub fn password(&self) -> Option<&str> {
        self.store.str("sasl.password")
    }
}

impl Drop for AuthConfig {
    fn drop(&mut self) {
        trace!("Destroying auth config");
        let released = self.store.release_all();
        trace!("Destroyed auth config ({} properties)", released);
    }
}

/// The feature-gated parts of a client configuration.
#[derive(Clone, Default)]
pub(crate) struct Substructures {
    pub(crate) security: Option<SecurityConfig>,
    pub(crate) auth: Option<AuthConfig>,
}

impl Substructures {
    pub(crate) fn new(registry: &ConfigRegistry) -> Substructures {
        let caps = registry.capabilities();
        Substructures {
            security: caps
                .is_available(Feature::Ssl)
                .then(|| SecurityConfig::new(registry)),
            auth: caps
                .is_available(Feature::Sasl)
                .then(|| AuthConfig::new(registry)),
        }
    }

    /// Returns the store holding properties of the given feature, failing
    /// with `FeatureUnavailable` if the substructure was never allocated.
    pub(crate) fn store(&self, feature: Feature, name: &str) -> ConfigResult<&PropertyStore> {
        let store = match feature {
            Feature::Ssl => self.security.as_ref().map(|s| &s.store),
            Feature::Sasl => self.auth.as_ref().map(|a| &a.store),
        };
        store.ok_or_else(|| ConfigError::FeatureUnavailable {
            name: name.to_string(),
            feature,
        })
    }

    pub(crate) fn store_mut(
        &mut self,
        feature: Feature,
        name: &str,
    ) -> ConfigResult<&mut PropertyStore> {
        let store = match feature {
            Feature::Ssl => self.security.as_mut().map(|s| &mut s.store),
            Feature::Sasl => self.auth.as_mut().map(|a| &mut a.store),
        };
        store.ok_or_else(|| ConfigError::FeatureUnavailable {
            name: name.to_string(),
            feature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities() {
        let caps = Capabilities::none().with(Feature::Sasl);
        assert!(caps.is_available(Feature::Sasl));
        assert!(!caps.is_available(Feature::Ssl));
        assert_eq!(
            caps.require(Feature::Ssl, "ssl.ca.location"),
            Err(ConfigError::FeatureUnavailable {
                name: "ssl.ca.location".to_string(),
                feature: Feature::Ssl,
            })
        );
        assert!(Capabilities::all().require(Feature::Ssl, "ssl.ca.location").is_ok());
    }

    #[test]
    fn substructures_follow_capabilities() {
        let registry = ConfigRegistry::new(Capabilities::none().with(Feature::Ssl));
        let subs = Substructures::new(&registry);
        assert!(subs.security.is_some());
        assert!(subs.auth.is_none());
        assert!(subs.store(Feature::Ssl, "ssl.ca.location").is_ok());
        assert!(subs.store(Feature::Sasl, "sasl.username").is_err());
    }

    #[test]
    fn auth_defaults() {
        let registry = ConfigRegistry::new(Capabilities::all());
        let subs = Substructures::new(&registry);
        let auth = subs.auth.as_ref().unwrap();
        assert_eq!(auth.mechanisms(), Some("GSSAPI"));
        assert_eq!(auth.service_name(), Some("kafka"));
        assert_eq!(auth.relogin_min_time_ms(), 60000);
        assert_eq!(auth.password(), None);
    }
}
