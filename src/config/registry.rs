//! The immutable registry shared by every configuration object.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::assignor::{AssignorSet, PartitionAssignor};
use crate::config::features::{Capabilities, Feature};
use crate::config::property::{InstanceKind, PropertyDescriptor, PropertyInfo, ValueKind};
use crate::config::table::PROPERTIES;
use crate::error::{ConfigError, ConfigResult};

/// Property descriptors, capabilities and known assignors.
///
/// A registry never changes after construction. Configuration objects keep a
/// shared reference to the registry they were created with; the one returned
/// by [`ConfigRegistry::builtin`] is captured once per process.
pub struct ConfigRegistry {
    properties: &'static [PropertyDescriptor],
    capabilities: Capabilities,
    assignors: AssignorSet,
}

impl ConfigRegistry {
    /// Creates a registry with the full property table, the given
    /// capabilities and the builtin assignors.
    pub fn new(capabilities: Capabilities) -> ConfigRegistry {
        ConfigRegistry {
            properties: PROPERTIES,
            capabilities,
            assignors: AssignorSet::builtin(),
        }
    }

    /// Returns the process-wide registry, with the capabilities selected by
    /// the crate's cargo features.
    pub fn builtin() -> Arc<ConfigRegistry> {
        static BUILTIN: OnceLock<Arc<ConfigRegistry>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| Arc::new(ConfigRegistry::new(Capabilities::builtin())))
            .clone()
    }

    /// Adds an assignor to the set that `partition.assignment.strategy` is
    /// resolved against.
    pub fn with_assignor(mut self, assignor: Arc<dyn PartitionAssignor>) -> ConfigRegistry {
        self.assignors.register(assignor);
        self
    }

    /// The capabilities of this registry.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns `true` if the capability is available.
    pub fn is_feature_available(&self, feature: Feature) -> bool {
        self.capabilities.is_available(feature)
    }

    pub(crate) fn assignors(&self) -> &AssignorSet {
        &self.assignors
    }

    /// Iterates over the descriptors of an instance kind, in table order.
    pub fn descriptors(&self, kind: InstanceKind) -> impl Iterator<Item = &'static PropertyDescriptor> {
        let properties: &'static [PropertyDescriptor] = self.properties;
        properties.iter().filter(move |d| d.scope.applies_to(kind))
    }

    /// Looks up the descriptor for `name` on an instance of `kind`, following
    /// aliases.
    ///
    /// Fails with `UnknownProperty` if no kind defines the name, and with
    /// `ScopeViolation` if only the other kind does.
    pub fn find(&self, name: &str, kind: InstanceKind) -> ConfigResult<&'static PropertyDescriptor> {
        let properties: &'static [PropertyDescriptor] = self.properties;
        let desc = match properties
            .iter()
            .find(|d| d.name == name && d.scope.applies_to(kind))
        {
            Some(desc) => desc,
            None if properties.iter().any(|d| d.name == name) => {
                return Err(ConfigError::ScopeViolation {
                    name: name.to_string(),
                    kind,
                })
            }
            None => return Err(ConfigError::UnknownProperty(name.to_string())),
        };
        match desc.kind {
            ValueKind::Alias(target) => self
                .find(target, kind)
                .map_err(|e| e.for_property(name)),
            _ => Ok(desc),
        }
    }

    /// Looks up a descriptor and checks that its capability is available.
    pub(crate) fn find_available(
        &self,
        name: &str,
        kind: InstanceKind,
    ) -> ConfigResult<&'static PropertyDescriptor> {
        let desc = self.find(name, kind)?;
        if let Some(feature) = desc.feature {
            self.capabilities.require(feature, name)?;
        }
        Ok(desc)
    }

    /// Metadata of every property, for documentation.
    pub fn properties(&self) -> Vec<PropertyInfo> {
        self.properties.iter().map(PropertyDescriptor::info).collect()
    }

    /// Writes the property table as Markdown.
    pub fn write_properties_table<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        writeln!(w, "Property | Scope | Range | Default | Description")?;
        writeln!(w, "---------|-------|-------|---------|------------")?;
        for info in self.properties() {
            let scope = format!("{}/{}", info.scope.kind, info.scope.role);
            let range = match (info.min, info.max) {
                (Some(min), Some(max)) => format!("{} .. {}", min, max),
                _ => info.values.join(", "),
            };
            let description = match info.alias_of {
                Some(target) => format!("Alias for `{}`", target),
                None => info.description.to_string(),
            };
            writeln!(
                w,
                "{} | {} | {} | {} | {}",
                info.name,
                scope,
                range,
                info.default.as_deref().unwrap_or(""),
                description
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ConfigRegistry")
            .field("properties", &self.properties.len())
            .field("capabilities", &self.capabilities)
            .field("assignors", &self.assignors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_resolves_aliases() {
        let registry = ConfigRegistry::new(Capabilities::none());
        let desc = registry.find("bootstrap.servers", InstanceKind::Client).unwrap();
        assert_eq!(desc.name, "metadata.broker.list");
        let desc = registry.find("acks", InstanceKind::Topic).unwrap();
        assert_eq!(desc.name, "request.required.acks");
    }

    #[test]
    fn find_distinguishes_scope_from_unknown() {
        let registry = ConfigRegistry::new(Capabilities::none());
        assert_eq!(
            registry.find("client.id", InstanceKind::Topic).map(|d| d.name),
            Err(ConfigError::ScopeViolation {
                name: "client.id".to_string(),
                kind: InstanceKind::Topic,
            })
        );
        assert_eq!(
            registry.find("no.such.property", InstanceKind::Client).map(|d| d.name),
            Err(ConfigError::UnknownProperty("no.such.property".to_string()))
        );
    }

    #[test]
    fn same_name_different_kinds() {
        let registry = ConfigRegistry::new(Capabilities::none());
        let client = registry.find("auto.commit.interval.ms", InstanceKind::Client).unwrap();
        let topic = registry.find("auto.commit.interval.ms", InstanceKind::Topic).unwrap();
        assert!(matches!(client.kind, ValueKind::Int { min: 0, .. }));
        assert!(matches!(topic.kind, ValueKind::Int { min: 10, .. }));
    }

    #[test]
    fn feature_check() {
        let registry = ConfigRegistry::new(Capabilities::none());
        assert!(registry.find("ssl.ca.location", InstanceKind::Client).is_ok());
        assert!(matches!(
            registry.find_available("ssl.ca.location", InstanceKind::Client),
            Err(ConfigError::FeatureUnavailable { feature: Feature::Ssl, .. })
        ));
        assert!(!registry.is_feature_available(Feature::Sasl));
    }

    #[test]
    fn builtin_is_shared() {
        let a = ConfigRegistry::builtin();
        let b = ConfigRegistry::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn properties_table() {
        let registry = ConfigRegistry::new(Capabilities::all());
        let mut out = String::new();
        registry.write_properties_table(&mut out).unwrap();
        assert!(out.contains("client.id | client/any |  | rdkafka | Client identifier"));
        assert!(out.contains("bootstrap.servers | client/any |  |  | Alias for `metadata.broker.list`"));
        assert!(out.contains("log_level | client/any | 0 .. 7 | 6 |"));
    }
}
