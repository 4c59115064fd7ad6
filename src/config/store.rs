//! Per-instance property storage and provenance tracking.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::property::{InstanceKind, PropertyDescriptor};
use crate::config::registry::ConfigRegistry;
use crate::config::value::{self, Value};

/// Where the current value of a property came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Set explicitly by the user.
    Configured,
    /// Learned from the broker at runtime.
    Learned,
    /// Internal default, never set.
    Default,
}

impl ConfigSource {
    /// Returns `true` if the value was set by the user or learned, as opposed
    /// to being an internal default.
    pub fn is_explicit(self) -> bool {
        !matches!(self, ConfigSource::Default)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) value: Value,
    pub(crate) source: ConfigSource,
}

/// The values of one configuration object, keyed by descriptor name.
///
/// A store only ever holds descriptors of a single instance kind; the
/// registry rejects out-of-scope names before a value reaches it.
#[derive(Clone, Debug)]
pub(crate) struct PropertyStore {
    kind: InstanceKind,
    entries: HashMap<&'static str, Entry>,
}

impl PropertyStore {
    /// Creates a store with every selected descriptor of `kind` at its
    /// default value. Aliases are never stored.
    pub(crate) fn with_defaults<F>(registry: &ConfigRegistry, kind: InstanceKind, select: F) -> Self
    where
        F: Fn(&PropertyDescriptor) -> bool,
    {
        let entries = registry
            .descriptors(kind)
            .filter(|d| !d.is_alias() && select(d))
            .map(|d| {
                let entry = Entry {
                    value: value::default_value(d, registry.capabilities()),
                    source: ConfigSource::Default,
                };
                (d.name, entry)
            })
            .collect();
        PropertyStore { kind, entries }
    }

    pub(crate) fn kind(&self) -> InstanceKind {
        self.kind
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub(crate) fn value(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|e| &e.value)
    }

    pub(crate) fn source(&self, name: &str) -> Option<ConfigSource> {
        self.entries.get(name).map(|e| e.source)
    }

    /// Stores a coerced value, replacing (and dropping) the previous one.
    pub(crate) fn set(&mut self, desc: &'static PropertyDescriptor, value: Value, source: ConfigSource) {
        debug_assert!(desc.scope.applies_to(self.kind));
        self.entries.insert(desc.name, Entry { value, source });
    }

    /// Updates the provenance of a property without touching its value.
    pub(crate) fn record_source(&mut self, name: &str, source: ConfigSource) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.source = source;
        }
    }

    pub(crate) fn str(&self, name: &str) -> Option<&str> {
        match self.value(name) {
            Some(Value::Str(Some(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    pub(crate) fn int(&self, name: &str) -> i32 {
        let v = self.value(name).and_then(Value::as_int);
        debug_assert!(v.is_some(), "{} is not a numeric property", name);
        v.unwrap_or(0)
    }

    /// Resets matching values to their released state, returning how many
    /// owned resources were dropped. Values that hold nothing are skipped, so
    /// calling this on a partially populated store is harmless.
    pub(crate) fn release<F>(&mut self, matches: F) -> usize
    where
        F: Fn(&Value) -> bool,
    {
        self.entries
            .values_mut()
            .filter(|e| matches(&e.value))
            .map(|e| e.value.release())
            .filter(|released| *released)
            .count()
    }

    pub(crate) fn release_all(&mut self) -> usize {
        let released = self.release(|_| true);
        self.entries.clear();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::features::Capabilities;

    #[test]
    fn defaults_are_internal() {
        let registry = ConfigRegistry::new(Capabilities::none());
        let store = PropertyStore::with_defaults(&registry, InstanceKind::Topic, |_| true);
        assert_eq!(store.kind(), InstanceKind::Topic);
        assert_eq!(store.source("request.timeout.ms"), Some(ConfigSource::Default));
        assert_eq!(store.int("request.timeout.ms"), 5000);
        assert_eq!(store.str("offset.store.path"), Some("."));
        assert!(store.get("acks").is_none());
        assert!(store.get("client.id").is_none());
    }

    #[test]
    fn release_skips_unset_values() {
        let registry = ConfigRegistry::new(Capabilities::none());
        let mut store = PropertyStore::with_defaults(&registry, InstanceKind::Client, |_| true);
        let strings = store.release(Value::is_str);
        assert!(strings > 0);
        // Already released: nothing left to drop.
        assert_eq!(store.release(Value::is_str), 0);
        assert_eq!(store.str("client.id"), None);
    }
}
