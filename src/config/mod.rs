//! Producer, consumer and topic configuration.
//!
//! ## Property registry
//!
//! Every property a client understands is described once, in an immutable
//! [`ConfigRegistry`]. A registry knows the scope of each property (client or
//! topic), its type and range, its default, and the optional capability it
//! depends on. [`ClientConfig`] and [`TopicConfig`] validate every value
//! against the registry they were created with, so a configuration object
//! only ever holds values that are valid for its kind.
//!
//! ## Provenance
//!
//! Each stored value records where it came from: set by the user, learned
//! from the broker, or an internal default. Topic configurations derived
//! from a client configuration use this to decide which values fall back to
//! the client's; see [`TopicConfig::resolve`].
//!
//! ## Teardown
//!
//! Configuration objects release everything they own when dropped. A topic
//! configuration only holds a weak reference to its client configuration,
//! which it never keeps alive.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::assignor::AssignorRegistration;
use crate::callbacks::{Callback, CallbackTable, Opaque, PartitionerCb};
use crate::error::{ConfigError, ConfigResult};
use crate::log::{debug, log_enabled, trace, DEBUG};
use crate::message::Message;
use crate::util::format_ptr;

mod features;
mod property;
mod registry;
mod resolve;
mod store;
mod table;
mod value;

pub use self::features::{AuthConfig, Capabilities, Feature, SecurityConfig};
pub use self::property::{
    DefaultValue, EnumSymbol, Inherit, InstanceKind, PropertyDescriptor, PropertyInfo, Role, Scope,
    ValueKind,
};
pub use self::registry::ConfigRegistry;
pub use self::resolve::{ResolvedTopicConfig, ResolvedValue};
pub use self::store::ConfigSource;
pub use self::table::{
    AutoOffsetReset, BrokerAddressFamily, CompressionCodec, OffsetStoreMethod, SecurityProtocol,
    BUILTIN_FEATURES, DEBUG_CONTEXTS,
};
pub use self::value::{coerce, to_text, KafkaStr, StrValue, Value};

use self::features::Substructures;
use self::store::PropertyStore;

/// Shown in place of secret values in dumps and logs.
const REDACTED: &str = "[redacted]";

const ASSIGNMENT_STRATEGY: &str = "partition.assignment.strategy";

fn check_settable(desc: &PropertyDescriptor) -> ConfigResult<()> {
    if desc.read_only {
        Err(ConfigError::invalid(desc.name, "property is read-only"))
    } else {
        Ok(())
    }
}

/// Resolves `name` and converts `raw` for it. Errors name the property as
/// given, even when it is an alias.
fn settable_value(
    registry: &ConfigRegistry,
    name: &str,
    kind: InstanceKind,
    raw: &str,
) -> ConfigResult<(&'static PropertyDescriptor, Value)> {
    let desc = registry.find_available(name, kind)?;
    check_settable(desc)
        .and_then(|()| value::coerce(desc, raw, registry.capabilities()))
        .map(|typed| (desc, typed))
        .map_err(|e| e.for_property(name))
}

fn log_change(kind: InstanceKind, desc: &PropertyDescriptor, raw: &str, source: ConfigSource) {
    if log_enabled!(DEBUG) {
        let shown = if desc.sensitive { REDACTED } else { raw };
        debug!(
            "Setting {} config property {} = {} ({:?})",
            kind, desc.name, shown, source
        );
    }
}

fn redact(desc: &PropertyDescriptor, text: String) -> String {
    if desc.sensitive && !text.is_empty() {
        REDACTED.to_string()
    } else {
        text
    }
}

fn entry_json(text: String, source: ConfigSource) -> serde_json::Value {
    serde_json::json!({ "value": text, "source": source })
}

//
// ********** CLIENT CONFIG **********
//

#[derive(Clone)]
struct ClientState {
    store: PropertyStore,
    substructures: Substructures,
    callbacks: CallbackTable,
    assignors: AssignorRegistration,
    default_topic_config: Option<Box<TopicConfig>>,
}

impl ClientState {
    fn new(registry: &ConfigRegistry) -> ClientState {
        let store =
            PropertyStore::with_defaults(registry, InstanceKind::Client, |d| d.feature.is_none());
        let assignors = AssignorRegistration::parse(
            store.str(ASSIGNMENT_STRATEGY).unwrap_or_default(),
            registry.assignors(),
        );
        ClientState {
            store,
            substructures: Substructures::new(registry),
            callbacks: CallbackTable::new(),
            assignors,
            default_topic_config: None,
        }
    }

    /// The store holding a property: the main store, or the substructure of
    /// the capability the property depends on.
    fn store(&self, desc: &PropertyDescriptor) -> ConfigResult<&PropertyStore> {
        match desc.feature {
            Some(feature) => self.substructures.store(feature, desc.name),
            None => Ok(&self.store),
        }
    }

    fn store_mut(&mut self, desc: &PropertyDescriptor) -> ConfigResult<&mut PropertyStore> {
        match desc.feature {
            Some(feature) => self.substructures.store_mut(feature, desc.name),
            None => Ok(&mut self.store),
        }
    }

    fn apply(
        &mut self,
        registry: &ConfigRegistry,
        desc: &'static PropertyDescriptor,
        value: Value,
        source: ConfigSource,
    ) -> ConfigResult<()> {
        let assignors = match (desc.name, &value) {
            (ASSIGNMENT_STRATEGY, Value::Str(s)) => Some(AssignorRegistration::parse(
                s.as_ref().map_or("", StrValue::as_str),
                registry.assignors(),
            )),
            _ => None,
        };
        self.store_mut(desc)?.set(desc, value, source);
        if let Some(assignors) = assignors {
            self.assignors = assignors;
        }
        Ok(())
    }

    fn pointer(&self, name: &str) -> Option<*const ()> {
        match name {
            "default_topic_conf" => self
                .default_topic_config
                .as_deref()
                .map(|t| t as *const TopicConfig as *const ()),
            _ => self.callbacks.ptr_of(name),
        }
    }

    fn text(&self, desc: &PropertyDescriptor) -> ConfigResult<String> {
        if desc.is_pointer() {
            return Ok(format_ptr(self.pointer(desc.name)));
        }
        let store = self.store(desc)?;
        Ok(store
            .value(desc.name)
            .map(|v| value::to_text(desc, v))
            .unwrap_or_default())
    }

    fn source(&self, desc: &PropertyDescriptor) -> ConfigResult<ConfigSource> {
        if desc.is_pointer() {
            return Ok(match self.pointer(desc.name) {
                Some(_) => ConfigSource::Configured,
                None => ConfigSource::Default,
            });
        }
        let store = self.store(desc)?;
        Ok(store.source(desc.name).unwrap_or(ConfigSource::Default))
    }
}

impl Drop for ClientState {
    fn drop(&mut self) {
        trace!("Destroying client config");
        let strings = self.store.release(|v| v.is_str() && !v.is_wire_str());
        trace!("Released {} strings", strings);
        let wire = self.store.release(Value::is_wire_str);
        trace!("Released {} protocol strings", wire);
        let patterns = self.store.release(Value::is_patterns);
        trace!("Released {} pattern lists", patterns);
        let assignors = self.assignors.clear();
        trace!("Released {} assignors", assignors);
        let callbacks = self.callbacks.clear();
        trace!("Released {} callbacks", callbacks);
        if let Some(security) = self.substructures.security.take() {
            drop(security);
        }
        if let Some(auth) = self.substructures.auth.take() {
            drop(auth);
        }
        if let Some(template) = self.default_topic_config.take() {
            trace!("Destroying default topic config");
            drop(template);
        }
        trace!("Destroyed client config");
    }
}

/// Client configuration.
///
/// Holds every client-level property, the feature-gated security and
/// authentication settings, the callback table and the resolved partition
/// assignors. Cloning a `ClientConfig` copies all of it; topic
/// configurations derived from the original are not affected by changes to
/// the copy.
///
/// Setters take `&mut self` and are meant to be used while the configuration
/// is being built. [`ClientConfig::learn`] is the only writer that takes
/// `&self`, for values negotiated with the broker after the configuration
/// was handed over.
pub struct ClientConfig {
    registry: Arc<ConfigRegistry>,
    state: Arc<RwLock<ClientState>>,
}

impl ClientConfig {
    /// Creates a new configuration with every property at its default,
    /// using the builtin registry.
    pub fn new() -> ClientConfig {
        ClientConfig::with_registry(ConfigRegistry::builtin())
    }

    /// Creates a new configuration validated against the given registry.
    pub fn with_registry(registry: Arc<ConfigRegistry>) -> ClientConfig {
        let state = ClientState::new(&registry);
        ClientConfig {
            registry,
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Creates a configuration from name/value pairs. The first invalid pair
    /// aborts construction and the partially built configuration is
    /// released.
    pub fn from_pairs<I, K, V>(registry: Arc<ConfigRegistry>, pairs: I) -> ConfigResult<ClientConfig>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = ClientConfig::with_registry(registry);
        for (name, value) in pairs {
            config.set(name.as_ref(), value.as_ref())?;
        }
        Ok(config)
    }

    /// The registry this configuration validates against.
    pub fn registry(&self) -> &Arc<ConfigRegistry> {
        &self.registry
    }

    /// Sets a property from its textual form.
    ///
    /// Fails without changing the configuration if the name is unknown,
    /// belongs to topic configurations, needs a capability the registry
    /// lacks, or if the value is not valid for the property.
    pub fn set(&mut self, name: &str, value: &str) -> ConfigResult<&mut ClientConfig> {
        let (desc, typed) = settable_value(&self.registry, name, InstanceKind::Client, value)?;
        self.state
            .write()
            .apply(&self.registry, desc, typed, ConfigSource::Configured)?;
        log_change(InstanceKind::Client, desc, value, ConfigSource::Configured);
        Ok(self)
    }

    /// Records a value learned from the broker.
    ///
    /// A value set by the user is never overridden: in that case nothing
    /// changes and `false` is returned.
    pub fn learn(&self, name: &str, value: &str) -> ConfigResult<bool> {
        let (desc, typed) = settable_value(&self.registry, name, InstanceKind::Client, value)?;
        let mut state = self.state.write();
        let store = state.store(desc)?;
        if store.source(desc.name) == Some(ConfigSource::Configured) {
            debug!("Not overriding configured property {} with learned value", desc.name);
            return Ok(false);
        }
        if store.value(desc.name) == Some(&typed) {
            state.store_mut(desc)?.record_source(desc.name, ConfigSource::Learned);
        } else {
            state.apply(&self.registry, desc, typed, ConfigSource::Learned)?;
        }
        log_change(InstanceKind::Client, desc, value, ConfigSource::Learned);
        Ok(true)
    }

    /// Returns the canonical textual form of a property.
    ///
    /// Enumerated values are shown as their first symbol, callbacks and
    /// opaques as an address (empty if unset). Secrets are returned as is.
    pub fn get(&self, name: &str) -> ConfigResult<String> {
        let desc = self.registry.find_available(name, InstanceKind::Client)?;
        self.state.read().text(desc)
    }

    /// Returns where the current value of a property came from.
    pub fn source(&self, name: &str) -> ConfigResult<ConfigSource> {
        let desc = self.registry.find_available(name, InstanceKind::Client)?;
        self.state.read().source(desc)
    }

    /// Registers a callback, replacing any previous one in the same slot.
    /// When `opaque` is given, it replaces the opaque shared by all
    /// callbacks.
    pub fn set_callback(&mut self, callback: Callback, opaque: Option<Opaque>) -> &mut ClientConfig {
        debug!("Registering {} callback", callback.slot());
        let mut state = self.state.write();
        state.callbacks.set(callback);
        if opaque.is_some() {
            state.callbacks.set_opaque(opaque);
        }
        drop(state);
        self
    }

    /// Sets the opaque passed to every callback.
    pub fn set_opaque(&mut self, opaque: Opaque) -> &mut ClientConfig {
        self.state.write().callbacks.set_opaque(Some(opaque));
        self
    }

    /// A snapshot of the callback table.
    ///
    /// No lock is held while the snapshot is in use, so callbacks dispatched
    /// through it may call back into this configuration, for example to
    /// [`learn`](ClientConfig::learn) a value.
    pub fn callbacks(&self) -> CallbackTable {
        self.state.read().callbacks.clone()
    }

    /// Reports the outcome of a produced message to the registered delivery
    /// report callback, honoring `delivery.report.only.error`.
    pub fn dispatch_delivery(&self, msg: &Message, msg_opaque: Option<&Opaque>) -> bool {
        let (callbacks, only_error) = {
            let state = self.state.read();
            let only_error = matches!(
                state.store.value("delivery.report.only.error"),
                Some(Value::Bool(true))
            );
            (state.callbacks.clone(), only_error)
        };
        callbacks.dispatch_delivery(msg, msg_opaque, only_error)
    }

    /// Sets the partition assignment strategies, as a comma or space
    /// separated list. Unknown names are dropped; see
    /// [`ClientConfig::assignors`].
    pub fn set_assignors(&mut self, names: &str) -> ConfigResult<&mut ClientConfig> {
        self.set(ASSIGNMENT_STRATEGY, names)
    }

    /// The resolved partition assignors.
    pub fn assignors(&self) -> AssignorRegistration {
        self.state.read().assignors.clone()
    }

    /// Sets the template for topic configurations derived from this one.
    pub fn set_default_topic_config(&mut self, default_topic_config: TopicConfig) -> &mut ClientConfig {
        debug!("Setting default topic config");
        self.state.write().default_topic_config = Some(Box::new(default_topic_config));
        self
    }

    /// A copy of the default topic configuration template, if one is set.
    pub fn default_topic_config(&self) -> Option<TopicConfig> {
        self.state
            .read()
            .default_topic_config
            .as_deref()
            .cloned()
    }

    /// Creates a topic configuration that inherits from this one.
    pub fn new_topic_config(&self) -> TopicConfig {
        TopicConfig::with_parent(self)
    }

    /// The transport security settings, if the capability is available.
    pub fn security(&self) -> Option<MappedRwLockReadGuard<'_, SecurityConfig>> {
        RwLockReadGuard::try_map(self.state.read(), |s| s.substructures.security.as_ref()).ok()
    }

    /// The authentication settings, if the capability is available.
    pub fn auth(&self) -> Option<MappedRwLockReadGuard<'_, AuthConfig>> {
        RwLockReadGuard::try_map(self.state.read(), |s| s.substructures.auth.as_ref()).ok()
    }

    /// The client identifier.
    pub fn client_id(&self) -> String {
        self.state
            .read()
            .store
            .str("client.id")
            .unwrap_or_default()
            .to_string()
    }

    /// The client identifier in protocol encoding.
    pub fn client_id_wire(&self) -> Option<KafkaStr> {
        self.wire_str("client.id")
    }

    /// The consumer group identifier, if set.
    pub fn group_id(&self) -> Option<String> {
        self.state.read().store.str("group.id").map(str::to_string)
    }

    /// The consumer group identifier in protocol encoding, if set.
    pub fn group_id_wire(&self) -> Option<KafkaStr> {
        self.wire_str("group.id")
    }

    fn wire_str(&self, name: &str) -> Option<KafkaStr> {
        match self.state.read().store.value(name) {
            Some(Value::Str(Some(s))) => s.wire().cloned(),
            _ => None,
        }
    }

    fn int(&self, name: &str) -> i32 {
        self.state.read().store.int(name)
    }

    /// The client-level compression codec.
    pub fn compression_codec(&self) -> CompressionCodec {
        CompressionCodec::from_value(self.int("compression.codec")).unwrap_or(CompressionCodec::None)
    }

    /// The protocol used to talk to brokers.
    pub fn security_protocol(&self) -> SecurityProtocol {
        SecurityProtocol::from_value(self.int("security.protocol"))
            .unwrap_or(SecurityProtocol::Plaintext)
    }

    /// The client-level offset store method.
    pub fn offset_store_method(&self) -> OffsetStoreMethod {
        OffsetStoreMethod::from_value(self.int("offset.store.method"))
            .unwrap_or(OffsetStoreMethod::Broker)
    }

    /// The consumer group session timeout.
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.int("session.timeout.ms") as u64)
    }

    /// The consumer group heartbeat interval.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.int("heartbeat.interval.ms") as u64)
    }

    /// Returns `true` if the topic matches `topic.blacklist`.
    pub fn is_topic_blacklisted(&self, topic: &str) -> bool {
        match self.state.read().store.value("topic.blacklist") {
            Some(Value::Patterns(Some(patterns))) => patterns.matches(topic),
            _ => false,
        }
    }

    /// Every client property available in the registry, with its canonical
    /// text, in table order. Secrets are redacted.
    pub fn dump(&self) -> Vec<(&'static str, String)> {
        let state = self.state.read();
        self.registry
            .descriptors(InstanceKind::Client)
            .filter(|d| !d.is_alias())
            .filter_map(|d| state.text(d).ok().map(|text| (d.name, redact(d, text))))
            .collect()
    }

    /// The configuration as a JSON object of `{"value", "source"}` entries.
    pub fn to_json(&self) -> serde_json::Value {
        let state = self.state.read();
        let map = self
            .registry
            .descriptors(InstanceKind::Client)
            .filter(|d| !d.is_alias())
            .filter_map(|d| {
                let text = redact(d, state.text(d).ok()?);
                let source = state.source(d).ok()?;
                Some((d.name.to_string(), entry_json(text, source)))
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Destroys the configuration, releasing everything it owns.
    pub fn destroy(self) {
        trace!("Destroy requested for client config");
    }
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig::new()
    }
}

impl Clone for ClientConfig {
    fn clone(&self) -> ClientConfig {
        let state = self.state.read().clone();
        ClientConfig {
            registry: Arc::clone(&self.registry),
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.dump()).finish()
    }
}

//
// ********** TOPIC CONFIG **********
//

/// Topic configuration.
///
/// A topic configuration derived from a client configuration, with
/// [`TopicConfig::with_parent`], starts from the client's default topic
/// configuration when one is set, and resolves inheriting properties against
/// the client for as long as the client is alive.
#[derive(Clone)]
pub struct TopicConfig {
    registry: Arc<ConfigRegistry>,
    store: PropertyStore,
    partitioner: Option<PartitionerCb>,
    opaque: Option<Opaque>,
    parent: Option<Weak<RwLock<ClientState>>>,
}

impl TopicConfig {
    /// Returns a new topic configuration with every property at its default,
    /// using the builtin registry.
    pub fn new() -> TopicConfig {
        TopicConfig::with_registry(ConfigRegistry::builtin())
    }

    /// Returns a new topic configuration validated against the given
    /// registry.
    pub fn with_registry(registry: Arc<ConfigRegistry>) -> TopicConfig {
        let store = PropertyStore::with_defaults(&registry, InstanceKind::Topic, |_| true);
        TopicConfig {
            registry,
            store,
            partitioner: None,
            opaque: None,
            parent: None,
        }
    }

    /// Returns a new topic configuration derived from a client
    /// configuration.
    ///
    /// If the client has a default topic configuration, the new one starts
    /// as a copy of it, provenance included.
    pub fn with_parent(parent: &ClientConfig) -> TopicConfig {
        let state = parent.state.read();
        let mut topic = match state.default_topic_config {
            Some(ref template) => TopicConfig {
                registry: Arc::clone(&parent.registry),
                store: template.store.clone(),
                partitioner: template.partitioner.clone(),
                opaque: template.opaque.clone(),
                parent: None,
            },
            None => TopicConfig::with_registry(Arc::clone(&parent.registry)),
        };
        drop(state);
        topic.parent = Some(Arc::downgrade(&parent.state));
        topic
    }

    /// Creates a topic configuration from name/value pairs. The first
    /// invalid pair aborts construction.
    pub fn from_pairs<I, K, V>(registry: Arc<ConfigRegistry>, pairs: I) -> ConfigResult<TopicConfig>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = TopicConfig::with_registry(registry);
        for (name, value) in pairs {
            config.set(name.as_ref(), value.as_ref())?;
        }
        Ok(config)
    }

    /// Sets a property from its textual form.
    pub fn set(&mut self, name: &str, value: &str) -> ConfigResult<&mut TopicConfig> {
        let (desc, typed) = settable_value(&self.registry, name, InstanceKind::Topic, value)?;
        self.store.set(desc, typed, ConfigSource::Configured);
        log_change(self.store.kind(), desc, value, ConfigSource::Configured);
        Ok(self)
    }

    /// Finalizes the creation of the topic configuration. Useful at the end
    /// of a chain of setters, if you need to store the resulting topic
    /// configuration before its use.
    pub fn finalize(&self) -> TopicConfig {
        self.clone()
    }

    fn pointer(&self, name: &str) -> Option<*const ()> {
        match name {
            "partitioner_cb" => self.partitioner.as_ref().map(|p| Arc::as_ptr(p) as *const ()),
            "opaque" => self.opaque.as_ref().map(|o| Arc::as_ptr(o) as *const ()),
            _ => None,
        }
    }

    fn text(&self, desc: &PropertyDescriptor) -> String {
        if desc.is_pointer() {
            return format_ptr(self.pointer(desc.name));
        }
        self.store
            .value(desc.name)
            .map(|v| value::to_text(desc, v))
            .unwrap_or_default()
    }

    fn source_of(&self, desc: &PropertyDescriptor) -> ConfigSource {
        if desc.is_pointer() {
            return match self.pointer(desc.name) {
                Some(_) => ConfigSource::Configured,
                None => ConfigSource::Default,
            };
        }
        self.store.source(desc.name).unwrap_or(ConfigSource::Default)
    }

    /// Returns the canonical textual form of a property as stored on the
    /// topic, without inheritance: an inheriting codec reads `inherit`.
    pub fn get(&self, name: &str) -> ConfigResult<String> {
        let desc = self.registry.find_available(name, InstanceKind::Topic)?;
        Ok(self.text(desc))
    }

    /// Returns where the stored value of a property came from.
    pub fn source(&self, name: &str) -> ConfigResult<ConfigSource> {
        let desc = self.registry.find_available(name, InstanceKind::Topic)?;
        Ok(self.source_of(desc))
    }

    /// Computes the effective values, falling back to the client
    /// configuration for inheriting properties never set on the topic. If
    /// there is no client configuration, or it was dropped, the client-level
    /// defaults are used instead.
    pub fn resolve(&self) -> ResolvedTopicConfig {
        let parent = self.parent.as_ref().and_then(Weak::upgrade);
        let guard = parent.as_ref().map(|p| p.read());
        ResolvedTopicConfig::new(&self.registry, &self.store, guard.as_ref().map(|s| &s.store))
    }

    /// Returns `true` if the client configuration this one was derived from
    /// is still alive.
    pub fn has_parent(&self) -> bool {
        self.parent
            .as_ref()
            .map_or(false, |p| p.strong_count() > 0)
    }

    /// Sets the partitioner, replacing any previous one.
    pub fn set_partitioner(&mut self, partitioner: PartitionerCb) -> &mut TopicConfig {
        debug!("Registering partitioner callback");
        self.partitioner = Some(partitioner);
        self
    }

    /// Sets the opaque passed to the partitioner.
    pub fn set_opaque(&mut self, opaque: Opaque) -> &mut TopicConfig {
        self.opaque = Some(opaque);
        self
    }

    /// The opaque passed to the partitioner.
    pub fn opaque(&self) -> Option<&Opaque> {
        self.opaque.as_ref()
    }

    /// Selects a partition with the registered partitioner. Returns `None`
    /// if no partitioner is registered.
    pub fn partition(
        &self,
        key: Option<&[u8]>,
        partition_cnt: i32,
        msg_opaque: Option<&Opaque>,
    ) -> Option<i32> {
        self.partitioner
            .as_ref()
            .map(|p| p(key, partition_cnt, self.opaque.as_ref(), msg_opaque))
    }

    /// Every topic property, with its stored canonical text, in table order.
    pub fn dump(&self) -> Vec<(&'static str, String)> {
        self.registry
            .descriptors(InstanceKind::Topic)
            .filter(|d| !d.is_alias())
            .map(|d| (d.name, redact(d, self.text(d))))
            .collect()
    }

    /// The configuration as a JSON object of `{"value", "source"}` entries.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .registry
            .descriptors(InstanceKind::Topic)
            .filter(|d| !d.is_alias())
            .map(|d| {
                let text = redact(d, self.text(d));
                (d.name.to_string(), entry_json(text, self.source_of(d)))
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Destroys the configuration, releasing everything it owns. The client
    /// configuration it was derived from is not affected.
    pub fn destroy(self) {
        trace!("Destroy requested for topic config");
    }
}

impl Default for TopicConfig {
    fn default() -> TopicConfig {
        TopicConfig::new()
    }
}

impl Drop for TopicConfig {
    fn drop(&mut self) {
        trace!("Destroying topic config");
        let strings = self.store.release(Value::is_str);
        trace!("Released {} strings", strings);
        if self.partitioner.take().is_some() {
            trace!("Released partitioner");
        }
        self.opaque = None;
        if self.parent.take().is_some() {
            trace!("Dropped parent reference");
        }
        trace!("Destroyed topic config");
    }
}

impl fmt::Debug for TopicConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.dump()).finish()
    }
}
