//! The descriptor table, and the typed views of its enumerated properties.
//!
//! Names, ranges and defaults follow the C client. A name may appear once per
//! instance kind, with a different meaning on each.

use crate::config::features::Feature;
use crate::config::property::{DefaultValue, EnumSymbol, PropertyDescriptor as P, Scope};

macro_rules! typed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Converts the stored numeric value.
            pub fn from_value(value: i32) -> Option<$name> {
                match value {
                    $(v if v == $value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Numeric value as stored in the configuration.
            pub fn value(self) -> i32 {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }
    };
}

typed_enum! {
    /// Message set compression codec.
    pub enum CompressionCodec {
        /// No compression.
        None = 0,
        /// gzip.
        Gzip = 1,
        /// Snappy.
        Snappy = 2,
        /// LZ4.
        Lz4 = 3,
        /// Use the client-level codec (topic level only).
        Inherit = 4,
    }
}

typed_enum! {
    /// Protocol used to talk to brokers.
    pub enum SecurityProtocol {
        /// Plain TCP.
        Plaintext = 0,
        /// TLS.
        Ssl = 1,
        /// SASL over plain TCP.
        SaslPlaintext = 2,
        /// SASL over TLS.
        SaslSsl = 3,
    }
}

typed_enum! {
    /// Where consumed offsets are stored.
    pub enum OffsetStoreMethod {
        /// Not stored.
        None = 0,
        /// Local file.
        File = 1,
        /// Broker, through the group coordinator.
        Broker = 2,
    }
}

typed_enum! {
    /// What to do when there is no initial offset or it is out of range.
    pub enum AutoOffsetReset {
        /// Reset to the smallest offset.
        Beginning = -2,
        /// Reset to the largest offset.
        End = -1,
        /// Report an error to the consumer.
        Error = -1001,
    }
}

typed_enum! {
    /// Address family used when resolving broker addresses.
    pub enum BrokerAddressFamily {
        /// Any family.
        Any = 0,
        /// IPv4 only.
        V4 = 4,
        /// IPv6 only.
        V6 = 6,
    }
}

const COMPRESSION_GLOBAL: &[EnumSymbol] = &[
    EnumSymbol::new("none", 0),
    EnumSymbol::new("gzip", 1),
    EnumSymbol::new("snappy", 2),
    EnumSymbol::new("lz4", 3),
];

const COMPRESSION_TOPIC: &[EnumSymbol] = &[
    EnumSymbol::new("none", 0),
    EnumSymbol::new("gzip", 1),
    EnumSymbol::new("snappy", 2),
    EnumSymbol::new("lz4", 3),
    EnumSymbol::new("inherit", 4),
];

const SECURITY_PROTOCOLS: &[EnumSymbol] = &[
    EnumSymbol::new("plaintext", 0),
    EnumSymbol::gated("ssl", 1, Feature::Ssl),
    EnumSymbol::gated("sasl_plaintext", 2, Feature::Sasl),
    EnumSymbol::gated("sasl_ssl", 3, Feature::Sasl),
];

const OFFSET_STORE_METHODS: &[EnumSymbol] = &[
    EnumSymbol::new("file", 1),
    EnumSymbol::new("broker", 2),
];

const AUTO_OFFSET_RESET: &[EnumSymbol] = &[
    EnumSymbol::new("smallest", -2),
    EnumSymbol::new("earliest", -2),
    EnumSymbol::new("beginning", -2),
    EnumSymbol::new("largest", -1),
    EnumSymbol::new("latest", -1),
    EnumSymbol::new("end", -1),
    EnumSymbol::new("error", -1001),
];

const ADDRESS_FAMILIES: &[EnumSymbol] = &[
    EnumSymbol::new("any", 0),
    EnumSymbol::new("v4", 4),
    EnumSymbol::new("v6", 6),
];

/// Debug contexts, in bit order.
pub const DEBUG_CONTEXTS: &[&str] = &[
    "generic", "broker", "topic", "metadata", "producer", "queue", "msg", "protocol", "cgrp",
    "security", "fetch",
];

/// Features reported by `builtin.features`, in bit order.
pub const BUILTIN_FEATURES: &[&str] = &["gzip", "snappy", "ssl", "sasl", "regex", "lz4"];

const KINIT_CMD: &str = "kinit -S \"%{sasl.kerberos.service.name}/%{broker.name}\" \
                         -k -t \"%{sasl.kerberos.keytab}\" %{sasl.kerberos.principal}";

/// Every property known to the registry.
pub static PROPERTIES: &[P] = &[
    // Generic
    P::flags("builtin.features", Scope::GLOBAL, BUILTIN_FEATURES, 0,
        "Indicates the builtin features of this build")
        .read_only(DefaultValue::Capabilities),
    P::string("client.id", Scope::GLOBAL, Some("rdkafka"),
        "Client identifier").wire(),
    P::string("metadata.broker.list", Scope::GLOBAL, None,
        "Initial list of brokers as host or host:port"),
    P::alias("bootstrap.servers", Scope::GLOBAL, "metadata.broker.list"),
    P::int("message.max.bytes", Scope::GLOBAL, 1000, 1_000_000_000, 1_000_000,
        "Maximum transmit message size"),
    P::int("receive.message.max.bytes", Scope::GLOBAL, 1000, 1_000_000_000, 100_000_000,
        "Maximum receive message size"),
    P::int("max.in.flight.requests.per.connection", Scope::GLOBAL, 1, 1_000_000, 1_000_000,
        "Maximum number of in-flight requests the client will send"),
    P::int("metadata.request.timeout.ms", Scope::GLOBAL, 10, 900_000, 60_000,
        "Non-topic request timeout in milliseconds"),
    P::int("topic.metadata.refresh.interval.ms", Scope::GLOBAL, -1, 3_600_000, 300_000,
        "Topic metadata refresh interval in milliseconds"),
    P::int("topic.metadata.refresh.fast.cnt", Scope::GLOBAL, 0, 1000, 10,
        "Number of fast metadata refreshes when a topic loses its leader"),
    P::int("topic.metadata.refresh.fast.interval.ms", Scope::GLOBAL, 1, 60_000, 250,
        "Interval of fast metadata refreshes"),
    P::boolean("topic.metadata.refresh.sparse", Scope::GLOBAL, true,
        "Sparse metadata requests"),
    P::patterns("topic.blacklist", Scope::GLOBAL,
        "Topic blacklist, a comma-separated list of regular expressions"),
    P::flags("debug", Scope::GLOBAL, DEBUG_CONTEXTS, 0,
        "Comma-separated list of debug contexts to enable"),
    P::int("socket.timeout.ms", Scope::GLOBAL, 10, 300_000, 60_000,
        "Timeout for network requests"),
    P::int("socket.blocking.max.ms", Scope::GLOBAL, 1, 60_000, 100,
        "Maximum time a broker socket operation may block"),
    P::int("socket.send.buffer.bytes", Scope::GLOBAL, 0, 100_000_000, 0,
        "Broker socket send buffer size, 0 for the system default"),
    P::int("socket.receive.buffer.bytes", Scope::GLOBAL, 0, 100_000_000, 0,
        "Broker socket receive buffer size, 0 for the system default"),
    P::boolean("socket.keepalive.enable", Scope::GLOBAL, false,
        "Enable TCP keep-alives on broker sockets"),
    P::int("socket.max.fails", Scope::GLOBAL, 0, 1_000_000, 3,
        "Disconnect from a broker after this many send failures"),
    P::int("broker.address.ttl", Scope::GLOBAL, 0, 86_400_000, 1000,
        "How long to cache broker address resolving results"),
    P::enumeration("broker.address.family", Scope::GLOBAL, ADDRESS_FAMILIES, 0,
        "Allowed broker IP address families"),
    P::int("reconnect.backoff.jitter.ms", Scope::GLOBAL, 0, 3_600_000, 500,
        "Throttle broker reconnection attempts by this value +-50%"),
    P::int("statistics.interval.ms", Scope::GLOBAL, 0, 86_400_000, 0,
        "Statistics emit interval, 0 disables statistics"),
    P::int("enabled_events", Scope::GLOBAL, 0, 0x7fff_ffff, 0,
        "Events enabled on the main queue"),
    P::pointer("error_cb", Scope::GLOBAL, "Error callback"),
    P::pointer("throttle_cb", Scope::GLOBAL, "Throttle callback"),
    P::pointer("stats_cb", Scope::GLOBAL, "Statistics callback"),
    P::pointer("log_cb", Scope::GLOBAL, "Log callback"),
    P::int("log_level", Scope::GLOBAL, 0, 7, 6,
        "Logging level (syslog(3) levels)"),
    P::boolean("log.thread.name", Scope::GLOBAL, false,
        "Print internal thread name in log messages"),
    P::boolean("log.connection.close", Scope::GLOBAL, true,
        "Log broker disconnects"),
    P::pointer("socket_cb", Scope::GLOBAL, "Socket creation callback"),
    P::pointer("open_cb", Scope::GLOBAL, "File open callback"),
    P::pointer("opaque", Scope::GLOBAL, "Application opaque passed to callbacks"),
    P::pointer("default_topic_conf", Scope::GLOBAL,
        "Default topic configuration for automatically subscribed topics"),
    P::int("internal.termination.signal", Scope::GLOBAL, 0, 128, 0,
        "Signal used internally to speed up termination"),
    P::boolean("api.version.request", Scope::GLOBAL, false,
        "Request broker's supported API versions"),
    P::int("api.version.fallback.ms", Scope::GLOBAL, 0, 604_800_000, 1_200_000,
        "How long to wait before retrying a failed ApiVersionRequest"),
    P::string("broker.version.fallback", Scope::GLOBAL, Some("0.9.0"),
        "Broker version assumed when ApiVersionRequest is disabled or fails"),
    P::enumeration("security.protocol", Scope::GLOBAL, SECURITY_PROTOCOLS, 0,
        "Protocol used to communicate with brokers"),
    // Transport security
    P::string("ssl.cipher.suites", Scope::GLOBAL, None,
        "Cipher suites to use").requires(Feature::Ssl),
    P::string("ssl.key.location", Scope::GLOBAL, None,
        "Path to the client's private key").requires(Feature::Ssl),
    P::string("ssl.key.password", Scope::GLOBAL, None,
        "Private key passphrase").requires(Feature::Ssl).secret(),
    P::string("ssl.certificate.location", Scope::GLOBAL, None,
        "Path to the client's public key").requires(Feature::Ssl),
    P::string("ssl.ca.location", Scope::GLOBAL, None,
        "File or directory path to CA certificate(s)").requires(Feature::Ssl),
    P::string("ssl.crl.location", Scope::GLOBAL, None,
        "Path to the certificate revocation list").requires(Feature::Ssl),
    // Authentication
    P::string("sasl.mechanisms", Scope::GLOBAL, Some("GSSAPI"),
        "Space-separated list of SASL mechanisms").requires(Feature::Sasl),
    P::alias("sasl.mechanism", Scope::GLOBAL, "sasl.mechanisms"),
    P::string("sasl.kerberos.service.name", Scope::GLOBAL, Some("kafka"),
        "Kerberos principal name Kafka runs as").requires(Feature::Sasl),
    P::string("sasl.kerberos.principal", Scope::GLOBAL, Some("kafkaclient"),
        "The client's Kerberos principal name").requires(Feature::Sasl),
    P::string("sasl.kerberos.kinit.cmd", Scope::GLOBAL, Some(KINIT_CMD),
        "Command used to refresh the Kerberos ticket").requires(Feature::Sasl),
    P::string("sasl.kerberos.keytab", Scope::GLOBAL, None,
        "Path to the Kerberos keytab file").requires(Feature::Sasl),
    P::int("sasl.kerberos.min.time.before.relogin", Scope::GLOBAL, 1, 86_400_000, 60_000,
        "Minimum time between key refresh attempts").requires(Feature::Sasl),
    P::string("sasl.username", Scope::GLOBAL, None,
        "SASL username for the PLAIN mechanism").requires(Feature::Sasl),
    P::string("sasl.password", Scope::GLOBAL, None,
        "SASL password for the PLAIN mechanism").requires(Feature::Sasl).secret(),
    // Consumer group
    P::string("group.id", Scope::CGRP, None,
        "Client group id string").wire(),
    P::string("partition.assignment.strategy", Scope::CGRP, Some("range,roundrobin"),
        "Partition assignment strategies, in order of preference"),
    P::int("session.timeout.ms", Scope::CGRP, 1, 3_600_000, 30_000,
        "Client group session and failure detection timeout"),
    P::int("heartbeat.interval.ms", Scope::CGRP, 1, 3_600_000, 1000,
        "Group session keepalive heartbeat interval"),
    P::string("group.protocol.type", Scope::CGRP, Some("consumer"),
        "Group protocol type").wire(),
    P::int("coordinator.query.interval.ms", Scope::CGRP, 1, 3_600_000, 600_000,
        "How often to query for the current client group coordinator"),
    // Consumer
    P::boolean("enable.auto.commit", Scope::CONSUMER, true,
        "Automatically and periodically commit offsets in the background"),
    P::int("auto.commit.interval.ms", Scope::CONSUMER, 0, 86_400_000, 5000,
        "Frequency in milliseconds that consumer offsets are committed"),
    P::boolean("enable.auto.offset.store", Scope::CONSUMER, true,
        "Automatically store the offset of the last message given to the application"),
    P::int("queued.min.messages", Scope::CONSUMER, 1, 10_000_000, 100_000,
        "Minimum number of messages per topic+partition in the local queue"),
    P::int("queued.max.messages.kbytes", Scope::CONSUMER, 1, 1_000_000_000, 1_000_000,
        "Maximum number of kilobytes per topic+partition in the local queue"),
    P::int("fetch.wait.max.ms", Scope::CONSUMER, 0, 300_000, 100,
        "Maximum time the broker may wait to fill the response"),
    P::int("fetch.message.max.bytes", Scope::CONSUMER, 1, 1_000_000_000, 1_048_576,
        "Initial maximum number of bytes per topic+partition to request"),
    P::int("fetch.min.bytes", Scope::CONSUMER, 1, 100_000_000, 1,
        "Minimum number of bytes the broker responds with"),
    P::int("fetch.error.backoff.ms", Scope::CONSUMER, 0, 300_000, 500,
        "How long to postpone the next fetch request after an error"),
    P::enumeration("offset.store.method", Scope::CONSUMER, OFFSET_STORE_METHODS, 2,
        "Offset commit store method"),
    P::pointer("consume_cb", Scope::CONSUMER, "Message consume callback"),
    P::pointer("rebalance_cb", Scope::CONSUMER, "Rebalance callback"),
    P::pointer("offset_commit_cb", Scope::CONSUMER, "Offset commit result callback"),
    P::boolean("enable.partition.eof", Scope::CONSUMER, true,
        "Emit an event when the consumer reaches the end of a partition"),
    // Producer
    P::int("queue.buffering.max.messages", Scope::PRODUCER, 1, 10_000_000, 100_000,
        "Maximum number of messages allowed on the producer queue"),
    P::int("queue.buffering.max.kbytes", Scope::PRODUCER, 1, 2_097_151, 1_048_576,
        "Maximum total message size sum allowed on the producer queue"),
    P::int("queue.buffering.max.ms", Scope::PRODUCER, 1, 900_000, 1000,
        "Maximum time to buffer data when using async mode"),
    P::int("message.send.max.retries", Scope::PRODUCER, 0, 10_000_000, 2,
        "How many times to retry sending a failing message set"),
    P::int("retry.backoff.ms", Scope::PRODUCER, 1, 300_000, 100,
        "The backoff time in milliseconds before retrying a message send"),
    P::enumeration("compression.codec", Scope::PRODUCER, COMPRESSION_GLOBAL, 0,
        "Compression codec to use for compressing message sets"),
    P::alias("compression.type", Scope::PRODUCER, "compression.codec"),
    P::int("batch.num.messages", Scope::PRODUCER, 1, 1_000_000, 10_000,
        "Maximum number of messages batched in one message set"),
    P::boolean("delivery.report.only.error", Scope::PRODUCER, false,
        "Only provide delivery reports for failed messages"),
    P::pointer("dr_cb", Scope::PRODUCER, "Delivery report callback"),
    P::pointer("dr_msg_cb", Scope::PRODUCER, "Delivery report callback, message form"),
    // Topic
    P::int("request.required.acks", Scope::TOPIC_PRODUCER, -1, 1000, 1,
        "Acknowledgements the leader broker must receive before responding"),
    P::alias("acks", Scope::TOPIC_PRODUCER, "request.required.acks"),
    P::int("request.timeout.ms", Scope::TOPIC_PRODUCER, 1, 900_000, 5000,
        "The ack timeout of the producer request in milliseconds"),
    P::int("message.timeout.ms", Scope::TOPIC_PRODUCER, 0, 900_000, 300_000,
        "Local message timeout, 0 is infinite"),
    P::boolean("produce.offset.report", Scope::TOPIC_PRODUCER, false,
        "Report offset of produced message back to application"),
    P::pointer("partitioner_cb", Scope::TOPIC_PRODUCER, "Partitioner callback"),
    P::pointer("opaque", Scope::TOPIC, "Application opaque passed to topic callbacks"),
    P::enumeration("compression.codec", Scope::TOPIC_PRODUCER, COMPRESSION_TOPIC, 4,
        "Compression codec to use for compressing message sets")
        .inherits("compression.codec", Some(4)),
    P::alias("compression.type", Scope::TOPIC_PRODUCER, "compression.codec"),
    P::boolean("auto.commit.enable", Scope::TOPIC_CONSUMER, true,
        "Automatically commit the offset of the last message given to the application"),
    P::int("auto.commit.interval.ms", Scope::TOPIC_CONSUMER, 10, 86_400_000, 60_000,
        "Frequency in milliseconds that consumer offsets are committed"),
    P::enumeration("auto.offset.reset", Scope::TOPIC_CONSUMER, AUTO_OFFSET_RESET, -1,
        "Action to take when there is no initial offset or it is out of range"),
    P::string("offset.store.path", Scope::TOPIC_CONSUMER, Some("."),
        "Path to local file for storing offsets"),
    P::int("offset.store.sync.interval.ms", Scope::TOPIC_CONSUMER, -1, 86_400_000, -1,
        "fsync() interval for the offset file, -1 disables"),
    P::enumeration("offset.store.method", Scope::TOPIC_CONSUMER, OFFSET_STORE_METHODS, 2,
        "Offset commit store method")
        .inherits("offset.store.method", None),
    P::int("consume.callback.max.messages", Scope::TOPIC_CONSUMER, 0, 1_000_000, 0,
        "Maximum number of messages to dispatch in one consume callback, 0 is unlimited"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::property::{InstanceKind, ValueKind};
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_per_kind() {
        let mut seen = HashSet::new();
        for d in PROPERTIES {
            assert!(seen.insert((d.name, d.scope.kind)), "duplicate {}", d.name);
        }
    }

    #[test]
    fn aliases_point_at_same_kind() {
        for d in PROPERTIES {
            if let ValueKind::Alias(target) = d.kind {
                assert!(PROPERTIES
                    .iter()
                    .any(|t| t.name == target && t.scope.kind == d.scope.kind && !t.is_alias()));
            }
        }
    }

    #[test]
    fn inherited_properties_exist_at_client_scope() {
        for d in PROPERTIES.iter().filter(|d| d.inherit.is_some()) {
            assert_eq!(d.scope.kind, InstanceKind::Topic);
            let from = d.inherit.unwrap().from;
            assert!(PROPERTIES
                .iter()
                .any(|c| c.name == from && c.scope.kind == InstanceKind::Client));
        }
    }

    #[test]
    fn integer_defaults_within_range() {
        for d in PROPERTIES {
            if let (ValueKind::Int { min, max }, DefaultValue::Int(v)) = (d.kind, d.default) {
                assert!(min <= v && v <= max, "{} default out of range", d.name);
            }
        }
    }

    #[test]
    fn typed_enums() {
        assert_eq!(CompressionCodec::from_value(4), Some(CompressionCodec::Inherit));
        assert_eq!(CompressionCodec::Lz4.value(), 3);
        assert_eq!(AutoOffsetReset::from_value(-2), Some(AutoOffsetReset::Beginning));
        assert_eq!(SecurityProtocol::from_value(9), None);
    }
}
