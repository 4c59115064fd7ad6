//! Scoped, typed configuration for Kafka clients.
//!
//! Properties are validated against an immutable [`ConfigRegistry`] when
//! they are set, stored with their provenance, and released when the
//! configuration object that owns them is dropped.
//!
//! ```
//! use rdkafka_conf::config::{ClientConfig, CompressionCodec};
//!
//! let mut config = ClientConfig::new();
//! config
//!     .set("bootstrap.servers", "localhost:9092")?
//!     .set("compression.codec", "gzip")?;
//!
//! let topic = config.new_topic_config();
//! assert_eq!(topic.resolve().compression_codec(), CompressionCodec::Gzip);
//! # Ok::<(), rdkafka_conf::error::ConfigError>(())
//! ```
//!
//! [`ConfigRegistry`]: crate::config::ConfigRegistry

#![warn(missing_docs)]

pub mod assignor;
pub mod callbacks;
pub mod config;
pub mod error;
mod log;
pub mod message;
pub mod pattern;
pub mod topic_partition_list;
pub mod util;

pub use crate::config::{ClientConfig, ConfigRegistry, ConfigSource, TopicConfig};
pub use crate::error::{ConfigError, ConfigResult};
