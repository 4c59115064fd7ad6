//! A wrapper module to export logging functionality from
//! [`log`] or [`tracing`] depending on the `tracing` feature.
//!
//! Configuration changes are logged at debug level, teardown at trace level.
//! Values of secret-bearing properties never reach the log.
//!
//! [`log`]: https://docs.rs/log
//! [`tracing`]: https://docs.rs/tracing

#[cfg(not(feature = "tracing"))]
pub use log::Level::Debug as DEBUG;
#[cfg(not(feature = "tracing"))]
pub use log::{debug, log_enabled, trace, warn};

#[cfg(feature = "tracing")]
pub use tracing::{debug, enabled as log_enabled, trace, warn};
#[cfg(feature = "tracing")]
pub const DEBUG: tracing::Level = tracing::Level::DEBUG;
