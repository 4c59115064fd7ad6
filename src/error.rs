//! Error manipulations.

use std::{error, fmt};

use crate::config::{Feature, InstanceKind};

/// Configuration result.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Outcome class of a failed property set, mirroring the classes reported by
/// the C client's configuration setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfRes {
    /// The property name is not known for this kind of configuration object.
    Unknown,
    /// The property is known, but the value (or the moment) is not acceptable.
    Invalid,
}

/// Represents all possible configuration errors.
///
/// Every error is reported synchronously by the setter that triggered it, and
/// the instance is left as it was before the call.
#[derive(Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The property name is not in the descriptor table at all.
    UnknownProperty(String),
    /// The property exists, but not for this kind of configuration object.
    ScopeViolation {
        /// Property name.
        name: String,
        /// Kind of the instance the set was attempted on.
        kind: InstanceKind,
    },
    /// A numeric value is outside the bounds declared by the descriptor.
    RangeError {
        /// Property name.
        name: String,
        /// The rejected value.
        value: i64,
        /// Lower bound, inclusive.
        min: i32,
        /// Upper bound, inclusive.
        max: i32,
    },
    /// An enumerated or flags property received an unknown symbol.
    UnknownEnumValue {
        /// Property name.
        name: String,
        /// The rejected symbol.
        value: String,
        /// The symbols the property accepts.
        valid: Vec<&'static str>,
    },
    /// The property (or value) is valid, but the capability it needs is not
    /// available in this registry.
    FeatureUnavailable {
        /// Property name.
        name: String,
        /// The missing capability.
        feature: Feature,
    },
    /// The value cannot be interpreted for the property kind.
    InvalidValue {
        /// Property name.
        name: String,
        /// Human readable reason.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Replaces the property name the error refers to.
    pub(crate) fn for_property(mut self, property: &str) -> ConfigError {
        match self {
            ConfigError::UnknownProperty(ref mut name)
            | ConfigError::ScopeViolation { ref mut name, .. }
            | ConfigError::RangeError { ref mut name, .. }
            | ConfigError::UnknownEnumValue { ref mut name, .. }
            | ConfigError::FeatureUnavailable { ref mut name, .. }
            | ConfigError::InvalidValue { ref mut name, .. } => {
                if name != property {
                    *name = property.to_string();
                }
            }
        }
        self
    }

    /// Returns the outcome class of the error.
    pub fn conf_res(&self) -> ConfRes {
        match self {
            ConfigError::UnknownProperty(_) | ConfigError::ScopeViolation { .. } => ConfRes::Unknown,
            ConfigError::RangeError { .. }
            | ConfigError::UnknownEnumValue { .. }
            | ConfigError::FeatureUnavailable { .. }
            | ConfigError::InvalidValue { .. } => ConfRes::Invalid,
        }
    }

    /// Returns the name of the property the error refers to.
    pub fn property(&self) -> &str {
        match self {
            ConfigError::UnknownProperty(name)
            | ConfigError::ScopeViolation { name, .. }
            | ConfigError::RangeError { name, .. }
            | ConfigError::UnknownEnumValue { name, .. }
            | ConfigError::FeatureUnavailable { name, .. }
            | ConfigError::InvalidValue { name, .. } => name,
        }
    }
}

impl fmt::Debug for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConfigError ({})", self)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::UnknownProperty(ref name) => {
                write!(f, "No such configuration property: \"{}\"", name)
            }
            ConfigError::ScopeViolation { ref name, kind } => write!(
                f,
                "Configuration property \"{}\" cannot be set on {} configuration",
                name, kind
            ),
            ConfigError::RangeError {
                ref name,
                value,
                min,
                max,
            } => write!(
                f,
                "Configuration property \"{}\" value {} is outside allowed range {}..{}",
                name, value, min, max
            ),
            ConfigError::UnknownEnumValue {
                ref name,
                ref value,
                ref valid,
            } => write!(
                f,
                "Invalid value \"{}\" for configuration property \"{}\" (valid values: {})",
                value,
                name,
                valid.join(", ")
            ),
            ConfigError::FeatureUnavailable { ref name, feature } => write!(
                f,
                "Configuration property \"{}\" requires {} support, which is not available",
                name, feature
            ),
            ConfigError::InvalidValue {
                ref name,
                ref reason,
            } => write!(
                f,
                "Invalid value for configuration property \"{}\": {}",
                name, reason
            ),
        }
    }
}

impl error::Error for ConfigError {}

/// Error codes handed to the callbacks registered in a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Message timed out before delivery.
    MessageTimedOut,
    /// Broker transport failure.
    BrokerTransportFailure,
    /// All brokers are down.
    AllBrokersDown,
    /// Producer queue is full.
    QueueFull,
    /// Offset commit failed.
    CommitFailed,
    /// Any other code, as reported by the broker or the client runtime.
    Other(i32),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorCode::MessageTimedOut => write!(f, "Message timed out"),
            ErrorCode::BrokerTransportFailure => write!(f, "Broker transport failure"),
            ErrorCode::AllBrokersDown => write!(f, "All brokers are down"),
            ErrorCode::QueueFull => write!(f, "Queue full"),
            ErrorCode::CommitFailed => write!(f, "Commit failed"),
            ErrorCode::Other(code) => write!(f, "Error code {}", code),
        }
    }
}

impl error::Error for ErrorCode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conf_res_classes() {
        let unknown = ConfigError::UnknownProperty("no.such".into());
        assert_eq!(unknown.conf_res(), ConfRes::Unknown);
        assert_eq!(unknown.property(), "no.such");

        let range = ConfigError::RangeError {
            name: "log_level".into(),
            value: 9,
            min: 0,
            max: 7,
        };
        assert_eq!(range.conf_res(), ConfRes::Invalid);
        assert_eq!(
            range.to_string(),
            "Configuration property \"log_level\" value 9 is outside allowed range 0..7"
        );
    }

    #[test]
    fn enum_error_lists_options() {
        let err = ConfigError::UnknownEnumValue {
            name: "broker.address.family".into(),
            value: "v5".into(),
            valid: vec!["any", "v4", "v6"],
        };
        assert!(err.to_string().contains("any, v4, v6"));
        assert!(format!("{:?}", err).starts_with("ConfigError ("));
    }
}
