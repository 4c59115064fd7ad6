//! Property descriptors: the immutable description of every tunable.

use std::fmt;

use serde::Serialize;

use crate::config::features::Feature;

/// The kind of configuration object a property can be stored on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceKind {
    /// Client-level configuration ([`ClientConfig`](crate::config::ClientConfig)).
    Client,
    /// Topic-level configuration ([`TopicConfig`](crate::config::TopicConfig)).
    Topic,
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InstanceKind::Client => write!(f, "client"),
            InstanceKind::Topic => write!(f, "topic"),
        }
    }
}

/// Which kind of client a property is meaningful for. Informational only:
/// the registry enforces the instance kind, not the role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Producers and consumers alike.
    Any,
    /// Producers only.
    Producer,
    /// Consumers only.
    Consumer,
    /// Consumer group members only.
    Group,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Role::Any => write!(f, "any"),
            Role::Producer => write!(f, "producer"),
            Role::Consumer => write!(f, "consumer"),
            Role::Group => write!(f, "group"),
        }
    }
}

/// Scope of a property: the instance kind it lives on and the role it serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Scope {
    /// Instance kind the property can be set on.
    pub kind: InstanceKind,
    /// Role the property applies to.
    pub role: Role,
}

impl Scope {
    /// Client-level, any role.
    pub const GLOBAL: Scope = Scope::new(InstanceKind::Client, Role::Any);
    /// Client-level, producer.
    pub const PRODUCER: Scope = Scope::new(InstanceKind::Client, Role::Producer);
    /// Client-level, consumer.
    pub const CONSUMER: Scope = Scope::new(InstanceKind::Client, Role::Consumer);
    /// Client-level, consumer group.
    pub const CGRP: Scope = Scope::new(InstanceKind::Client, Role::Group);
    /// Topic-level, any role.
    pub const TOPIC: Scope = Scope::new(InstanceKind::Topic, Role::Any);
    /// Topic-level, producer.
    pub const TOPIC_PRODUCER: Scope = Scope::new(InstanceKind::Topic, Role::Producer);
    /// Topic-level, consumer.
    pub const TOPIC_CONSUMER: Scope = Scope::new(InstanceKind::Topic, Role::Consumer);

    const fn new(kind: InstanceKind, role: Role) -> Scope {
        Scope { kind, role }
    }

    /// Returns `true` if a property with this scope can be stored on an
    /// instance of the given kind.
    pub fn applies_to(&self, kind: InstanceKind) -> bool {
        match (self.kind, kind) {
            (InstanceKind::Client, InstanceKind::Client) => true,
            (InstanceKind::Topic, InstanceKind::Topic) => true,
            (InstanceKind::Client, InstanceKind::Topic) => false,
            (InstanceKind::Topic, InstanceKind::Client) => false,
        }
    }
}

/// A symbol of an enumerated property.
#[derive(Clone, Copy, Debug)]
pub struct EnumSymbol {
    /// Textual symbol, matched case-insensitively.
    pub name: &'static str,
    /// Numeric value. Several symbols may share one value; the first one in
    /// table order is the canonical form.
    pub value: i32,
    /// Capability required to select this symbol.
    pub feature: Option<Feature>,
}

impl EnumSymbol {
    pub(crate) const fn new(name: &'static str, value: i32) -> EnumSymbol {
        EnumSymbol {
            name,
            value,
            feature: None,
        }
    }

    pub(crate) const fn gated(name: &'static str, value: i32, feature: Feature) -> EnumSymbol {
        EnumSymbol {
            name,
            value,
            feature: Some(feature),
        }
    }
}

/// The type of a property value.
#[derive(Clone, Copy, Debug)]
pub enum ValueKind {
    /// Integer with inclusive bounds.
    Int {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },
    /// Boolean.
    Bool,
    /// Enumerated symbol.
    Enum(&'static [EnumSymbol]),
    /// Set of flags, bit `i` corresponding to entry `i`. The keyword `all`
    /// selects every flag.
    Flags(&'static [&'static str]),
    /// Owned string; `wire` strings are also kept in protocol encoding.
    Str {
        /// Whether the string is sent on the wire as a protocol string.
        wire: bool,
    },
    /// Comma-separated list of regular expressions.
    Patterns,
    /// Callback or opaque pointer, only settable through dedicated setters.
    Pointer,
    /// Alternative name for another property of the same instance kind.
    Alias(&'static str),
}

impl ValueKind {
    /// Short name of the kind, as shown in property listings.
    pub fn type_name(&self) -> &'static str {
        match *self {
            ValueKind::Int { .. } => "integer",
            ValueKind::Bool => "boolean",
            ValueKind::Enum(_) => "enum",
            ValueKind::Flags(_) => "flags",
            ValueKind::Str { .. } => "string",
            ValueKind::Patterns => "pattern list",
            ValueKind::Pointer => "pointer",
            ValueKind::Alias(_) => "alias",
        }
    }
}

/// Default value of a property.
#[derive(Clone, Copy, Debug)]
pub enum DefaultValue {
    /// Numeric default, used by integer, boolean, enum and flags kinds.
    Int(i32),
    /// String default; `None` leaves the string unset.
    Str(Option<&'static str>),
    /// The flags of the capabilities present in the registry.
    Capabilities,
    /// No default (pointers and aliases).
    None,
}

/// How a topic property falls back to its client-level counterpart.
#[derive(Clone, Copy, Debug)]
pub struct Inherit {
    /// Name of the client-level property.
    pub from: &'static str,
    /// Value that explicitly requests the client-level value.
    pub sentinel: Option<i32>,
}

/// Immutable description of a configuration property.
#[derive(Clone, Copy, Debug)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: &'static str,
    /// Where the property can be set.
    pub scope: Scope,
    /// Value type, with range or symbol table.
    pub kind: ValueKind,
    /// Default value.
    pub default: DefaultValue,
    /// Capability the property requires.
    pub feature: Option<Feature>,
    /// The value is a secret and must not be logged or dumped.
    pub sensitive: bool,
    /// The property can be read but not set.
    pub read_only: bool,
    /// Client-level fallback for topic properties.
    pub inherit: Option<Inherit>,
    /// One line description.
    pub description: &'static str,
}

impl PropertyDescriptor {
    const fn base(
        name: &'static str,
        scope: Scope,
        kind: ValueKind,
        default: DefaultValue,
        description: &'static str,
    ) -> PropertyDescriptor {
        PropertyDescriptor {
            name,
            scope,
            kind,
            default,
            feature: None,
            sensitive: false,
            read_only: false,
            inherit: None,
            description,
        }
    }

    pub(crate) const fn int(
        name: &'static str,
        scope: Scope,
        min: i32,
        max: i32,
        default: i32,
        description: &'static str,
    ) -> PropertyDescriptor {
        let kind = ValueKind::Int { min, max };
        PropertyDescriptor::base(name, scope, kind, DefaultValue::Int(default), description)
    }

    pub(crate) const fn boolean(
        name: &'static str,
        scope: Scope,
        default: bool,
        description: &'static str,
    ) -> PropertyDescriptor {
        let default = DefaultValue::Int(default as i32);
        PropertyDescriptor::base(name, scope, ValueKind::Bool, default, description)
    }

    pub(crate) const fn enumeration(
        name: &'static str,
        scope: Scope,
        symbols: &'static [EnumSymbol],
        default: i32,
        description: &'static str,
    ) -> PropertyDescriptor {
        let kind = ValueKind::Enum(symbols);
        PropertyDescriptor::base(name, scope, kind, DefaultValue::Int(default), description)
    }

    pub(crate) const fn flags(
        name: &'static str,
        scope: Scope,
        symbols: &'static [&'static str],
        default: i32,
        description: &'static str,
    ) -> PropertyDescriptor {
        let kind = ValueKind::Flags(symbols);
        PropertyDescriptor::base(name, scope, kind, DefaultValue::Int(default), description)
    }

    pub(crate) const fn string(
        name: &'static str,
        scope: Scope,
        default: Option<&'static str>,
        description: &'static str,
    ) -> PropertyDescriptor {
        let kind = ValueKind::Str { wire: false };
        PropertyDescriptor::base(name, scope, kind, DefaultValue::Str(default), description)
    }

    pub(crate) const fn patterns(
        name: &'static str,
        scope: Scope,
        description: &'static str,
    ) -> PropertyDescriptor {
        let default = DefaultValue::Str(None);
        PropertyDescriptor::base(name, scope, ValueKind::Patterns, default, description)
    }

    pub(crate) const fn pointer(
        name: &'static str,
        scope: Scope,
        description: &'static str,
    ) -> PropertyDescriptor {
        let default = DefaultValue::None;
        PropertyDescriptor::base(name, scope, ValueKind::Pointer, default, description)
    }

    pub(crate) const fn alias(
        name: &'static str,
        scope: Scope,
        target: &'static str,
    ) -> PropertyDescriptor {
        let kind = ValueKind::Alias(target);
        PropertyDescriptor::base(name, scope, kind, DefaultValue::None, "Alias")
    }

    pub(crate) const fn wire(self) -> PropertyDescriptor {
        PropertyDescriptor {
            kind: ValueKind::Str { wire: true },
            ..self
        }
    }

    pub(crate) const fn secret(self) -> PropertyDescriptor {
        PropertyDescriptor {
            sensitive: true,
            ..self
        }
    }

    pub(crate) const fn read_only(self, default: DefaultValue) -> PropertyDescriptor {
        PropertyDescriptor {
            read_only: true,
            default,
            ..self
        }
    }

    pub(crate) const fn requires(self, feature: Feature) -> PropertyDescriptor {
        PropertyDescriptor {
            feature: Some(feature),
            ..self
        }
    }

    pub(crate) const fn inherits(
        self,
        from: &'static str,
        sentinel: Option<i32>,
    ) -> PropertyDescriptor {
        PropertyDescriptor {
            inherit: Some(Inherit { from, sentinel }),
            ..self
        }
    }

    /// Returns `true` if the property is an alias for another property.
    pub fn is_alias(&self) -> bool {
        matches!(self.kind, ValueKind::Alias(_))
    }

    /// Returns `true` if the property is a callback or opaque pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, ValueKind::Pointer)
    }

    /// Returns the metadata of the property in a serializable form.
    pub fn info(&self) -> PropertyInfo {
        let (min, max) = match self.kind {
            ValueKind::Int { min, max } => (Some(min), Some(max)),
            _ => (None, None),
        };
        let values = match self.kind {
            ValueKind::Enum(symbols) => symbols.iter().map(|s| s.name).collect(),
            ValueKind::Flags(symbols) => symbols.to_vec(),
            ValueKind::Bool => vec!["true", "false"],
            _ => Vec::new(),
        };
        let default = match self.default {
            DefaultValue::Int(v) => match self.kind {
                ValueKind::Bool => Some((v != 0).to_string()),
                ValueKind::Enum(symbols) => symbols
                    .iter()
                    .find(|s| s.value == v)
                    .map(|s| s.name.to_string()),
                _ => Some(v.to_string()),
            },
            DefaultValue::Str(s) => s.map(str::to_string),
            DefaultValue::Capabilities | DefaultValue::None => None,
        };
        PropertyInfo {
            name: self.name,
            scope: self.scope,
            kind: self.kind.type_name(),
            min,
            max,
            values,
            default,
            feature: self.feature,
            alias_of: match self.kind {
                ValueKind::Alias(target) => Some(target),
                _ => None,
            },
            description: self.description,
        }
    }
}

/// Serializable metadata about a property, used for documentation output.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyInfo {
    /// Property name.
    pub name: &'static str,
    /// Property scope.
    pub scope: Scope,
    /// Value kind name.
    pub kind: &'static str,
    /// Lower bound, for integers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    /// Upper bound, for integers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
    /// Accepted symbols, for enums, flags and booleans.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<&'static str>,
    /// Default value in text form.
    pub default: Option<String>,
    /// Required capability.
    pub feature: Option<Feature>,
    /// Target property, for aliases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<&'static str>,
    /// One line description.
    pub description: &'static str,
}
