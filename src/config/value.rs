//! Conversion of property text into typed values, and back.

use std::fmt;

use zeroize::Zeroizing;

use crate::config::features::{Capabilities, Feature};
use crate::config::property::{DefaultValue, EnumSymbol, PropertyDescriptor, ValueKind};
use crate::error::{ConfigError, ConfigResult};
use crate::pattern::PatternList;
use crate::util::split_list;

/// Keyword selecting every flag of a flags property.
const ALL_FLAGS: &str = "all";

/// A string in the length-prefixed form used by the Kafka protocol: a
/// big-endian `i16` length followed by the bytes of the string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KafkaStr {
    buf: Box<[u8]>,
}

impl KafkaStr {
    /// Protocol encoding of a null string.
    pub const NULL: [u8; 2] = (-1i16).to_be_bytes();

    /// Encodes a string, or returns `None` if it is too long for the
    /// protocol's `i16` length prefix.
    pub fn new(s: &str) -> Option<KafkaStr> {
        let len = i16::try_from(s.len()).ok()?;
        let mut buf = Vec::with_capacity(2 + s.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(s.as_bytes());
        Some(KafkaStr {
            buf: buf.into_boxed_slice(),
        })
    }

    /// The string, without the length prefix.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[2..]).unwrap_or_default()
    }

    /// Length of the string in bytes, without the prefix.
    pub fn len(&self) -> usize {
        self.buf.len() - 2
    }

    /// Returns `true` if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full protocol encoding, prefix included.
    pub fn as_wire(&self) -> &[u8] {
        &self.buf
    }
}

impl fmt::Debug for KafkaStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KafkaStr({:?})", self.as_str())
    }
}

impl fmt::Display for KafkaStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owned string value, plus its protocol encoding for properties that
/// are sent on the wire. Both are built together and never diverge.
#[derive(Clone, PartialEq, Eq)]
pub struct StrValue {
    text: Zeroizing<String>,
    wire: Option<KafkaStr>,
}

impl StrValue {
    fn new(text: &str, wire: bool) -> Option<StrValue> {
        let wire = if wire {
            Some(KafkaStr::new(text)?)
        } else {
            None
        };
        Some(StrValue {
            text: Zeroizing::new(text.to_string()),
            wire,
        })
    }

    /// The string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The protocol encoding, if the property is sent on the wire.
    pub fn wire(&self) -> Option<&KafkaStr> {
        self.wire.as_ref()
    }
}

impl fmt::Debug for StrValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StrValue")
            .field("len", &self.text.len())
            .field("wire", &self.wire.is_some())
            .finish()
    }
}

/// The typed, in-memory value of a property.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Integer.
    Int(i32),
    /// Boolean.
    Bool(bool),
    /// Enumerated value, by number.
    Enum(i32),
    /// Bitset of flags.
    Flags(u32),
    /// String, `None` when unset.
    Str(Option<StrValue>),
    /// Pattern list, `None` when unset.
    Patterns(Option<PatternList>),
    /// Marker for callbacks and opaques, which live outside the store.
    Pointer,
}

impl Value {
    /// Numeric view of integer, boolean, enum and flags values.
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Value::Int(v) | Value::Enum(v) => Some(v),
            Value::Bool(b) => Some(b as i32),
            Value::Flags(f) => Some(f as i32),
            _ => None,
        }
    }

    pub(crate) fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub(crate) fn is_wire_str(&self) -> bool {
        matches!(self, Value::Str(Some(s)) if s.wire.is_some())
    }

    pub(crate) fn is_patterns(&self) -> bool {
        matches!(self, Value::Patterns(_))
    }

    /// Drops any owned resource held by the value, leaving it unset.
    /// Returns `false` if there was nothing to drop.
    pub(crate) fn release(&mut self) -> bool {
        match self {
            Value::Str(s) => s.take().is_some(),
            Value::Patterns(p) => p.take().is_some(),
            _ => false,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

/// Parses a decimal integer. Numbers too large for an `i64` saturate, so
/// they still fail the range check rather than the syntax check.
fn parse_int(text: &str) -> Option<i64> {
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

fn find_symbol<'a>(symbols: &'a [EnumSymbol], raw: &str) -> Option<&'a EnumSymbol> {
    let raw = raw.trim();
    symbols.iter().find(|s| s.name.eq_ignore_ascii_case(raw))
}

fn all_flags(symbols: &[&str]) -> u32 {
    (0..symbols.len()).fold(0, |acc, i| acc | (1u32 << i))
}

fn capability_flags(symbols: &[&str], caps: &Capabilities) -> u32 {
    symbols
        .iter()
        .enumerate()
        .filter(|(_, name)| match **name {
            "ssl" => caps.is_available(Feature::Ssl),
            "sasl" => caps.is_available(Feature::Sasl),
            _ => true,
        })
        .fold(0, |acc, (i, _)| acc | (1u32 << i))
}

fn unknown_symbol(desc: &PropertyDescriptor, raw: &str, valid: Vec<&'static str>) -> ConfigError {
    ConfigError::UnknownEnumValue {
        name: desc.name.to_string(),
        value: raw.trim().to_string(),
        valid,
    }
}

/// Converts the textual form of a property into its typed value.
///
/// The descriptor must already have passed the scope and capability checks;
/// this only validates the value itself.
pub fn coerce(desc: &PropertyDescriptor, raw: &str, caps: &Capabilities) -> ConfigResult<Value> {
    match desc.kind {
        ValueKind::Int { min, max } => {
            let v = parse_int(raw.trim()).ok_or_else(|| {
                ConfigError::invalid(desc.name, format!("\"{}\" is not an integer", raw.trim()))
            })?;
            if v < i64::from(min) || v > i64::from(max) {
                return Err(ConfigError::RangeError {
                    name: desc.name.to_string(),
                    value: v,
                    min,
                    max,
                });
            }
            Ok(Value::Int(v as i32))
        }
        ValueKind::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| unknown_symbol(desc, raw, vec!["true", "false"])),
        ValueKind::Enum(symbols) => {
            let symbol = find_symbol(symbols, raw).ok_or_else(|| {
                unknown_symbol(desc, raw, symbols.iter().map(|s| s.name).collect())
            })?;
            if let Some(feature) = symbol.feature {
                caps.require(feature, desc.name)?;
            }
            Ok(Value::Enum(symbol.value))
        }
        ValueKind::Flags(symbols) => {
            let mut flags = 0u32;
            for name in split_list(raw) {
                if name.eq_ignore_ascii_case(ALL_FLAGS) {
                    flags |= all_flags(symbols);
                    continue;
                }
                match symbols.iter().position(|s| s.eq_ignore_ascii_case(name)) {
                    Some(i) => flags |= 1u32 << i,
                    None => {
                        let mut valid = symbols.to_vec();
                        valid.push(ALL_FLAGS);
                        return Err(unknown_symbol(desc, name, valid));
                    }
                }
            }
            Ok(Value::Flags(flags))
        }
        ValueKind::Str { wire } => StrValue::new(raw, wire)
            .map(|s| Value::Str(Some(s)))
            .ok_or_else(|| ConfigError::invalid(desc.name, "string is too long for the protocol")),
        ValueKind::Patterns => {
            if raw.trim().is_empty() {
                return Ok(Value::Patterns(None));
            }
            PatternList::parse(raw)
                .map(|p| Value::Patterns(Some(p)))
                .map_err(|e| ConfigError::invalid(desc.name, e.to_string()))
        }
        ValueKind::Pointer => Err(ConfigError::invalid(
            desc.name,
            "property must be set through its dedicated setter",
        )),
        ValueKind::Alias(target) => Err(ConfigError::invalid(
            desc.name,
            format!("alias of \"{}\" was not resolved", target),
        )),
    }
}

/// Returns the canonical textual form of a value.
pub fn to_text(desc: &PropertyDescriptor, value: &Value) -> String {
    match (desc.kind, value) {
        (ValueKind::Enum(symbols), Value::Enum(v)) => symbols
            .iter()
            .find(|s| s.value == *v)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| v.to_string()),
        (ValueKind::Flags(symbols), Value::Flags(flags)) => {
            if !desc.read_only && *flags != 0 && *flags == all_flags(symbols) {
                return ALL_FLAGS.to_string();
            }
            symbols
                .iter()
                .enumerate()
                .filter(|(i, _)| *flags & (1u32 << *i) != 0)
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(",")
        }
        (_, Value::Int(v)) | (_, Value::Enum(v)) => v.to_string(),
        (_, Value::Flags(f)) => f.to_string(),
        (_, Value::Bool(b)) => b.to_string(),
        (_, Value::Str(s)) => s.as_ref().map(|s| s.as_str().to_string()).unwrap_or_default(),
        (_, Value::Patterns(p)) => p.as_ref().map(|p| p.to_string()).unwrap_or_default(),
        (_, Value::Pointer) => String::new(),
    }
}

/// Returns the default value of a property.
pub fn default_value(desc: &PropertyDescriptor, caps: &Capabilities) -> Value {
    match (desc.kind, desc.default) {
        (ValueKind::Int { .. }, DefaultValue::Int(v)) => Value::Int(v),
        (ValueKind::Bool, DefaultValue::Int(v)) => Value::Bool(v != 0),
        (ValueKind::Enum(_), DefaultValue::Int(v)) => Value::Enum(v),
        (ValueKind::Flags(_), DefaultValue::Int(v)) => Value::Flags(v as u32),
        (ValueKind::Flags(symbols), DefaultValue::Capabilities) => {
            Value::Flags(capability_flags(symbols, caps))
        }
        (ValueKind::Str { wire }, DefaultValue::Str(Some(s))) => Value::Str(StrValue::new(s, wire)),
        (ValueKind::Patterns, DefaultValue::Str(Some(s))) => {
            Value::Patterns(PatternList::parse(s).ok())
        }
        (ValueKind::Str { .. }, _) => Value::Str(None),
        (ValueKind::Patterns, _) => Value::Patterns(None),
        (ValueKind::Int { .. }, _) => Value::Int(0),
        (ValueKind::Bool, _) => Value::Bool(false),
        (ValueKind::Enum(_), _) => Value::Enum(0),
        (ValueKind::Flags(_), _) => Value::Flags(0),
        (ValueKind::Pointer, _) | (ValueKind::Alias(_), _) => Value::Pointer,
    }
}
