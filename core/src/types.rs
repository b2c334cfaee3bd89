//! Type definitions for option declarations and parsed values.
//!
//! This module defines the data model shared by the registry, the scanner and
//! the coercer: the closed set of option types ([`ValueKind`]), the typed
//! values they produce ([`Value`]), and the stored declaration of an option
//! ([`OptionSpec`]).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DefinitionError;

/// How many parameters one occurrence of an option takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Boolean flag, no parameter.
    None,
    /// Exactly one parameter per occurrence.
    Single,
    /// Every parameter collected after the switch.
    Multi,
}

/// The type of an option.
///
/// Each variant knows its [`Arity`] and, for the plural kinds, the element
/// kind its parameters are coerced to. Type tags are parsed with
/// [`FromStr`], which also accepts the common synonyms.
///
/// # Examples
///
/// ```
/// use optscan_core::{Arity, ValueKind};
///
/// let kind: ValueKind = "integers".parse().unwrap();
/// assert_eq!(kind, ValueKind::Ints);
/// assert_eq!(kind.arity(), Arity::Multi);
/// assert_eq!(kind.element(), ValueKind::Int);
///
/// assert_eq!("bool".parse::<ValueKind>().unwrap(), ValueKind::Flag);
/// assert!("widget".parse::<ValueKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ValueKind {
    /// Boolean switch.
    Flag,
    /// Unsigned integer literal.
    Int,
    /// Several integers per occurrence.
    Ints,
    /// Free text.
    String,
    /// Several strings per occurrence.
    Strings,
    /// Signed decimal number.
    Float,
    /// Several decimal numbers per occurrence.
    Floats,
    /// Calendar date.
    Date,
    /// Several dates per occurrence.
    Dates,
    /// Reserved: file or URI handle. Not accepted by declarations.
    Io,
    /// Reserved: several file or URI handles. Not accepted by declarations.
    Ios,
}

impl ValueKind {
    /// Canonical lowercase tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Int => "int",
            Self::Ints => "ints",
            Self::String => "string",
            Self::Strings => "strings",
            Self::Float => "float",
            Self::Floats => "floats",
            Self::Date => "date",
            Self::Dates => "dates",
            Self::Io => "io",
            Self::Ios => "ios",
        }
    }

    /// Number of parameters one occurrence takes.
    pub fn arity(self) -> Arity {
        match self {
            Self::Flag => Arity::None,
            Self::Int | Self::String | Self::Float | Self::Date | Self::Io => Arity::Single,
            Self::Ints | Self::Strings | Self::Floats | Self::Dates | Self::Ios => Arity::Multi,
        }
    }

    /// The kind each parameter is coerced to (identity for singular kinds).
    pub fn element(self) -> Self {
        match self {
            Self::Ints => Self::Int,
            Self::Strings => Self::String,
            Self::Floats => Self::Float,
            Self::Dates => Self::Date,
            Self::Ios => Self::Io,
            other => other,
        }
    }

    /// The plural counterpart of a singular kind, if there is one.
    pub fn plural(self) -> Option<Self> {
        match self {
            Self::Int => Some(Self::Ints),
            Self::String => Some(Self::Strings),
            Self::Float => Some(Self::Floats),
            Self::Date => Some(Self::Dates),
            Self::Io => Some(Self::Ios),
            _ => None,
        }
    }

    /// Whether the kind is reserved and rejected at declaration time.
    pub fn is_reserved(self) -> bool {
        matches!(self, Self::Io | Self::Ios)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ValueKind {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flag" | "boolean" | "bool" => Ok(Self::Flag),
            "int" | "integer" => Ok(Self::Int),
            "ints" | "integers" => Ok(Self::Ints),
            "string" => Ok(Self::String),
            "strings" => Ok(Self::Strings),
            "float" | "double" => Ok(Self::Float),
            "floats" | "doubles" => Ok(Self::Floats),
            "date" => Ok(Self::Date),
            "dates" => Ok(Self::Dates),
            "io" => Ok(Self::Io),
            "ios" => Ok(Self::Ios),
            _ => Err(DefinitionError::UnsupportedType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ValueKind {
    type Error = DefinitionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Maps a native Rust type to the option type it stands for.
///
/// Used by [`OptionSettings::kind_of`](crate::OptionSettings::kind_of) so an
/// option can be declared as `kind_of::<i64>()` instead of spelling a tag.
pub trait KindHint {
    /// The option type this Rust type maps to.
    const KIND: ValueKind;
}

macro_rules! kind_hint {
    ($kind:expr => $($ty:ty),+) => {
        $(impl KindHint for $ty {
            const KIND: ValueKind = $kind;
        })+
    };
}

kind_hint!(ValueKind::Flag => bool);
kind_hint!(ValueKind::String => String, &str);
kind_hint!(ValueKind::Int => i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
kind_hint!(ValueKind::Float => f32, f64);
kind_hint!(ValueKind::Date => NaiveDate);

/// A typed option value: a default or the coerced result of parsing.
///
/// Values serialize untagged (dates as `YYYY-MM-DD`), so a result mapping
/// renders as plain JSON or YAML. Deserialization accepts plain scalars and
/// sequences; text is always read as [`Value::Str`].
///
/// # Examples
///
/// ```
/// use optscan_core::Value;
///
/// let v = Value::from(vec![1, 2, 3]);
/// assert_eq!(v.as_list().map(|l| l.len()), Some(3));
/// assert_eq!(v.to_string(), "1, 2, 3");
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// No value (an option without a default that was not supplied).
    Null,
    /// Boolean flag state.
    Flag(bool),
    /// Integer.
    Int(i64),
    /// Decimal number.
    Float(f64),
    /// Text.
    Str(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Whether a help renderer should show this value as a default.
    ///
    /// Null and `false` are not worth showing; everything else is.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Flag(false))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

macro_rules! int_value {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })+
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// Wire shape accepted when reading values from JSON or YAML.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Null,
    Flag(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<RawValue>),
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => Self::Null,
            RawValue::Flag(b) => Self::Flag(b),
            RawValue::Int(i) => Self::Int(i),
            RawValue::Float(f) => Self::Float(f),
            RawValue::Str(s) => Self::Str(s),
            RawValue::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawValue::deserialize(deserializer).map(Self::from)
    }
}

/// Short flag assignment for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortFlag {
    /// Not declared; a letter from the long flag is picked on first parse.
    #[default]
    Auto,
    /// Explicitly suppressed (`"none"`).
    None,
    /// Assigned character.
    Char(char),
}

impl ShortFlag {
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            _ => None,
        }
    }
}

/// A registered option.
///
/// Produced by [`Registry::define`](crate::Registry::define) once the type,
/// flags and default have been resolved and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Unique identifier and result key.
    pub name: String,
    /// Long flag text without leading dashes.
    pub long: String,
    /// Short flag.
    pub short: ShortFlag,
    /// Resolved option type.
    pub kind: ValueKind,
    /// Whether the switch may be given more than once.
    pub multi: bool,
    /// Whether the switch must be given.
    pub required: bool,
    /// Effective default ([`Value::Null`] when none).
    pub default: Value,
    /// Free-text description.
    pub description: String,
}

impl OptionSpec {
    /// `--long` form used in messages.
    pub fn long_switch(&self) -> String {
        format!("--{}", self.long)
    }
}

/// One item of the declaration sequence.
///
/// Options and banner text are kept interleaved in declaration order so a
/// renderer can reproduce the layout the caller wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A declared option, by name.
    Option(String),
    /// Banner or free text.
    Text(String),
}

/// Relationship between a group of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    /// If any member is given, every member must be given.
    Depends,
    /// If any member is given, no other member may be given.
    Conflicts,
}

/// A validated constraint over registered option names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_synonyms() {
        assert_eq!("boolean".parse::<ValueKind>().unwrap(), ValueKind::Flag);
        assert_eq!("integer".parse::<ValueKind>().unwrap(), ValueKind::Int);
        assert_eq!("doubles".parse::<ValueKind>().unwrap(), ValueKind::Floats);
        assert_eq!("DATE".parse::<ValueKind>().unwrap(), ValueKind::Date);
    }

    #[test]
    fn test_kind_arity_and_element() {
        assert_eq!(ValueKind::Flag.arity(), Arity::None);
        assert_eq!(ValueKind::Date.arity(), Arity::Single);
        assert_eq!(ValueKind::Strings.arity(), Arity::Multi);
        assert_eq!(ValueKind::Dates.element(), ValueKind::Date);
        assert_eq!(ValueKind::Float.plural(), Some(ValueKind::Floats));
        assert_eq!(ValueKind::Flag.plural(), None);
    }

    #[test]
    fn test_kind_hint_constants() {
        assert_eq!(<u16 as KindHint>::KIND, ValueKind::Int);
        assert_eq!(<&str as KindHint>::KIND, ValueKind::String);
        assert_eq!(<NaiveDate as KindHint>::KIND, ValueKind::Date);
    }

    #[test]
    fn test_value_deserializes_plain_scalars() {
        let v: Value = serde_json::from_str(r#"[1, 2.5, "x", true, null]"#).unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Str("x".into()),
                Value::Flag(true),
                Value::Null,
            ])
        );
    }

    #[test]
    fn test_value_serializes_untagged() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let v = Value::List(vec![Value::Date(date), Value::Int(4)]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["2024-03-09",4]"#);
    }

    #[test]
    fn test_value_truthiness() {
        assert!(!Value::Flag(false).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::List(Vec::new()).is_truthy());
    }
}
