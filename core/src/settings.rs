//! Per-option declaration settings.

use serde::{Deserialize, Serialize};

use crate::{KindHint, Value, ValueKind};

/// Type given in a declaration: either an already-resolved kind or a textual
/// tag that is resolved (and possibly rejected) when the option is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeSpec {
    Kind(ValueKind),
    Tag(String),
}

impl From<String> for TypeSpec {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<TypeSpec> for String {
    fn from(spec: TypeSpec) -> Self {
        match spec {
            TypeSpec::Kind(kind) => kind.tag().to_string(),
            TypeSpec::Tag(tag) => tag,
        }
    }
}

/// Settings for one option declaration.
///
/// Every field is optional; the registry fills in the long flag from the
/// option name, infers the type from the default and picks a short flag on
/// first parse.
///
/// # Examples
///
/// ```
/// use optscan_core::{OptionSettings, ValueKind};
///
/// let settings = OptionSettings::new()
///     .short("n")
///     .kind(ValueKind::Ints)
///     .multi()
///     .required();
/// assert_eq!(settings.short.as_deref(), Some("n"));
/// assert!(settings.multi && settings.required);
///
/// let hinted = OptionSettings::new().kind_of::<f64>();
/// assert_eq!(hinted, OptionSettings::new().kind(ValueKind::Float));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSettings {
    /// Long flag text, with or without the leading `--`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Short flag: a single character, `-X`, or `"none"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Explicit type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeSpec>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allow the switch to appear several times.
    pub multi: bool,
    /// Require the switch to appear.
    pub required: bool,
}

impl OptionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the long flag text.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Sets the short flag (`"x"`, `"-x"` or `"none"`).
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    /// Suppresses automatic short flag assignment.
    pub fn no_short(self) -> Self {
        self.short("none")
    }

    /// Sets the type.
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(TypeSpec::Kind(kind));
        self
    }

    /// Sets the type from a textual tag such as `"integer"` or `"strings"`.
    pub fn type_tag(mut self, tag: impl Into<String>) -> Self {
        self.kind = Some(TypeSpec::Tag(tag.into()));
        self
    }

    /// Sets the type from a Rust type, e.g. `kind_of::<i64>()`.
    pub fn kind_of<T: KindHint + ?Sized>(self) -> Self {
        self.kind(T::KIND)
    }

    /// Sets the default value; the type is inferred from it when not given.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
