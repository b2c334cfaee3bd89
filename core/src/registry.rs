//! Option registry.
//!
//! Owns every [`OptionSpec`] together with the long-flag and short-flag
//! indices, and the declaration order of options and banner text. The
//! indices are only reachable through validated insertion and lookup.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{DefinitionError, Result};
use crate::resolve::resolve_kind;
use crate::{Entry, OptionSettings, OptionSpec, ShortFlag, Value, ValueKind};

static LONG_WITH_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--([^-].*)$").expect("static regex must compile"));
static SHORT_WITH_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-(.)$").expect("static regex must compile"));

/// Text used to suppress automatic short flag assignment.
pub const NO_SHORT: &str = "none";

/// Characters that can never be short flags.
pub(crate) fn is_invalid_short(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

/// Registered options, indexed by name, long flag and short flag.
///
/// # Examples
///
/// ```
/// use optscan_core::{OptionSettings, Registry, ShortFlag, ValueKind};
///
/// let mut registry = Registry::new();
/// registry
///     .define("dry_run", "Do nothing", OptionSettings::new())
///     .unwrap();
/// let spec = registry.by_long("dry-run").unwrap();
/// assert_eq!(spec.name, "dry_run");
/// assert_eq!(spec.kind, ValueKind::Flag);
/// assert_eq!(spec.short, ShortFlag::Auto);
///
/// // Names, long flags and short flags are unique.
/// assert!(registry.define("dry_run", "", OptionSettings::new()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    specs: HashMap<String, OptionSpec>,
    longs: HashMap<String, String>,
    shorts: HashMap<char, String>,
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an option.
    ///
    /// Resolves the type, derives the long flag from the name (underscores
    /// become dashes) when none is given, validates the short flag, and fills
    /// in the effective default: `false` for flags, a one-element list for a
    /// `multi` option with a scalar default, an empty list for a `multi`
    /// option without one.
    pub fn define(
        &mut self,
        name: &str,
        description: &str,
        settings: OptionSettings,
    ) -> Result<&OptionSpec> {
        if self.specs.contains_key(name) {
            return Err(DefinitionError::DuplicateName(name.to_string()));
        }

        let kind = resolve_kind(
            name,
            settings.kind.as_ref(),
            settings.default.as_ref(),
            settings.multi,
        )?;

        let long = normalize_long(settings.long.as_deref(), name)?;
        if self.longs.contains_key(&long) {
            return Err(DefinitionError::LongTaken(long));
        }

        let short = normalize_short(settings.short.as_deref())?;
        if let ShortFlag::Char(c) = short {
            if self.shorts.contains_key(&c) {
                return Err(DefinitionError::ShortTaken(c));
            }
            if is_invalid_short(c) {
                return Err(DefinitionError::ShortNotAllowed(c));
            }
        }

        let default = effective_default(kind, settings.multi, settings.default);

        debug!(name, long = %long, short = ?short, kind = %kind, multi = settings.multi, "Declared option");

        let spec = OptionSpec {
            name: name.to_string(),
            long: long.clone(),
            short,
            kind,
            multi: settings.multi,
            required: settings.required,
            default,
            description: description.to_string(),
        };

        self.longs.insert(long, name.to_string());
        if let ShortFlag::Char(c) = short {
            self.shorts.insert(c, name.to_string());
        }
        self.entries.push(Entry::Option(name.to_string()));
        Ok(self.specs.entry(name.to_string()).or_insert(spec))
    }

    /// Appends banner text to the declaration sequence.
    pub fn text(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::Text(text.into()));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Whether a long flag (without dashes) is taken.
    pub fn has_long(&self, long: &str) -> bool {
        self.longs.contains_key(long)
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.get(name)
    }

    /// Looks up an option by long flag text (without dashes).
    pub fn by_long(&self, long: &str) -> Option<&OptionSpec> {
        self.longs.get(long).and_then(|name| self.specs.get(name))
    }

    /// Looks up an option by short flag character.
    pub fn by_short(&self, short: char) -> Option<&OptionSpec> {
        self.shorts.get(&short).and_then(|name| self.specs.get(name))
    }

    /// Options and banner text in declaration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Options in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &OptionSpec> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Option(name) => self.specs.get(name),
            Entry::Text(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Assigns a short flag to every option that did not declare one.
    ///
    /// Walks options in declaration order and gives each the first character
    /// of its long flag that is neither a digit, a dash, nor already taken.
    /// Options with no usable character keep [`ShortFlag::Auto`].
    pub(crate) fn resolve_default_shorts(&mut self) {
        for entry in &self.entries {
            let Entry::Option(name) = entry else {
                continue;
            };
            let Some(spec) = self.specs.get_mut(name) else {
                continue;
            };
            if spec.short != ShortFlag::Auto {
                continue;
            }

            let candidate = spec
                .long
                .chars()
                .find(|c| !is_invalid_short(*c) && !self.shorts.contains_key(c));
            if let Some(c) = candidate {
                debug!(name = %name, short = %c, "Assigned default short flag");
                spec.short = ShortFlag::Char(c);
                self.shorts.insert(c, name.clone());
            }
        }
    }
}

fn normalize_long(long: Option<&str>, name: &str) -> Result<String> {
    let raw = match long {
        Some(long) => long.to_string(),
        None => name.replace('_', "-"),
    };

    let long = if let Some(caps) = LONG_WITH_DASHES.captures(&raw) {
        caps[1].to_string()
    } else if raw.starts_with(|c: char| c != '-') {
        raw.clone()
    } else {
        return Err(DefinitionError::InvalidLong(raw));
    };

    if long.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(DefinitionError::InvalidLong(raw));
    }
    Ok(long)
}

fn normalize_short(short: Option<&str>) -> Result<ShortFlag> {
    let Some(raw) = short else {
        return Ok(ShortFlag::Auto);
    };
    if raw == NO_SHORT {
        return Ok(ShortFlag::None);
    }
    if let Some(caps) = SHORT_WITH_DASH.captures(raw) {
        if let Some(c) = caps[1].chars().next() {
            return Ok(ShortFlag::Char(c));
        }
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(ShortFlag::Char(c)),
        _ => Err(DefinitionError::InvalidShort(raw.to_string())),
    }
}

fn effective_default(kind: ValueKind, multi: bool, default: Option<Value>) -> Value {
    match default {
        Some(Value::List(items)) => Value::List(items),
        Some(Value::Null) | None if multi => Value::List(Vec::new()),
        Some(Value::Null) | None if kind == ValueKind::Flag => Value::Flag(false),
        Some(value) if multi => Value::List(vec![value]),
        Some(value) => value,
        None => Value::Null,
    }
}
