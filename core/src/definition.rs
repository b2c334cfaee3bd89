//! Parser definitions read from YAML or JSON.
//!
//! A definition describes a whole [`Parser`]: version, banner lines,
//! options, constraints and stop words.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "mytool 1.0"
//! banner:
//!   - "Usage: mytool [options] <file>"
//! options:
//!   - name: count
//!     description: How many times
//!     default: 1
//!   - name: since
//!     description: Start date
//!     type: date
//!     default: "2024-01-01"
//!   - name: tag
//!     type: string
//!     multi: true
//! conflicts:
//!   - [count, tag]
//! stop_words: [run, build]
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coerce::parse_date;
use crate::error::{DefinitionError, DefinitionLoadError};
use crate::{OptionSettings, Parser, TypeSpec, Value, ValueKind};

/// One option in a [`ParserDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDefinition {
    /// Option name; also the key in the parse result.
    pub name: String,
    /// Help text.
    #[serde(default)]
    pub description: String,
    /// Declaration settings, written inline next to the name.
    #[serde(flatten)]
    pub settings: OptionSettings,
}

/// Serializable description of a parser.
///
/// # Examples
///
/// ```
/// use optscan_core::{ParseOutcome, ParserDefinition};
///
/// let yaml = r#"
/// options:
///   - name: depth
///     default: 2
///   - name: dry_run
/// "#;
/// let mut parser = ParserDefinition::from_yaml_str(yaml).unwrap().build().unwrap();
/// let args = parser.parse(["--dry-run", "-d", "5"]).unwrap().into_values().unwrap();
/// assert_eq!(args.int("depth"), Some(5));
/// assert_eq!(args.flag("dry_run"), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserDefinition {
    /// Version string; enables `--version`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Banner lines, shown before the options in help output.
    pub banner: Vec<String>,
    pub options: Vec<OptionDefinition>,
    /// Groups of options that must be given together.
    pub depends: Vec<Vec<String>>,
    /// Groups of mutually exclusive options.
    pub conflicts: Vec<Vec<String>>,
    pub stop_words: Vec<String>,
    pub stop_on_unknown: bool,
}

impl ParserDefinition {
    /// Loads a definition, choosing the format from the file extension
    /// (`.yml`/`.yaml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionLoadError::UnsupportedFormat`] for any other
    /// extension, or the I/O or deserialization error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DefinitionLoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let yaml = match extension.as_str() {
            "yml" | "yaml" => true,
            "json" => false,
            _ => return Err(DefinitionLoadError::UnsupportedFormat(path.display().to_string())),
        };

        let reader = BufReader::new(std::fs::File::open(path)?);
        let definition = if yaml {
            serde_yaml::from_reader(reader)?
        } else {
            serde_json::from_reader(reader)?
        };
        debug!(path = %path.display(), "Loaded parser definition");
        Ok(definition)
    }

    /// Loads a definition file and builds its parser in one step.
    pub fn load_parser(path: impl AsRef<Path>) -> Result<Parser, DefinitionLoadError> {
        Ok(Self::load(path)?.build()?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, DefinitionLoadError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DefinitionLoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the parser: banner lines first, then options in order, then
    /// constraints.
    ///
    /// # Errors
    ///
    /// The first [`DefinitionError`] raised while declaring.
    pub fn build(&self) -> Result<Parser, DefinitionError> {
        let mut parser = Parser::new();
        if let Some(version) = &self.version {
            parser.version(version.clone());
        }
        for line in &self.banner {
            parser.banner(line.clone());
        }
        for option in &self.options {
            let settings = with_date_default(&option.name, option.settings.clone())?;
            parser.opt(&option.name, &option.description, settings)?;
        }
        for group in &self.depends {
            parser.depends(group)?;
        }
        for group in &self.conflicts {
            parser.conflicts(group)?;
        }
        parser.stop_on(self.stop_words.iter().cloned());
        if self.stop_on_unknown {
            parser.stop_on_unknown();
        }
        Ok(parser)
    }
}

/// Data formats have no date type: string defaults of date options are
/// parsed here.
fn with_date_default(name: &str, mut settings: OptionSettings) -> Result<OptionSettings, DefinitionError> {
    let kind = match &settings.kind {
        Some(TypeSpec::Kind(kind)) => Some(*kind),
        Some(TypeSpec::Tag(tag)) => tag.parse::<ValueKind>().ok(),
        None => None,
    };
    if kind.map(ValueKind::element) != Some(ValueKind::Date) {
        return Ok(settings);
    }

    settings.default = match settings.default.take() {
        Some(Value::Str(raw)) => Some(Value::Date(date_default(name, &raw)?)),
        Some(Value::List(items)) => Some(Value::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Str(raw) => date_default(name, &raw).map(Value::Date),
                    other => Ok(other),
                })
                .collect::<Result<_, _>>()?,
        )),
        other => other,
    };
    Ok(settings)
}

fn date_default(name: &str, raw: &str) -> Result<chrono::NaiveDate, DefinitionError> {
    parse_date(raw).ok_or_else(|| DefinitionError::UnsupportedDefault {
        name: name.to_string(),
        reason: format!("'{raw}' is not a date"),
    })
}
