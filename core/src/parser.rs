//! The public parser: declaration API, parse pipeline and result assembly.
//!
//! A parse runs in a fixed order: scan, help/version signals, constraints,
//! required options, then coercion. The first failure in that order is the
//! one reported.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::coerce::coerce_groups;
use crate::constraints::{check_constraints, check_required};
use crate::error::{ParseError, Result};
use crate::scan::{GivenArgs, Scanner, Switch};
use crate::{
    Arity, Constraint, ConstraintKind, Entry, OptionSettings, OptionSpec, Registry, Value, ValueKind,
};

const HELP: &str = "help";
const VERSION: &str = "version";
const GIVEN_SUFFIX: &str = "_given";

/// Outcome of a successful parse call.
///
/// Help and version requests are not failures: callers render help or print
/// the version and exit successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Parsed values and leftovers.
    Values(ParsedArgs),
    /// The synthesized `--help` switch was given.
    HelpRequested,
    /// The synthesized `--version` switch was given.
    VersionRequested,
}

impl ParseOutcome {
    /// The parsed values, if this is not a help or version request.
    pub fn into_values(self) -> Option<ParsedArgs> {
        match self {
            Self::Values(values) => Some(values),
            Self::HelpRequested | Self::VersionRequested => None,
        }
    }
}

/// Result mapping of a parse call.
///
/// Holds a value for every declared option (its default when it was not
/// given), a `<name>_given` marker set to `true` for every option that was
/// given, and the unconsumed tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedArgs {
    values: BTreeMap<String, Value>,
    leftovers: Vec<String>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether option `name` was given on the command line.
    pub fn given(&self, name: &str) -> bool {
        self.values
            .get(&format!("{name}{GIVEN_SUFFIX}"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(Value::as_date)
    }

    pub fn list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Tokens not consumed as switches or parameters, in input order.
    pub fn leftovers(&self) -> &[String] {
        &self.leftovers
    }

    /// All entries, including `<name>_given` markers, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_parts(self) -> (BTreeMap<String, Value>, Vec<String>) {
        (self.values, self.leftovers)
    }
}

/// Command-line option parser.
///
/// Options, banner text, stop words and constraints are declared first;
/// [`parse`](Parser::parse) then turns an argument vector into a
/// [`ParseOutcome`].
///
/// The first `parse` call adds `--help` (and `--version` when a version is
/// set) unless options with those names or long flags exist, and assigns
/// default short flags. Both steps are idempotent, and each call starts from
/// fresh per-call state, so a parser can be parsed with several times. A
/// parser is not meant to be shared across threads while parsing.
///
/// # Examples
///
/// ```
/// use optscan_core::{OptionSettings, ParseOutcome, Parser, ValueKind};
///
/// let mut parser = Parser::new();
/// parser.opt("verbose", "Print more", OptionSettings::new()).unwrap();
/// parser
///     .opt("count", "How many", OptionSettings::new().with_default(1))
///     .unwrap();
/// parser
///     .opt("tags", "Labels", OptionSettings::new().kind(ValueKind::Strings))
///     .unwrap();
///
/// let ParseOutcome::Values(args) = parser
///     .parse(["-v", "--count", "3", "--tags", "a", "b", "--", "file"])
///     .unwrap()
/// else {
///     panic!("expected values");
/// };
/// assert_eq!(args.flag("verbose"), Some(true));
/// assert_eq!(args.int("count"), Some(3));
/// assert_eq!(args.list("tags").map(|t| t.len()), Some(2));
/// assert!(args.given("count"));
/// assert_eq!(args.leftovers(), ["file"]);
///
/// assert_eq!(parser.parse(["-h"]).unwrap(), ParseOutcome::HelpRequested);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    registry: Registry,
    constraints: Vec<Constraint>,
    stop_words: Vec<String>,
    stop_on_unknown: bool,
    version: Option<String>,
    synthesized_help: bool,
    synthesized_version: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an option.
    ///
    /// See [`Registry::define`] for how settings are resolved.
    pub fn opt(&mut self, name: &str, description: &str, settings: OptionSettings) -> Result<()> {
        self.registry.define(name, description, settings).map(|_| ())
    }

    /// Adds banner text, kept in order with the options for help output.
    pub fn banner(&mut self, text: impl Into<String>) {
        self.registry.text(text);
    }

    /// Alias for [`banner`](Parser::banner).
    pub fn text(&mut self, text: impl Into<String>) {
        self.banner(text);
    }

    /// Sets the version string, which enables the `--version` switch.
    pub fn version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// The configured version string.
    pub fn version_text(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Adds stop words: scanning halts at the first of them, leaving it and
    /// everything after it unconsumed (e.g. a subcommand name).
    pub fn stop_on<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(words.into_iter().map(Into::into));
    }

    /// Halts scanning at the first positional argument.
    pub fn stop_on_unknown(&mut self) {
        self.stop_on_unknown = true;
    }

    /// Declares that if any of `names` is given, all of them must be.
    pub fn depends<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.constrain(ConstraintKind::Depends, names)
    }

    /// Declares that at most one of `names` may be given.
    pub fn conflicts<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.constrain(ConstraintKind::Conflicts, names)
    }

    fn constrain<S: AsRef<str>>(&mut self, kind: ConstraintKind, names: &[S]) -> Result<()> {
        let constraint = Constraint::new(kind, names, &self.registry)?;
        debug!(kind = ?constraint.kind, members = ?constraint.members, "Declared constraint");
        self.constraints.push(constraint);
        Ok(())
    }

    /// The option registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Options and banner text in declaration order.
    pub fn entries(&self) -> &[Entry] {
        self.registry.entries()
    }

    pub fn spec(&self, name: &str) -> Option<&OptionSpec> {
        self.registry.get(name)
    }

    /// Options in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &OptionSpec> {
        self.registry.specs()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    /// Parses an argument vector (without the program name).
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] found, in this order: scanning errors,
    /// constraint violations, missing required options, missing parameters
    /// and coercion failures. Help and version requests are reported as
    /// [`ParseOutcome`] variants before any constraint is checked.
    pub fn parse<I, S>(&mut self, args: I) -> std::result::Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.prepare();

        let registry = &self.registry;
        let mut given = GivenArgs::new();
        let scanner = Scanner::new(&self.stop_words, self.stop_on_unknown);

        let leftovers = scanner.scan(&args, |arg, params| {
            let spec = resolve_switch(registry, arg)?;
            if given.contains(&spec.name) && !spec.multi {
                return Err(ParseError::RepeatedOption(arg.to_string()));
            }
            let entry = given.record(&spec.name, arg);

            let Some(params) = params else {
                return Ok(0);
            };
            match spec.kind.arity() {
                Arity::None => Ok(0),
                // Extras after a single-value parameter are consumed and dropped.
                Arity::Single => {
                    entry.groups.push(params[..1].to_vec());
                    Ok(params.len())
                }
                Arity::Multi => {
                    entry.groups.push(params.to_vec());
                    Ok(params.len())
                }
            }
        })?;

        debug!(given = given.len(), leftovers = leftovers.len(), "Scan complete");

        if self.synthesized_version && given.contains(VERSION) {
            debug!("Version requested");
            return Ok(ParseOutcome::VersionRequested);
        }
        if self.synthesized_help && given.contains(HELP) {
            debug!("Help requested");
            return Ok(ParseOutcome::HelpRequested);
        }

        check_constraints(&self.constraints, registry, &given)?;
        check_required(registry, &given)?;

        let values = assemble(registry, &given)?;
        Ok(ParseOutcome::Values(ParsedArgs { values, leftovers }))
    }

    /// Adds the built-in switches and assigns default short flags.
    fn prepare(&mut self) {
        if self.version.is_some() && !self.registry.contains(VERSION) && !self.registry.has_long(VERSION) {
            self.synthesized_version = self
                .registry
                .define(VERSION, "Print version and exit", OptionSettings::new())
                .is_ok();
        }
        if !self.registry.contains(HELP) && !self.registry.has_long(HELP) {
            self.synthesized_help = self
                .registry
                .define(HELP, "Show this message", OptionSettings::new())
                .is_ok();
        }
        self.registry.resolve_default_shorts();
    }
}

fn resolve_switch<'r>(registry: &'r Registry, arg: &str) -> std::result::Result<&'r OptionSpec, ParseError> {
    let spec = match Switch::parse(arg)? {
        Switch::Short(c) => registry.by_short(c),
        Switch::Long(long) => registry.by_long(long),
    };
    spec.ok_or_else(|| ParseError::UnknownArgument(arg.to_string()))
}

/// Merges defaults, given markers and coerced values.
fn assemble(registry: &Registry, given: &GivenArgs) -> std::result::Result<BTreeMap<String, Value>, ParseError> {
    let mut values: BTreeMap<String, Value> = registry
        .specs()
        .map(|spec| (spec.name.clone(), spec.default.clone()))
        .collect();

    for occurrence in given.iter() {
        let Some(spec) = registry.get(&occurrence.name) else {
            continue;
        };
        if occurrence.groups.is_empty() && spec.kind != ValueKind::Flag {
            return Err(ParseError::MissingParameter(occurrence.arg.clone()));
        }

        values.insert(format!("{}{GIVEN_SUFFIX}", spec.name), Value::Flag(true));

        let value = match spec.kind {
            ValueKind::Flag => Value::Flag(!spec.default.as_bool().unwrap_or(false)),
            _ => coerce_groups(spec, &occurrence.arg, &occurrence.groups)?,
        };
        values.insert(spec.name.clone(), value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(parser: &mut Parser, args: &[&str]) -> ParsedArgs {
        match parser.parse(args.iter().copied()) {
            Ok(ParseOutcome::Values(values)) => values,
            other => panic!("expected values, got {other:?}"),
        }
    }

    #[test]
    fn test_help_and_version_synthesized_once() {
        let mut parser = Parser::new();
        parser.version("tool 1.2");
        parser.opt("verbose", "", OptionSettings::new()).unwrap();

        values(&mut parser, &[]);
        values(&mut parser, &[]);

        assert_eq!(parser.spec("version").unwrap().short.as_char(), Some('e'));
        assert_eq!(parser.spec("help").unwrap().short.as_char(), Some('h'));
        assert_eq!(parser.specs().count(), 3);
        assert_eq!(parser.parse(["--version"]).unwrap(), ParseOutcome::VersionRequested);
        assert_eq!(parser.parse(["-e"]).unwrap(), ParseOutcome::VersionRequested);
    }

    #[test]
    fn test_user_help_option_is_not_a_signal() {
        let mut parser = Parser::new();
        parser
            .opt("topic", "", OptionSettings::new().long("help").kind(ValueKind::String))
            .unwrap();

        let args = values(&mut parser, &["--help", "parsing"]);
        assert_eq!(args.string("topic"), Some("parsing"));
        assert!(parser.spec("help").is_none());
    }

    #[test]
    fn test_version_switch_absent_without_version() {
        let mut parser = Parser::new();
        assert_eq!(
            parser.parse(["--version"]).unwrap_err(),
            ParseError::UnknownArgument("--version".into())
        );
    }

    #[test]
    fn test_flag_toggles_default() {
        let mut parser = Parser::new();
        parser
            .opt("color", "", OptionSettings::new().with_default(true))
            .unwrap();
        assert_eq!(values(&mut parser, &[]).flag("color"), Some(true));
        assert_eq!(values(&mut parser, &["--color"]).flag("color"), Some(false));
    }

    #[test]
    fn test_repeated_non_multi_option() {
        let mut parser = Parser::new();
        parser.opt("quiet", "", OptionSettings::new()).unwrap();
        assert_eq!(
            parser.parse(["-q", "--quiet"]).unwrap_err(),
            ParseError::RepeatedOption("--quiet".into())
        );
    }

    #[test]
    fn test_missing_parameter() {
        let mut parser = Parser::new();
        parser
            .opt("name", "", OptionSettings::new().kind(ValueKind::String))
            .unwrap();
        assert_eq!(
            parser.parse(["--name"]).unwrap_err(),
            ParseError::MissingParameter("--name".into())
        );
        assert_eq!(
            parser.parse(["-n", "--", "x"]).unwrap_err(),
            ParseError::MissingParameter("-n".into())
        );
    }

    #[test]
    fn test_given_markers_only_for_given_options() {
        let mut parser = Parser::new();
        parser.opt("a", "", OptionSettings::new()).unwrap();
        parser.opt("b", "", OptionSettings::new()).unwrap();

        let args = values(&mut parser, &["-a"]);
        assert!(args.given("a"));
        assert!(!args.given("b"));
        assert_eq!(args.get("a_given"), Some(&Value::Flag(true)));
        assert!(args.get("b_given").is_none());
    }

    #[test]
    fn test_state_does_not_leak_between_parses() {
        let mut parser = Parser::new();
        parser
            .opt("n", "", OptionSettings::new().kind(ValueKind::Int))
            .unwrap();

        assert_eq!(values(&mut parser, &["-n", "4", "x"]).int("n"), Some(4));
        let second = values(&mut parser, &[]);
        assert_eq!(second.get("n"), Some(&Value::Null));
        assert!(second.leftovers().is_empty());
        assert!(!second.given("n"));
    }

    #[test]
    fn test_invalid_switch_syntax() {
        let mut parser = Parser::new();
        parser.opt("a", "", OptionSettings::new()).unwrap();
        assert_eq!(
            parser.parse(["---a"]).unwrap_err(),
            ParseError::InvalidSyntax("---a".into())
        );
        assert_eq!(
            parser.parse(["-a-"]).unwrap_err(),
            ParseError::InvalidSyntax("--".into())
        );
    }
}
