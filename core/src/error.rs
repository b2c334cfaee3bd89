//! Error types for option declaration and command-line parsing.
//!
//! Two families are kept apart:
//! [`DefinitionError`] is raised while a [`Parser`](crate::Parser) is being
//! declared, [`ParseError`] is raised by a single
//! [`Parser::parse`](crate::Parser::parse) call. Help and version requests are
//! not errors at all; they surface as [`ParseOutcome`](crate::ParseOutcome)
//! variants.

use thiserror::Error;

use crate::ValueKind;

/// Errors raised while declaring options, banners and constraints.
///
/// These are programmer errors in the option declarations and are reported
/// at the declaration call that causes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// An option with this name is already registered.
    #[error("you already have an argument named '{0}'")]
    DuplicateName(String),

    /// The type tag or type hint is not a supported option type.
    #[error("unsupported argument type '{0}'")]
    UnsupportedType(String),

    /// The default value cannot be used to infer an option type.
    #[error("unsupported default value for '{name}': {reason}")]
    UnsupportedDefault { name: String, reason: String },

    /// The explicit type and the type inferred from the default disagree.
    #[error(
        "type specification and default type don't match for '{name}' (declared {declared}, default type is {inferred})"
    )]
    TypeMismatch {
        name: String,
        declared: ValueKind,
        inferred: ValueKind,
    },

    /// An empty list default was given without a plural type to go with it.
    #[error("multiple argument type cannot be deduced from an empty array for '{0}'")]
    EmptyArrayDefault(String),

    /// An empty list default was given together with a single-value type.
    #[error("multiple argument type must be plural for '{name}' (got {declared})")]
    SingularTypeForArray { name: String, declared: ValueKind },

    /// Long flag text is malformed (e.g. `---x` or `-x`).
    #[error("invalid long option name '{0}'")]
    InvalidLong(String),

    /// Long flag text is already used by another option.
    #[error("long option name '{0}' is already taken; please specify a (different) long name")]
    LongTaken(String),

    /// Short flag text is neither a single character nor `-X`.
    #[error("invalid short option name '{0}'")]
    InvalidShort(String),

    /// Short flag character is already used by another option.
    #[error("short option name '{0}' is already taken; please specify a (different) short name")]
    ShortTaken(char),

    /// Short flag character is a digit or a dash.
    #[error("a short option name can't be a number or a dash (got '{0}')")]
    ShortNotAllowed(char),

    /// A constraint references an option that has not been declared.
    #[error("unknown option '{0}' referenced by constraint")]
    UnknownConstraintOption(String),

    /// A constraint was declared without any member.
    #[error("constraint must reference at least one option")]
    EmptyConstraint,
}

/// Errors raised by a single parse call.
///
/// The first violation found wins; scanning errors are reported before
/// constraint errors, which are reported before required-option errors and
/// value coercion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token starts with a dash but is neither a short nor a long switch.
    #[error("invalid argument syntax: '{0}'")]
    InvalidSyntax(String),

    /// The switch does not correspond to any declared option.
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    /// A non-multi option was supplied more than once.
    #[error("option '{0}' specified multiple times")]
    RepeatedOption(String),

    /// A value-taking option was supplied without any parameter.
    #[error("option '{0}' needs a parameter")]
    MissingParameter(String),

    /// A parameter could not be converted to the option's type.
    #[error("option '{arg}' needs {expected}")]
    InvalidValue { arg: String, expected: String },

    /// A `depends` constraint was not satisfied.
    #[error("--{option} requires --{required}")]
    Requires { option: String, required: String },

    /// A `conflicts` constraint was violated.
    #[error("--{option} conflicts with --{other}")]
    Conflicts { option: String, other: String },

    /// A required option was never supplied.
    #[error("option --{0} must be specified")]
    MissingRequired(String),
}

/// Errors raised while loading a parser definition file.
#[derive(Debug, Error)]
pub enum DefinitionLoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension does not identify a supported format.
    #[error("unsupported definition format: {0}")]
    UnsupportedFormat(String),

    /// The definition was read but declares an invalid option set.
    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),
}

/// Convenience alias for declaration results.
pub type Result<T> = std::result::Result<T, DefinitionError>;
