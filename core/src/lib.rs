//! Declarative command-line option parsing.
//!
//! Options are declared on a [`Parser`] with a name, a description and
//! [`OptionSettings`]; parsing an argument vector yields typed values for
//! every declared option plus the leftover tokens.
//!
//! - [`ValueKind`], [`Value`], [`OptionSpec`]: option types, values and
//!   declared option specs.
//! - [`Registry`]: option storage with long and short flag indices.
//! - [`Scanner`]: single pass tokenizer for switches, clusters and
//!   parameters.
//! - Coercion ([`coerce_param`], [`parse_date`]): typed conversion of raw
//!   parameters.
//! - Constraints ([`Constraint`]): `depends` and `conflicts` groups.
//! - [`ParserDefinition`]: whole parsers described in YAML or JSON.
//!
//! # Example
//!
//! ```
//! use optscan_core::*;
//!
//! let mut parser = Parser::new();
//! parser.version("frobnicate 0.3");
//! parser.banner("Usage: frobnicate [options] <file>...");
//! parser
//!     .opt("level", "Compression level", OptionSettings::new().with_default(6))
//!     .unwrap();
//! parser
//!     .opt("ratio", "Target ratio", OptionSettings::new().kind_of::<f64>())
//!     .unwrap();
//! parser
//!     .opt("fast", "Trade size for speed", OptionSettings::new())
//!     .unwrap();
//! parser.conflicts(&["level", "fast"]).unwrap();
//!
//! let args = match parser.parse(["a.txt", "b.txt", "--ratio", "-0.5"]).unwrap() {
//!     ParseOutcome::Values(args) => args,
//!     other => panic!("unexpected {other:?}"),
//! };
//! assert_eq!(args.int("level"), Some(6));
//! assert_eq!(args.float("ratio"), Some(-0.5));
//! assert_eq!(args.flag("fast"), Some(false));
//! assert_eq!(args.leftovers(), ["a.txt", "b.txt"]);
//!
//! let err = parser.parse(["--level", "9", "-f"]).unwrap_err();
//! assert_eq!(err.to_string(), "--level conflicts with --fast");
//! ```

mod coerce;
mod constraints;
mod definition;
mod error;
mod parser;
mod registry;
mod resolve;
mod scan;
mod settings;
mod types;

pub use coerce::{coerce_groups, coerce_param, parse_date, reshape};
pub use constraints::{check_constraints, check_required};
pub use definition::{OptionDefinition, ParserDefinition};
pub use error::{DefinitionError, DefinitionLoadError, ParseError, Result};
pub use parser::{ParseOutcome, ParsedArgs, Parser};
pub use registry::{NO_SHORT, Registry};
pub use resolve::resolve_kind;
pub use scan::{Given, GivenArgs, Scanner, Switch};
pub use settings::{OptionSettings, TypeSpec};
pub use types::*;
