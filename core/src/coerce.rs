//! Parameter coercion and value shaping.
//!
//! Raw parameters are converted per option type, then the per-occurrence
//! groups are reshaped by arity and multiplicity:
//!
//! | arity  | multi | result                                      |
//! |--------|-------|---------------------------------------------|
//! | single | no    | scalar                                      |
//! | single | yes   | list of scalars, one per occurrence         |
//! | multi  | no    | list of the single occurrence's parameters  |
//! | multi  | yes   | list of lists, one per occurrence           |

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ParseError;
use crate::{Arity, OptionSpec, Value, ValueKind};

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex must compile"));
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(([0-9]+(\.[0-9]+)?)|(\.[0-9]+))$").expect("static regex must compile")
});

/// Date layouts tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d %b %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

/// Parses a calendar date in any of the accepted layouts.
///
/// # Examples
///
/// ```
/// use optscan_core::parse_date;
///
/// let d = parse_date("2024-02-29").unwrap();
/// assert_eq!(parse_date("Feb 29, 2024"), Some(d));
/// assert_eq!(parse_date("29 Feb 2024"), Some(d));
/// assert!(parse_date("2023-02-29").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Converts one raw parameter to a value of `kind` (singular element kind).
///
/// `arg` is the switch as typed, used in the error message.
pub fn coerce_param(kind: ValueKind, raw: &str, arg: &str) -> Result<Value, ParseError> {
    let invalid = |expected: &str| ParseError::InvalidValue {
        arg: arg.to_string(),
        expected: expected.to_string(),
    };

    match kind.element() {
        ValueKind::Int => {
            if !INTEGER.is_match(raw) {
                return Err(invalid("an integer"));
            }
            raw.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| invalid("an integer"))
        }
        ValueKind::Float => {
            if !FLOAT.is_match(raw) {
                return Err(invalid("a floating-point number"));
            }
            raw.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| invalid("a floating-point number"))
        }
        ValueKind::Date => parse_date(raw).map(Value::Date).ok_or_else(|| invalid("a date")),
        ValueKind::String => Ok(Value::Str(raw.to_string())),
        ValueKind::Flag => Ok(Value::Flag(true)),
        other => Err(invalid(&format!("a supported type (got {other})"))),
    }
}

/// Coerces every parameter group of `spec` and shapes the result.
///
/// `groups` holds one entry per occurrence that received parameters and must
/// not be empty for value-taking options.
pub fn coerce_groups(spec: &OptionSpec, arg: &str, groups: &[Vec<String>]) -> Result<Value, ParseError> {
    let typed = groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|raw| coerce_param(spec.kind, raw, arg))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(reshape(spec.kind.arity(), spec.multi, typed))
}

/// Reshapes per-occurrence value groups by arity and multiplicity.
pub fn reshape(arity: Arity, multi: bool, groups: Vec<Vec<Value>>) -> Value {
    match (arity, multi) {
        (Arity::Multi, true) => Value::List(groups.into_iter().map(Value::List).collect()),
        (Arity::Multi, false) => groups
            .into_iter()
            .next()
            .map(Value::List)
            .unwrap_or(Value::Null),
        (_, true) => Value::List(groups.into_iter().filter_map(first).collect()),
        (_, false) => groups.into_iter().next().and_then(first).unwrap_or(Value::Null),
    }
}

fn first(group: Vec<Value>) -> Option<Value> {
    group.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShortFlag;

    fn spec(kind: ValueKind, multi: bool) -> OptionSpec {
        OptionSpec {
            name: "opt".into(),
            long: "opt".into(),
            short: ShortFlag::Auto,
            kind,
            multi,
            required: false,
            default: Value::Null,
            description: String::new(),
        }
    }

    fn groups(items: &[&[&str]]) -> Vec<Vec<String>> {
        items
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_integers_reject_signs_and_decimals() {
        assert_eq!(coerce_param(ValueKind::Int, "42", "--n").unwrap(), Value::Int(42));
        for bad in ["-1", "+1", "1.0", "", "x1", "99999999999999999999"] {
            assert_eq!(
                coerce_param(ValueKind::Int, bad, "--n").unwrap_err(),
                ParseError::InvalidValue {
                    arg: "--n".into(),
                    expected: "an integer".into(),
                },
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn test_floats_accept_sign_and_leading_dot() {
        assert_eq!(coerce_param(ValueKind::Float, "-0.5", "-r").unwrap(), Value::Float(-0.5));
        assert_eq!(coerce_param(ValueKind::Float, ".25", "-r").unwrap(), Value::Float(0.25));
        assert_eq!(coerce_param(ValueKind::Floats, "3", "-r").unwrap(), Value::Float(3.0));
        for bad in ["1.", "+1", "1e3", "--1", "abc"] {
            assert!(coerce_param(ValueKind::Float, bad, "-r").is_err(), "input {bad:?}");
        }
    }

    #[test]
    fn test_dates() {
        let expected = Value::Date(NaiveDate::from_ymd_opt(2021, 7, 4).unwrap());
        assert_eq!(coerce_param(ValueKind::Date, "2021/07/04", "--d").unwrap(), expected);
        assert_eq!(coerce_param(ValueKind::Dates, "July 4, 2021", "--d").unwrap(), expected);
        assert_eq!(
            coerce_param(ValueKind::Date, "someday", "--d").unwrap_err().to_string(),
            "option '--d' needs a date"
        );
    }

    #[test]
    fn test_strings_pass_through() {
        assert_eq!(
            coerce_param(ValueKind::Strings, "-x y", "--s").unwrap(),
            Value::Str("-x y".into())
        );
    }

    #[test]
    fn test_reshape_table() {
        let single = spec(ValueKind::Int, false);
        assert_eq!(
            coerce_groups(&single, "--opt", &groups(&[&["7"]])).unwrap(),
            Value::Int(7)
        );

        let single_multi = spec(ValueKind::Int, true);
        assert_eq!(
            coerce_groups(&single_multi, "--opt", &groups(&[&["1"], &["2"]])).unwrap(),
            Value::from(vec![1, 2])
        );

        let plural = spec(ValueKind::Ints, false);
        assert_eq!(
            coerce_groups(&plural, "--opt", &groups(&[&["1", "2"]])).unwrap(),
            Value::from(vec![1, 2])
        );

        let plural_multi = spec(ValueKind::Ints, true);
        assert_eq!(
            coerce_groups(&plural_multi, "--opt", &groups(&[&["1", "2"], &["3"]])).unwrap(),
            Value::List(vec![Value::from(vec![1, 2]), Value::from(vec![3])])
        );
    }

    #[test]
    fn test_first_bad_parameter_is_reported() {
        let plural = spec(ValueKind::Floats, false);
        let err = coerce_groups(&plural, "-f", &groups(&[&["1.5", "oops", "x"]])).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                arg: "-f".into(),
                expected: "a floating-point number".into(),
            }
        );
    }
}
