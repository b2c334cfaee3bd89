//! Option type resolution.
//!
//! An option's type comes from an explicit declaration, from the shape of its
//! default value, or falls back to [`ValueKind::Flag`]. When both an explicit
//! type and a default are given they must agree.
//!
//! One rule needs care: for a `multi` option with a list default and no
//! explicit type, the list is read as the per-occurrence default, so the type
//! is inferred from its first element. `multi` plus `default: [1, 2]` is
//! therefore an `int` option that may repeat, not an `ints` option. Declare
//! the type explicitly to get multi-value occurrences.

use crate::error::{DefinitionError, Result};
use crate::{Arity, TypeSpec, Value, ValueKind};

/// Resolves the type of option `name`.
///
/// # Errors
///
/// - [`DefinitionError::UnsupportedType`] for unknown tags and reserved kinds.
/// - [`DefinitionError::TypeMismatch`] when declared and inferred types differ.
/// - [`DefinitionError::EmptyArrayDefault`] /
///   [`DefinitionError::SingularTypeForArray`] for empty list defaults that
///   cannot be typed.
/// - [`DefinitionError::UnsupportedDefault`] for list defaults whose first
///   element has no plural type.
pub fn resolve_kind(
    name: &str,
    declared: Option<&TypeSpec>,
    default: Option<&Value>,
    multi: bool,
) -> Result<ValueKind> {
    let declared = declared.map(declared_kind).transpose()?;

    let inferred = match default {
        Some(Value::List(items)) if multi && declared.is_none() => match items.first() {
            Some(first) => infer_kind(name, first, None)?,
            None => return Err(DefinitionError::EmptyArrayDefault(name.to_string())),
        },
        Some(value) => infer_kind(name, value, declared)?,
        None => None,
    };

    match (declared, inferred) {
        (Some(declared), Some(inferred)) if declared != inferred => {
            Err(DefinitionError::TypeMismatch {
                name: name.to_string(),
                declared,
                inferred,
            })
        }
        (declared, inferred) => Ok(declared.or(inferred).unwrap_or(ValueKind::Flag)),
    }
}

fn declared_kind(spec: &TypeSpec) -> Result<ValueKind> {
    let kind = match spec {
        TypeSpec::Kind(kind) => *kind,
        TypeSpec::Tag(tag) => tag.parse()?,
    };
    if kind.is_reserved() {
        return Err(DefinitionError::UnsupportedType(kind.tag().to_string()));
    }
    Ok(kind)
}

/// Infers a kind from a default value. `Ok(None)` means "no opinion".
fn infer_kind(name: &str, value: &Value, declared: Option<ValueKind>) -> Result<Option<ValueKind>> {
    let kind = match value {
        Value::Null => return Ok(None),
        Value::Flag(_) => ValueKind::Flag,
        Value::Int(_) => ValueKind::Int,
        Value::Float(_) => ValueKind::Float,
        Value::Str(_) => ValueKind::String,
        Value::Date(_) => ValueKind::Date,
        Value::List(items) => {
            let Some(first) = items.first() else {
                return match declared {
                    Some(kind) if kind.arity() == Arity::Multi => Ok(None),
                    Some(kind) => Err(DefinitionError::SingularTypeForArray {
                        name: name.to_string(),
                        declared: kind,
                    }),
                    None => Err(DefinitionError::EmptyArrayDefault(name.to_string())),
                };
            };
            let element = match first {
                Value::Int(_) => ValueKind::Int,
                Value::Float(_) => ValueKind::Float,
                Value::Str(_) => ValueKind::String,
                Value::Date(_) => ValueKind::Date,
                other => {
                    return Err(DefinitionError::UnsupportedDefault {
                        name: name.to_string(),
                        reason: format!("unsupported multiple argument element {other:?}"),
                    });
                }
            };
            element.plural().unwrap_or(element)
        }
    };
    Ok(Some(kind))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn tag(s: &str) -> TypeSpec {
        TypeSpec::Tag(s.to_string())
    }

    #[test]
    fn test_fallback_is_flag() {
        assert_eq!(resolve_kind("x", None, None, false).unwrap(), ValueKind::Flag);
    }

    #[test]
    fn test_infers_from_scalar_defaults() {
        let cases = [
            (Value::Int(3), ValueKind::Int),
            (Value::Float(0.5), ValueKind::Float),
            (Value::Flag(true), ValueKind::Flag),
            (Value::Str("a".into()), ValueKind::String),
            (
                Value::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()),
                ValueKind::Date,
            ),
        ];
        for (default, expected) in cases {
            assert_eq!(
                resolve_kind("x", None, Some(&default), false).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_infers_plural_from_first_element() {
        let default = Value::from(vec![1.5, 2.0]);
        assert_eq!(
            resolve_kind("x", None, Some(&default), false).unwrap(),
            ValueKind::Floats
        );
    }

    #[test]
    fn test_multi_list_default_is_per_occurrence() {
        let default = Value::from(vec![1, 2]);
        assert_eq!(
            resolve_kind("x", None, Some(&default), true).unwrap(),
            ValueKind::Int
        );
        // An explicit plural type keeps the list as a multi-value default.
        assert_eq!(
            resolve_kind("x", Some(&tag("ints")), Some(&default), true).unwrap(),
            ValueKind::Ints
        );
    }

    #[test]
    fn test_synonym_tags_resolve() {
        assert_eq!(
            resolve_kind("x", Some(&tag("integer")), Some(&Value::Int(1)), false).unwrap(),
            ValueKind::Int
        );
        assert_eq!(
            resolve_kind("x", Some(&tag("double")), None, false).unwrap(),
            ValueKind::Float
        );
    }

    #[test]
    fn test_rejects_mismatch() {
        let err = resolve_kind("x", Some(&tag("int")), Some(&Value::Str("a".into())), false)
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::TypeMismatch {
                name: "x".into(),
                declared: ValueKind::Int,
                inferred: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_rejects_reserved_and_unknown_types() {
        assert!(matches!(
            resolve_kind("x", Some(&tag("io")), None, false),
            Err(DefinitionError::UnsupportedType(_))
        ));
        assert!(matches!(
            resolve_kind("x", Some(&tag("bignum")), None, false),
            Err(DefinitionError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_empty_list_defaults() {
        let empty = Value::List(Vec::new());
        assert_eq!(
            resolve_kind("x", None, Some(&empty), false).unwrap_err(),
            DefinitionError::EmptyArrayDefault("x".into())
        );
        assert_eq!(
            resolve_kind("x", Some(&tag("strings")), Some(&empty), false).unwrap(),
            ValueKind::Strings
        );
        assert!(matches!(
            resolve_kind("x", Some(&tag("string")), Some(&empty), false),
            Err(DefinitionError::SingularTypeForArray { .. })
        ));
        assert_eq!(
            resolve_kind("x", None, Some(&empty), true).unwrap_err(),
            DefinitionError::EmptyArrayDefault("x".into())
        );
    }

    #[test]
    fn test_rejects_list_of_flags() {
        let default = Value::from(vec![true]);
        assert!(matches!(
            resolve_kind("x", None, Some(&default), false),
            Err(DefinitionError::UnsupportedDefault { .. })
        ));
    }
}
