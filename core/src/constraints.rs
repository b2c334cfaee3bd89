//! Inter-option constraints and required-option checks.
//!
//! Both checks look at which options were given, never at their values, and
//! run after scanning and before coercion.

use crate::error::{DefinitionError, ParseError, Result};
use crate::scan::GivenArgs;
use crate::{Constraint, ConstraintKind, Registry};

impl Constraint {
    /// Builds a constraint whose members must all be registered options.
    pub fn new<S: AsRef<str>>(kind: ConstraintKind, members: &[S], registry: &Registry) -> Result<Self> {
        if members.is_empty() {
            return Err(DefinitionError::EmptyConstraint);
        }
        let mut names = Vec::with_capacity(members.len());
        for member in members {
            let member = member.as_ref();
            if !registry.contains(member) {
                return Err(DefinitionError::UnknownConstraintOption(member.to_string()));
            }
            names.push(member.to_string());
        }
        Ok(Self { kind, members: names })
    }

    /// Checks this constraint against the given options.
    ///
    /// Nothing is checked unless at least one member was given. The first
    /// given member (in member order) is the one named in the error.
    pub fn check(&self, registry: &Registry, given: &GivenArgs) -> std::result::Result<(), ParseError> {
        let Some(trigger) = self.members.iter().find(|m| given.contains(m)) else {
            return Ok(());
        };
        let long = |name: &str| {
            registry
                .get(name)
                .map_or_else(|| name.to_string(), |spec| spec.long.clone())
        };

        for member in &self.members {
            match self.kind {
                ConstraintKind::Depends if !given.contains(member) => {
                    return Err(ParseError::Requires {
                        option: long(trigger.as_str()),
                        required: long(member.as_str()),
                    });
                }
                ConstraintKind::Conflicts if member != trigger && given.contains(member) => {
                    return Err(ParseError::Conflicts {
                        option: long(trigger.as_str()),
                        other: long(member.as_str()),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Checks every constraint in declaration order.
pub fn check_constraints(
    constraints: &[Constraint],
    registry: &Registry,
    given: &GivenArgs,
) -> std::result::Result<(), ParseError> {
    constraints
        .iter()
        .try_for_each(|constraint| constraint.check(registry, given))
}

/// Fails on the first required option (in declaration order) not given.
pub fn check_required(registry: &Registry, given: &GivenArgs) -> std::result::Result<(), ParseError> {
    match registry
        .specs()
        .find(|spec| spec.required && !given.contains(&spec.name))
    {
        Some(spec) => Err(ParseError::MissingRequired(spec.long.clone())),
        None => Ok(()),
    }
}
