//! Query specifications
//!
//! Declarative, AND-composable predicate objects describing which persisted
//! entities a caller is allowed to see. The domain only builds these; a
//! query-execution collaborator translates them into actual filters (or
//! evaluates them in memory via [`SpecTarget`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators for spec conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecOperator {
    /// Equal to
    Eq,
    /// Not equal to
    Ne,
}

impl fmt::Display for SpecOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
        }
    }
}

/// Value a spec condition compares against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Null (absent) value
    Null,
}

impl From<&str> for SpecValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for SpecValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for SpecValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<SpecValue>> From<Option<T>> for SpecValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// A single comparison over a (possibly alias-qualified) field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecCondition {
    /// Field path, e.g. `domain.authority` or `s.short_code`
    pub field: String,
    /// Comparison operator
    pub operator: SpecOperator,
    /// Value to compare against
    pub value: SpecValue,
}

impl SpecCondition {
    pub fn new(field: impl Into<String>, operator: SpecOperator, value: SpecValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    fn matches(&self, target: &impl SpecTarget) -> bool {
        let actual = target.field(&self.field).unwrap_or(SpecValue::Null);
        match self.operator {
            SpecOperator::Eq => actual == self.value,
            SpecOperator::Ne => actual != self.value,
        }
    }
}

impl fmt::Display for SpecCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operator, &self.value) {
            (SpecOperator::Eq, SpecValue::Null) => write!(f, "{} IS NULL", self.field),
            (SpecOperator::Ne, SpecValue::Null) => write!(f, "{} IS NOT NULL", self.field),
            (op, SpecValue::String(s)) => write!(f, "{} {} '{}'", self.field, op, s),
            (op, SpecValue::Boolean(b)) => write!(f, "{} {} {}", self.field, op, b),
        }
    }
}

/// An AND-composable predicate over persisted entities
///
/// `Always` is the identity of conjunction: a key with no roles produces
/// `Spec::and_all([])`, which is `Always`, which is how unrestricted (admin)
/// access falls out of the same code path as restricted access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spec {
    /// Always-true predicate (no restriction)
    Always,
    /// A single condition
    Condition(SpecCondition),
    /// Conjunction of sub-specs
    And(Vec<Spec>),
}

impl Spec {
    /// Create an equality condition
    pub fn eq(field: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        Self::Condition(SpecCondition::new(field, SpecOperator::Eq, value.into()))
    }

    /// Create a not-equal condition
    pub fn ne(field: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        Self::Condition(SpecCondition::new(field, SpecOperator::Ne, value.into()))
    }

    /// AND together any number of specs
    ///
    /// Closed composition: an empty input yields [`Spec::Always`] and a
    /// single conjunct collapses to itself. Input order is preserved so the
    /// rendered form is reproducible.
    pub fn and_all(specs: impl IntoIterator<Item = Spec>) -> Self {
        let mut specs: Vec<Spec> = specs.into_iter().collect();
        match specs.len() {
            0 => Self::Always,
            1 => specs.remove(0),
            _ => Self::And(specs),
        }
    }

    /// Whether this spec imposes no restriction at all
    pub fn is_always(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Condition(_) => false,
            Self::And(specs) => specs.iter().all(Spec::is_always),
        }
    }

    /// Evaluate the spec against an in-memory target
    ///
    /// Fields the target does not expose compare as null.
    pub fn matches(&self, target: &impl SpecTarget) -> bool {
        match self {
            Self::Always => true,
            Self::Condition(condition) => condition.matches(target),
            Self::And(specs) => specs.iter().all(|spec| spec.matches(target)),
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "1 = 1"),
            Self::Condition(condition) => write!(f, "{condition}"),
            Self::And(specs) => {
                for (i, spec) in specs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    if matches!(spec, Self::And(_)) {
                        write!(f, "({spec})")?;
                    } else {
                        write!(f, "{spec}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Trait for entities a [`Spec`] can be evaluated against in memory
pub trait SpecTarget {
    /// Look up a field value by its path; `None` means the field is absent
    fn field(&self, path: &str) -> Option<SpecValue>;
}
