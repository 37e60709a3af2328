use serde_json::Value;

use super::{ColumnId, Expression, Function};

/// The value slot of an operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A concrete value, `Value::Null` included.
    Value(Value),
    /// A placeholder whose value is supplied when the statement is finalized.
    Named(String),
    /// Another selectable, e.g. a column or a function call.
    Expression(Box<Expression>),
}

impl Operand {
    /// Whether the operand is a concrete `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Value(Value::Null))
    }
}

/// A placeholder operand named `name`. Every occurrence of the same name in
/// a statement is bound to the same runtime value.
pub fn param(name: impl Into<String>) -> Operand {
    Operand::Named(name.into())
}

impl<T> From<T> for Operand
where
    T: Into<Value>,
{
    fn from(value: T) -> Self {
        Operand::Value(value.into())
    }
}

impl From<Expression> for Operand {
    fn from(expression: Expression) -> Self {
        Operand::Expression(Box::new(expression))
    }
}

impl From<ColumnId> for Operand {
    fn from(column: ColumnId) -> Self {
        Operand::from(Expression::from(column))
    }
}

impl From<Function> for Operand {
    fn from(function: Function) -> Self {
        Operand::from(Expression::from(function))
    }
}

/// The right side of an `in` operator.
#[derive(Debug, Clone, PartialEq)]
pub enum InValues {
    /// Values given as a collection. A missing collection degrades to `is null`.
    Iterable(Option<Vec<Operand>>),
    /// Values given one by one. A single `null` renders `in (null)`.
    Values(Vec<Operand>),
    /// A placeholder expanded to as many parameters as its runtime value has items.
    Named(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperatorKind {
    /// `= value`
    Equals(Operand),
    /// `> value`, or `>= value`
    Greater { value: Operand, or_equals: bool },
    /// `< value`, or `<= value`
    Lower { value: Operand, or_equals: bool },
    /// `between lower and upper`, a missing bound degrades to a comparison.
    Between { lower: Operand, upper: Operand },
    /// `in (values)`
    In(InValues),
    /// `like value`, with `%` added on the flagged sides of a string value.
    Like {
        value: Operand,
        leading_wildcard: bool,
        trailing_wildcard: bool,
    },
    /// `is null`
    IsNull,
}

/// A predicate applied to the left side of a criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub(crate) kind: OperatorKind,
    pub(crate) not: bool,
}

impl Operator {
    pub fn new(kind: OperatorKind) -> Self {
        Operator { kind, not: false }
    }

    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn is_not(&self) -> bool {
        self.not
    }
}

impl std::ops::Not for Operator {
    type Output = Operator;

    fn not(mut self) -> Self::Output {
        self.not = !self.not;
        self
    }
}

/// Negates the operator. Negating twice gives back the original operator.
pub fn not(operator: Operator) -> Operator {
    !operator
}

pub fn eq<T: Into<Operand>>(value: T) -> Operator {
    Operator::new(OperatorKind::Equals(value.into()))
}

pub fn not_eq<T: Into<Operand>>(value: T) -> Operator {
    !eq(value)
}

pub fn gt<T: Into<Operand>>(value: T) -> Operator {
    Operator::new(OperatorKind::Greater {
        value: value.into(),
        or_equals: false,
    })
}

pub fn gteq<T: Into<Operand>>(value: T) -> Operator {
    Operator::new(OperatorKind::Greater {
        value: value.into(),
        or_equals: true,
    })
}

pub fn lt<T: Into<Operand>>(value: T) -> Operator {
    Operator::new(OperatorKind::Lower {
        value: value.into(),
        or_equals: false,
    })
}

pub fn lteq<T: Into<Operand>>(value: T) -> Operator {
    Operator::new(OperatorKind::Lower {
        value: value.into(),
        or_equals: true,
    })
}

pub fn between<T: Into<Operand>, V: Into<Operand>>(lower: T, upper: V) -> Operator {
    Operator::new(OperatorKind::Between {
        lower: lower.into(),
        upper: upper.into(),
    })
}

/// `in` over an optional collection: `None` renders `is null`, an empty
/// collection renders `in ()`.
pub fn in_list<I, T>(values: Option<I>) -> Operator
where
    I: IntoIterator<Item = T>,
    T: Into<Operand>,
{
    let values = values.map(|values| values.into_iter().map(Into::into).collect());
    Operator::new(OperatorKind::In(InValues::Iterable(values)))
}

/// `in` over values given one by one.
pub fn in_values<I, T>(values: I) -> Operator
where
    I: IntoIterator<Item = T>,
    T: Into<Operand>,
{
    let values = values.into_iter().map(Into::into).collect();
    Operator::new(OperatorKind::In(InValues::Values(values)))
}

/// `in` over a collection supplied at finalization time under `name`.
pub fn in_named(name: impl Into<String>) -> Operator {
    Operator::new(OperatorKind::In(InValues::Named(name.into())))
}

pub fn like<T: Into<Operand>>(value: T) -> Operator {
    like_with(value, false, false)
}

pub fn starts_with<T: Into<Operand>>(value: T) -> Operator {
    like_with(value, false, true)
}

pub fn ends_with<T: Into<Operand>>(value: T) -> Operator {
    like_with(value, true, false)
}

pub fn contains<T: Into<Operand>>(value: T) -> Operator {
    like_with(value, true, true)
}

fn like_with<T: Into<Operand>>(value: T, leading_wildcard: bool, trailing_wildcard: bool) -> Operator {
    Operator::new(OperatorKind::Like {
        value: value.into(),
        leading_wildcard,
        trailing_wildcard,
    })
}

pub fn is_null() -> Operator {
    Operator::new(OperatorKind::IsNull)
}

pub fn is_not_null() -> Operator {
    !is_null()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_negation_gives_back_the_operator() {
        assert_eq!(eq(Value::Null), not(not(eq(Value::Null))));
        assert!(not_eq(1).is_not());
    }

    #[test]
    fn like_variants_flag_their_wildcards() {
        assert_eq!(
            &OperatorKind::Like {
                value: Operand::from("a"),
                leading_wildcard: false,
                trailing_wildcard: true
            },
            starts_with("a").kind()
        );
        assert_eq!(
            &OperatorKind::Like {
                value: Operand::from("a"),
                leading_wildcard: true,
                trailing_wildcard: true
            },
            contains("a").kind()
        );
    }

    #[test]
    fn missing_collection_is_kept_apart_from_null_value() {
        assert_eq!(
            &OperatorKind::In(InValues::Iterable(None)),
            in_list(None::<Vec<i32>>).kind()
        );
        assert_eq!(
            &OperatorKind::In(InValues::Values(vec![Operand::Value(Value::Null)])),
            in_values([Value::Null]).kind()
        );
    }
}
