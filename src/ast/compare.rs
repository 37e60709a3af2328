use super::operator;
use crate::ast::{Condition, Criterion, Expression, Operand, Operator};

/// An item that can be compared against other values in the database.
///
/// Every method builds a [Criterion] having `self` as its left side.
pub trait Comparable: Sized {
    /// Checks the left side against the given operator.
    fn matches(self, operator: Operator) -> Criterion;

    /// Checks the left side against a free-text condition, e.g. `"= 1"`.
    fn condition<T>(self, condition: T) -> Criterion
    where
        T: Into<String>;

    /// Tests if both sides are the same value. A `null` right side renders `is null`.
    fn equals<T>(self, comparison: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::eq(comparison))
    }

    /// Tests if both sides are not the same value.
    fn not_equals<T>(self, comparison: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::not_eq(comparison))
    }

    /// Tests if the left side is bigger than the right side.
    fn greater_than<T>(self, comparison: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::gt(comparison))
    }

    /// Tests if the left side is bigger than the right side or the same.
    fn greater_than_or_equals<T>(self, comparison: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::gteq(comparison))
    }

    /// Tests if the left side is smaller than the right side.
    fn lower_than<T>(self, comparison: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::lt(comparison))
    }

    /// Tests if the left side is smaller than the right side or the same.
    fn lower_than_or_equals<T>(self, comparison: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::lteq(comparison))
    }

    /// Tests if the value is between two given values.
    fn between<T, V>(self, lower: T, upper: V) -> Criterion
    where
        T: Into<Operand>,
        V: Into<Operand>,
    {
        self.matches(operator::between(lower, upper))
    }

    /// Tests if the left side is included in an optional collection.
    fn in_list<I, T>(self, values: Option<I>) -> Criterion
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.matches(operator::in_list(values))
    }

    /// Tests if the left side is one of the given values.
    fn in_values<I, T>(self, values: I) -> Criterion
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.matches(operator::in_values(values))
    }

    /// Tests if the left side is included in a collection supplied later under `name`.
    fn in_named<T>(self, name: T) -> Criterion
    where
        T: Into<String>,
    {
        self.matches(operator::in_named(name))
    }

    /// Tests if the left side matches the pattern as is.
    fn like<T>(self, pattern: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::like(pattern))
    }

    /// Tests if the left side starts with the given string.
    fn starts_with<T>(self, prefix: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::starts_with(prefix))
    }

    /// Tests if the left side ends with the given string.
    fn ends_with<T>(self, suffix: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::ends_with(suffix))
    }

    /// Tests if the left side includes the given string.
    fn contains<T>(self, infix: T) -> Criterion
    where
        T: Into<Operand>,
    {
        self.matches(operator::contains(infix))
    }

    /// Tests if the left side is `NULL`.
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Criterion {
        self.matches(operator::is_null())
    }

    /// Tests if the left side is not `NULL`.
    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Criterion {
        self.matches(operator::is_not_null())
    }
}

impl<U> Comparable for U
where
    U: Into<Expression>,
{
    fn matches(self, operator: Operator) -> Criterion {
        Criterion::column(self, Condition::Operator(operator))
    }

    fn condition<T>(self, condition: T) -> Criterion
    where
        T: Into<String>,
    {
        Criterion::column(self, Condition::Text(condition.into()))
    }
}
