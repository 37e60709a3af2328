use super::Function;
use crate::ast::{Expression, FunctionType};

/// A represention of the `MIN` function in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub(crate) expr: Box<Expression>,
}

/// Calculates the minimum value of a column.
pub fn min<E>(expr: E) -> Function
where
    E: Into<Expression>,
{
    let fun = Minimum {
        expr: Box::new(expr.into()),
    };
    fun.into()
}

impl From<Minimum> for Function {
    fn from(value: Minimum) -> Self {
        Self {
            typ_: FunctionType::Minimum(value),
        }
    }
}
