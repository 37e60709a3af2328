use super::Function;
use crate::ast::{Expression, FunctionType};

/// A represention of the `MAX` function in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Maximum {
    pub(crate) expr: Box<Expression>,
}

/// Calculates the maximum value of a column.
pub fn max<E>(expr: E) -> Function
where
    E: Into<Expression>,
{
    let fun = Maximum {
        expr: Box::new(expr.into()),
    };
    fun.into()
}

impl From<Maximum> for Function {
    fn from(value: Maximum) -> Self {
        Self {
            typ_: FunctionType::Maximum(value),
        }
    }
}
