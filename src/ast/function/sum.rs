use crate::ast::{Expression, Function, FunctionType};

/// A represention of the `SUM` function in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    pub(crate) expr: Box<Expression>,
}

/// Calculates the sum value of a numeric column.
pub fn sum<E>(expr: E) -> Function
where
    E: Into<Expression>,
{
    let fun = Sum {
        expr: Box::new(expr.into()),
    };

    fun.into()
}

impl From<Sum> for Function {
    fn from(value: Sum) -> Self {
        Self {
            typ_: FunctionType::Sum(value),
        }
    }
}
