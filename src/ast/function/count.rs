use super::Function;
use crate::ast::{Expression, FunctionType};

#[derive(Debug, Clone, PartialEq)]
/// Returns the number of rows that matches a specified criteria.
pub struct Count {
    pub(crate) exprs: Vec<Expression>,
    pub(crate) distinct: bool,
}

/// Count of the underlying table where the given expression is not null.
pub fn count<T>(expr: T) -> Function
where
    T: Into<Expression>,
{
    let fun = Count {
        exprs: vec![expr.into()],
        distinct: false,
    };

    fun.into()
}

/// Count of the distinct values of the given expressions.
pub fn count_distinct<I, T>(exprs: I) -> Function
where
    I: IntoIterator<Item = T>,
    T: Into<Expression>,
{
    let fun = Count {
        exprs: exprs.into_iter().map(Into::into).collect(),
        distinct: true,
    };

    fun.into()
}

impl From<Count> for Function {
    fn from(value: Count) -> Self {
        Self {
            typ_: FunctionType::Count(value),
        }
    }
}
