use crate::ast::{Expression, Function, FunctionType, ValueType};

/// A represention of the `CAST(.. AS ..)` conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    pub(crate) expr: Box<Expression>,
    pub(crate) target: ValueType,
    /// Overrides the SQL name of the target type, e.g. `varchar(255)`.
    pub(crate) sql_type: Option<String>,
}

/// Converts the expression to the given type, named after its neutral SQL name.
pub fn cast<E>(expr: E, target: ValueType) -> Function
where
    E: Into<Expression>,
{
    let fun = Cast {
        expr: Box::new(expr.into()),
        target,
        sql_type: None,
    };

    fun.into()
}

/// Converts the expression to the given type, rendering `sql_type` as the target.
pub fn cast_as<E>(expr: E, sql_type: impl Into<String>, target: ValueType) -> Function
where
    E: Into<Expression>,
{
    let fun = Cast {
        expr: Box::new(expr.into()),
        target,
        sql_type: Some(sql_type.into()),
    };

    fun.into()
}

impl From<Cast> for Function {
    fn from(value: Cast) -> Self {
        Self {
            typ_: FunctionType::Cast(value),
        }
    }
}
