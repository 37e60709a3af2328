mod cast;
mod count;
mod maximum;
mod minimum;
mod sum;

pub use cast::*;
pub use count::*;
pub use maximum::*;
pub use minimum::*;
pub use sum::*;

use super::{Catalog, ValueType};

/// A database function definition
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub(crate) typ_: FunctionType,
}

impl Function {
    /// The SQL name of the function.
    pub fn name(&self) -> &'static str {
        match &self.typ_ {
            FunctionType::Count(_) => "count",
            FunctionType::Sum(_) => "sum",
            FunctionType::Minimum(_) => "min",
            FunctionType::Maximum(_) => "max",
            FunctionType::Cast(_) => "cast",
        }
    }

    /// The declared type of the function result, when it can be inferred.
    pub fn value_type(&self, catalog: &Catalog) -> Option<ValueType> {
        match &self.typ_ {
            FunctionType::Count(_) => Some(ValueType::BigInt),
            FunctionType::Sum(sum) => sum.expr.value_type(catalog),
            FunctionType::Minimum(min) => min.expr.value_type(catalog),
            FunctionType::Maximum(max) => max.expr.value_type(catalog),
            FunctionType::Cast(cast) => Some(cast.target.clone()),
        }
    }
}

/// A database function type
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FunctionType {
    Count(Count),
    Sum(Sum),
    Minimum(Minimum),
    Maximum(Maximum),
    Cast(Cast),
}
