use super::Expression;

/// The projection of a query: `select [distinct] <expressions>`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Select {
    pub(crate) distinct: bool,
    pub(crate) columns: Vec<Expression>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an expression to the projection.
    pub fn add<T>(&mut self, value: T) -> &mut Self
    where
        T: Into<Expression>,
    {
        self.columns.push(value.into());
        self
    }

    /// A bulk method to select multiple values.
    pub fn add_all<I, T>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expression>,
    {
        self.columns.extend(values.into_iter().map(Into::into));
        self
    }

    /// Adds `DISTINCT` to the projection.
    pub fn set_distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn columns(&self) -> &[Expression] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
