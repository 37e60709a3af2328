use super::Expression;

/// The `group by` clause.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct GroupBy(pub(crate) Vec<Expression>);

impl GroupBy {
    /// Adds a grouping. This does not check if the grouping is actually
    /// valid in respect to aggregated columns.
    pub fn add<T>(&mut self, value: T) -> &mut Self
    where
        T: Into<Expression>,
    {
        self.0.push(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expression> {
        self.0.iter()
    }
}
