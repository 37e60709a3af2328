use super::{ColumnId, Expression, Function};

/// The ordering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl Order {
    pub fn keyword(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Defines ordering for an `ORDER BY` statement.
pub type OrderDefinition = (Expression, Option<Order>);

/// The `order by` clause.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct OrderBy(pub(crate) Vec<OrderDefinition>);

impl OrderBy {
    pub fn add<T>(&mut self, value: T) -> &mut Self
    where
        T: IntoOrderDefinition,
    {
        self.0.push(value.into_order_definition());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderDefinition> {
        self.0.iter()
    }
}

/// Convert the value into an order definition with order item and direction
pub trait IntoOrderDefinition {
    fn into_order_definition(self) -> OrderDefinition;
}

impl IntoOrderDefinition for Expression {
    fn into_order_definition(self) -> OrderDefinition {
        (self, None)
    }
}

impl IntoOrderDefinition for ColumnId {
    fn into_order_definition(self) -> OrderDefinition {
        (self.into(), None)
    }
}

impl IntoOrderDefinition for Function {
    fn into_order_definition(self) -> OrderDefinition {
        (self.into(), None)
    }
}

impl IntoOrderDefinition for OrderDefinition {
    fn into_order_definition(self) -> OrderDefinition {
        self
    }
}

/// An item that can be used in the `ORDER BY` statement
pub trait Orderable: Sized {
    /// Order by `self` in the given order
    fn order(self, order: Option<Order>) -> OrderDefinition;

    /// Change the order to `ASC`
    fn ascend(self) -> OrderDefinition {
        self.order(Some(Order::Asc))
    }

    /// Change the order to `DESC`
    fn descend(self) -> OrderDefinition {
        self.order(Some(Order::Desc))
    }
}

impl<T> Orderable for T
where
    T: Into<Expression>,
{
    fn order(self, order: Option<Order>) -> OrderDefinition {
        (self.into(), order)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;

    #[test]
    fn columns_functions_and_definitions_order() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);

        let mut ordering = OrderBy::default();
        ordering.add(a).add(count(a)).add(a.descend());

        let directions: Vec<_> = ordering.iter().map(|(_, order)| *order).collect();

        assert_eq!(vec![None, None, Some(Order::Desc)], directions);
        assert_eq!(Expression::from(a), ordering.iter().next().unwrap().0);
    }
}
