//! Typed clause chaining.
//!
//! Each step of the chain is its own type, so that clauses can only be
//! added in rendering order: `select`, `from`, `where`, `group by`,
//! `having`, `order by`, `limit`. Every step converts into a [Query] or a
//! [Statement].
use super::{
    ColumnId, Criterion, Expression, IntoOrderDefinition, JoinDirection, Limit, LogicalOperator,
    Query, Statement, TableId,
};

macro_rules! fluent_steps {
    ($($step:ident),*) => {
        $(
            impl From<$step> for Query {
                fn from(step: $step) -> Self {
                    step.query
                }
            }

            impl From<$step> for Statement {
                fn from(step: $step) -> Self {
                    Statement::from(step.query)
                }
            }
        )*
    };
}

fluent_steps!(
    FluentSelect,
    FluentFrom,
    FluentWhere,
    FluentGroupBy,
    FluentHaving,
    FluentOrderBy,
    FluentLimit
);

/// The projection step.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentSelect {
    query: Query,
}

impl FluentSelect {
    pub(crate) fn from_query(query: Query) -> Self {
        FluentSelect { query }
    }

    /// Adds one more expression to the projection.
    pub fn add<T>(mut self, value: T) -> Self
    where
        T: Into<Expression>,
    {
        self.query.select.add(value);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.query.select.set_distinct(true);
        self
    }

    pub fn from(mut self, table: TableId) -> FluentFrom {
        self.query.from.set_root(table);
        FluentFrom { query: self.query }
    }

    /// Sets the root table, referred to by `alias` in the whole query.
    pub fn from_aliased(mut self, table: TableId, alias: impl Into<String>) -> FluentFrom {
        self.query.from.set_root(table).set_alias(table, alias);
        FluentFrom { query: self.query }
    }
}

/// The `from` step, where joins are declared.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentFrom {
    query: Query,
}

impl FluentFrom {
    pub fn inner_join(mut self, left: ColumnId, right: ColumnId) -> Self {
        self.query.from.inner_join(left, right);
        self
    }

    pub fn left_outer_join(mut self, left: ColumnId, right: ColumnId) -> Self {
        self.query.from.left_outer_join(left, right);
        self
    }

    pub fn right_outer_join(mut self, left: ColumnId, right: ColumnId) -> Self {
        self.query.from.right_outer_join(left, right);
        self
    }

    pub fn key_join(
        mut self,
        direction: JoinDirection,
        left: Vec<ColumnId>,
        right: Vec<ColumnId>,
    ) -> Self {
        self.query.from.key_join(direction, left, right);
        self
    }

    pub fn raw_join(
        mut self,
        direction: JoinDirection,
        right: TableId,
        on: impl Into<String>,
    ) -> Self {
        self.query.from.raw_join(direction, right, on);
        self
    }

    pub fn cross_join(mut self, right: TableId) -> Self {
        self.query.from.cross_join(right);
        self
    }

    /// Gives an alias to a table of the clause.
    pub fn with_alias(mut self, table: TableId, alias: impl Into<String>) -> Self {
        self.query.from.set_alias(table, alias);
        self
    }

    pub fn where_(mut self, criterion: impl Into<Criterion>) -> FluentWhere {
        self.query.conditions.push(LogicalOperator::And, criterion);
        FluentWhere { query: self.query }
    }
}

/// The `where` step.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentWhere {
    query: Query,
}

impl FluentWhere {
    pub fn and(mut self, criterion: impl Into<Criterion>) -> Self {
        self.query.conditions.push(LogicalOperator::And, criterion);
        self
    }

    pub fn or(mut self, criterion: impl Into<Criterion>) -> Self {
        self.query.conditions.push(LogicalOperator::Or, criterion);
        self
    }
}

/// The `group by` step.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentGroupBy {
    query: Query,
}

impl FluentGroupBy {
    pub fn having(mut self, criterion: impl Into<Criterion>) -> FluentHaving {
        self.query.having.push(LogicalOperator::And, criterion);
        FluentHaving { query: self.query }
    }
}

/// The `having` step.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentHaving {
    query: Query,
}

impl FluentHaving {
    pub fn and(mut self, criterion: impl Into<Criterion>) -> Self {
        self.query.having.push(LogicalOperator::And, criterion);
        self
    }

    pub fn or(mut self, criterion: impl Into<Criterion>) -> Self {
        self.query.having.push(LogicalOperator::Or, criterion);
        self
    }
}

/// The `order by` step.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentOrderBy {
    query: Query,
}

/// The `limit` step, last of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentLimit {
    query: Query,
}

/// Steps after which a `group by` may come.
pub trait GroupByChain: Into<Query> {
    fn group_by<I, T>(self, values: I) -> FluentGroupBy
    where
        I: IntoIterator<Item = T>,
        T: Into<Expression>,
    {
        let mut query: Query = self.into();

        for value in values {
            query.grouping.add(value);
        }

        FluentGroupBy { query }
    }
}

/// Steps after which an `order by` may come. Calling it again on the
/// `order by` step appends to the ordering.
pub trait OrderByChain: Into<Query> {
    fn order_by<T>(self, value: T) -> FluentOrderBy
    where
        T: IntoOrderDefinition,
    {
        let mut query: Query = self.into();
        query.ordering.add(value);

        FluentOrderBy { query }
    }
}

/// Steps after which a `limit` may come.
pub trait LimitChain: Into<Query> {
    fn limit(self, count: u64) -> FluentLimit {
        let mut query: Query = self.into();
        query.set_limit(Some(Limit::new(count)));

        FluentLimit { query }
    }

    fn limit_offset(self, count: u64, offset: u64) -> FluentLimit {
        let mut query: Query = self.into();
        query.set_limit(Some(Limit::with_offset(count, offset)));

        FluentLimit { query }
    }
}

impl GroupByChain for FluentFrom {}
impl GroupByChain for FluentWhere {}

impl OrderByChain for FluentFrom {}
impl OrderByChain for FluentWhere {}
impl OrderByChain for FluentGroupBy {}
impl OrderByChain for FluentHaving {}
impl OrderByChain for FluentOrderBy {}

impl LimitChain for FluentFrom {}
impl LimitChain for FluentWhere {}
impl LimitChain for FluentGroupBy {}
impl LimitChain for FluentHaving {}
impl LimitChain for FluentOrderBy {}

#[cfg(test)]
mod tests {
    use crate::ast::*;

    #[test]
    fn chain_fills_every_clause() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);
        let b = catalog.add_column(toto, "b", ValueType::Integer);

        let query: Query = Query::select([Expression::from(a), count(b).into()])
            .distinct()
            .from(toto)
            .where_(a.greater_than(1))
            .or(a.is_null())
            .group_by([a])
            .having(count(b).greater_than(2))
            .order_by(a.ascend())
            .order_by(b)
            .limit_offset(10, 20)
            .into();

        assert!(query.select_clause().is_distinct());
        assert_eq!(2, query.select_clause().columns().len());
        assert_eq!(Some(toto), query.from_clause().root());
        assert_eq!(2, query.where_clause().len());
        assert_eq!(
            Some(LogicalOperator::Or),
            query.where_clause().iter().nth(1).and_then(Criterion::combinator)
        );
        assert_eq!(1, query.group_by_clause().iter().count());
        assert_eq!(1, query.having_clause().len());
        assert_eq!(2, query.order_by_clause().iter().count());
        assert_eq!(Some(&Limit::with_offset(10, 20)), query.limit_clause());
    }

    #[test]
    fn from_aliased_registers_the_alias() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        let a = catalog.add_column(toto, "a", ValueType::Integer);

        let query: Query = Query::select([a]).from_aliased(toto, "t").into();

        assert_eq!(Some("t"), query.from_clause().alias_of(toto));
    }
}
