use super::{
    Catalog, Criteria, Expression, FluentSelect, FromClause, GroupBy, Limit, OrderBy, Select,
    Statement, TableId, ValueType,
};

/// A `select` statement, clause by clause.
///
/// Every clause is optional. Empty clauses are skipped when rendering.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Query {
    pub(crate) select: Select,
    pub(crate) from: FromClause,
    pub(crate) conditions: Criteria,
    pub(crate) grouping: GroupBy,
    pub(crate) having: Criteria,
    pub(crate) ordering: OrderBy,
    pub(crate) limit: Option<Limit>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a query through the fluent clause chain.
    ///
    /// ```rust
    /// # use sqlweave::{ast::*, renderer::{Inline, Renderer}};
    /// let mut catalog = Catalog::default();
    /// let toto = catalog.add_table("Toto");
    /// let a = catalog.add_column(toto, "a", ValueType::Integer);
    ///
    /// let query = Query::select([a]).from(toto).order_by(a.descend());
    ///
    /// assert_eq!("select Toto.a from Toto order by Toto.a desc", Inline::build(&catalog, &query.into()));
    /// ```
    pub fn select<I, T>(items: I) -> FluentSelect
    where
        I: IntoIterator<Item = T>,
        T: Into<Expression>,
    {
        let mut query = Query::new();
        query.select.add_all(items);

        FluentSelect::from_query(query)
    }

    pub fn select_clause(&self) -> &Select {
        &self.select
    }

    pub fn select_clause_mut(&mut self) -> &mut Select {
        &mut self.select
    }

    pub fn from_clause(&self) -> &FromClause {
        &self.from
    }

    pub fn from_clause_mut(&mut self) -> &mut FromClause {
        &mut self.from
    }

    pub fn where_clause(&self) -> &Criteria {
        &self.conditions
    }

    pub fn where_clause_mut(&mut self) -> &mut Criteria {
        &mut self.conditions
    }

    pub fn group_by_clause(&self) -> &GroupBy {
        &self.grouping
    }

    pub fn group_by_clause_mut(&mut self) -> &mut GroupBy {
        &mut self.grouping
    }

    pub fn having_clause(&self) -> &Criteria {
        &self.having
    }

    pub fn having_clause_mut(&mut self) -> &mut Criteria {
        &mut self.having
    }

    pub fn order_by_clause(&self) -> &OrderBy {
        &self.ordering
    }

    pub fn order_by_clause_mut(&mut self) -> &mut OrderBy {
        &mut self.ordering
    }

    pub fn limit_clause(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    pub fn set_limit(&mut self, limit: Option<Limit>) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Wraps the query as a table of the catalog. Its columns proxy the
    /// projected expressions, named after their alias when they have one.
    pub fn as_pseudo_table(self, catalog: &mut Catalog, name: Option<String>) -> TableId {
        let columns = self
            .select
            .columns
            .iter()
            .map(|expression| {
                let value_type = expression
                    .value_type(catalog)
                    .unwrap_or_else(|| ValueType::Other(String::from("unknown")));

                (
                    expression.projected_name(catalog),
                    value_type,
                    Some(expression.clone()),
                )
            })
            .collect();

        catalog.add_pseudo_table(Statement::from(self), name, columns)
    }
}
