//! Visitors turning statements into SQL text.
//!
//! The [Renderer] trait walks a [Statement] clause by clause. Concrete
//! renderers only decide how values and named placeholders are written:
//! [Inline] writes values as literals, [Prepared] writes placeholders and
//! collects the values in a [ParameterizedSql](crate::appender::ParameterizedSql).
mod inline;
mod naming;
mod prepared;

use std::fmt;

use serde_json::Value;

use crate::{appender::SqlAppender, ast::*};

pub use inline::Inline;
pub use naming::{KeywordEscaper, NameEscaper, NoEscape};
pub use prepared::Prepared;

/// A function travelling through the query AST, building the final query
/// string and gathering parameters sent to the database together with the
/// query.
pub trait Renderer<'a>: Sized {
    /// What the renderer produces once the statement is visited.
    type Output;

    /// A renderer resolving tables and columns against `catalog`, with no
    /// escaping of names.
    fn new(catalog: &'a Catalog) -> Self;

    /// The text, and parameters if any, written so far.
    fn finish(self) -> Self::Output;

    fn appender(&self) -> &SqlAppender<'a>;

    fn appender_mut(&mut self) -> &mut SqlAppender<'a>;

    fn escaper(&self) -> &dyn NameEscaper;

    /// A value to be written in the query.
    fn visit_value(&mut self, value: &Value);

    /// A placeholder whose value is supplied later.
    fn visit_named(&mut self, name: &str, expandable: bool);

    /// Renders a whole statement.
    fn build(catalog: &'a Catalog, statement: &Statement) -> Self::Output {
        let mut renderer = Self::new(catalog);
        renderer.visit_statement(statement);

        renderer.finish()
    }

    /// Write to the query.
    fn write<D: fmt::Display>(&mut self, s: D) {
        self.appender_mut().write(s);
    }

    fn surround_with<F>(&mut self, begin: &str, end: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.write(begin);
        f(self);
        self.write(end)
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.visit_query(query),
            Statement::Union(union) => self.visit_union(union),
        }
    }

    /// A walk through a `select` statement. The tables of its `from`
    /// clause, and their aliases, are in scope for the whole query.
    fn visit_query(&mut self, query: &Query) {
        self.appender_mut().open_scope(query.from.naming_scope());

        self.visit_select(&query.select);
        self.visit_from(&query.from);

        if has_conditions(&query.conditions) {
            self.write(" where ");
            self.visit_criteria(&query.conditions);
        }

        if !query.grouping.is_empty() {
            self.write(" group by ");
            self.visit_grouping(&query.grouping);
        }

        if has_conditions(&query.having) {
            self.write(" having ");
            self.visit_criteria(&query.having);
        }

        if !query.ordering.is_empty() {
            self.write(" order by ");
            self.visit_ordering(&query.ordering);
        }

        if let Some(limit) = &query.limit {
            self.visit_limit(limit);
        }

        self.appender_mut().close_scope();
    }

    /// Member queries, joined with `union all`.
    fn visit_union(&mut self, union: &Union) {
        for (i, query) in union.queries.iter().enumerate() {
            if i > 0 {
                self.write(" union all ");
            }

            self.visit_query(query);
        }
    }

    /// The projection, without the `from` clause.
    fn visit_select(&mut self, select: &Select) {
        self.write("select ");

        if select.distinct {
            self.write("distinct ");
        }

        let len = select.columns.len();

        for (i, expression) in select.columns.iter().enumerate() {
            self.visit_expression(expression);

            if let Some(alias) = &expression.alias {
                self.write(" as ");
                self.visit_name(alias);
            }

            if i < (len - 1) {
                self.write(", ");
            }
        }
    }

    /// The `from` clause with its joins, prefixed by a space. Nothing is
    /// written without a root table. The clause's own aliases are in scope
    /// for its join conditions.
    fn visit_from(&mut self, from: &FromClause) {
        let Some(root) = from.root else {
            return;
        };

        self.appender_mut().open_scope(from.naming_scope());

        self.write(" from ");
        self.visit_table_reference(root);

        for join in from.joins.iter() {
            if join.right_table().is_some() {
                self.write(" ");
                self.visit_join(join);
            }
        }

        self.appender_mut().close_scope();
    }

    fn visit_join(&mut self, join: &Join) {
        match join {
            Join::Cross { right } => {
                self.write("cross join ");
                self.visit_table_reference(*right);
            }
            Join::Raw {
                direction,
                right,
                on,
            } => {
                self.write(direction.keyword());
                self.write(" ");
                self.visit_table_reference(*right);
                self.write(" on ");
                self.write(on);
            }
            Join::Column {
                direction,
                left,
                right,
            } => {
                self.write(direction.keyword());
                self.write(" ");
                self.visit_table_reference(right.table_id);
                self.write(" on ");
                self.visit_column(*left);
                self.write(" = ");
                self.visit_column(*right);
            }
            Join::Key {
                direction,
                left,
                right,
            } => {
                let Some(table) = join.right_table() else {
                    return;
                };

                self.write(direction.keyword());
                self.write(" ");
                self.visit_table_reference(table);
                self.write(" on ");

                for (i, (left, right)) in left.iter().zip(right.iter()).enumerate() {
                    if i > 0 {
                        self.write(" and ");
                    }

                    self.visit_column(*left);
                    self.write(" = ");
                    self.visit_column(*right);
                }
            }
        }
    }

    /// A table as it appears in a `from` clause or a join: its name or its
    /// statement between parentheses, followed by its alias.
    fn visit_table_reference(&mut self, table: TableId) {
        let catalog = self.appender().catalog();
        let definition = catalog.table(table);

        match definition.statement() {
            Some(statement) => {
                self.surround_with("(", ")", |s| s.visit_statement(statement));
            }
            None => self.visit_qualified_name(definition),
        }

        let alias = match self.appender().alias_of(table) {
            Some(alias) => Some(alias.to_string()),
            None if definition.statement().is_some() => {
                Some(pseudo_table_name(definition, table))
            }
            None => None,
        };

        if let Some(alias) = alias {
            self.write(" as ");
            self.visit_name(&alias);
        }
    }

    /// The table part of a column reference: its alias when it has one.
    fn visit_table_name(&mut self, table: TableId) {
        let definition = self.appender().catalog().table(table);

        match self.appender().alias_of(table).map(str::to_string) {
            Some(alias) => self.visit_name(&alias),
            None if definition.statement().is_some() => {
                let name = pseudo_table_name(definition, table);
                self.visit_name(&name)
            }
            None => self.visit_qualified_name(definition),
        }
    }

    fn visit_qualified_name(&mut self, definition: &TableDef) {
        if let Some(schema) = definition.schema() {
            self.visit_name(schema);
            self.write(".");
        }

        if let Some(name) = definition.name() {
            self.visit_name(name);
        }
    }

    /// `table.column`
    fn visit_column(&mut self, column: ColumnId) {
        let catalog = self.appender().catalog();

        self.visit_table_name(column.table_id);
        self.write(".");
        self.visit_name(catalog.column_def(column).name());
    }

    /// A name, escaped if needed.
    fn visit_name(&mut self, name: &str) {
        let escaped = self.escaper().escape(name).into_owned();
        self.write(escaped);
    }

    fn visit_expression(&mut self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::Parameterized(value) => self.visit_value(value),
            ExpressionKind::Raw(text) => self.write(text),
            ExpressionKind::Column(column) => self.visit_column(*column),
            ExpressionKind::Function(function) => self.visit_function(function),
        }
    }

    fn visit_function(&mut self, function: &Function) {
        match &function.typ_ {
            FunctionType::Count(count) => {
                self.write("count(");

                if count.distinct {
                    self.write("distinct ");
                }

                if count.exprs.is_empty() {
                    self.write("*");
                }

                self.visit_expressions(&count.exprs);
                self.write(")");
            }
            FunctionType::Sum(sum) => {
                self.surround_with("sum(", ")", |s| s.visit_expression(&sum.expr));
            }
            FunctionType::Minimum(min) => {
                self.surround_with("min(", ")", |s| s.visit_expression(&min.expr));
            }
            FunctionType::Maximum(max) => {
                self.surround_with("max(", ")", |s| s.visit_expression(&max.expr));
            }
            FunctionType::Cast(cast) => {
                self.write("cast(");
                self.visit_expression(&cast.expr);
                self.write(" as ");

                match &cast.sql_type {
                    Some(sql_type) => self.write(sql_type),
                    None => self.write(cast.target.sql_name()),
                }

                self.write(")");
            }
        }
    }

    /// Comma separated expressions.
    fn visit_expressions(&mut self, expressions: &[Expression]) {
        let len = expressions.len();

        for (i, expression) in expressions.iter().enumerate() {
            self.visit_expression(expression);

            if i < (len - 1) {
                self.write(", ");
            }
        }
    }

    /// A chain of criteria. Every criterion but the first is prefixed by
    /// its combinator, `and` when it has none. Nested chains are rendered
    /// between parentheses and empty ones are skipped.
    fn visit_criteria(&mut self, criteria: &Criteria) {
        let mut first = true;

        for criterion in criteria.criteria.iter() {
            if let CriterionKind::Criteria(nested) = &criterion.kind {
                if !has_conditions(nested) {
                    continue;
                }
            }

            if !first {
                let combinator = criterion.combinator.unwrap_or(LogicalOperator::And);

                self.write(" ");
                self.write(combinator.keyword());
                self.write(" ");
            }

            self.visit_criterion(criterion);
            first = false;
        }
    }

    fn visit_criterion(&mut self, criterion: &Criterion) {
        match &criterion.kind {
            CriterionKind::Column { left, condition } => {
                self.visit_expression(left);
                self.write(" ");

                match condition {
                    Condition::Text(text) => self.write(text),
                    Condition::Operator(operator) => self.visit_operator(operator),
                }
            }
            CriterionKind::Raw(fragments) => {
                for fragment in fragments {
                    match fragment {
                        Fragment::Text(text) => self.write(text),
                        Fragment::Expression(expression) => self.visit_expression(expression),
                        Fragment::Operator(operator) => self.visit_operator(operator),
                        Fragment::Value(value) => self.visit_value(value),
                        Fragment::Criteria(criteria) => {
                            self.surround_with("(", ")", |s| s.visit_criteria(criteria))
                        }
                    }
                }
            }
            CriterionKind::Criteria(criteria) => {
                self.surround_with("(", ")", |s| s.visit_criteria(criteria))
            }
        }
    }

    /// The right side of a criterion, e.g. `= ?` or `is not null`.
    ///
    /// A `null` value turns any comparison into a null check. Negating a
    /// comparison picks the complementary comparison.
    fn visit_operator(&mut self, operator: &Operator) {
        let not = operator.not;

        match &operator.kind {
            OperatorKind::IsNull => self.visit_null_check(not),
            OperatorKind::Equals(value) if value.is_null() => self.visit_null_check(not),
            OperatorKind::Equals(value) => {
                self.write(if not { "<> " } else { "= " });
                self.visit_operand(value);
            }
            OperatorKind::Greater { value, .. } | OperatorKind::Lower { value, .. }
                if value.is_null() =>
            {
                self.visit_null_check(not)
            }
            OperatorKind::Greater { value, or_equals } => {
                self.visit_comparison(true, *or_equals, not, value)
            }
            OperatorKind::Lower { value, or_equals } => {
                self.visit_comparison(false, *or_equals, not, value)
            }
            OperatorKind::Between { lower, upper } => match (lower.is_null(), upper.is_null()) {
                (true, true) => self.visit_null_check(not),
                (false, true) => self.visit_comparison(true, false, not, lower),
                (true, false) => self.visit_comparison(false, false, not, upper),
                (false, false) => {
                    self.write(if not { "not between " } else { "between " });
                    self.visit_operand(lower);
                    self.write(" and ");
                    self.visit_operand(upper);
                }
            },
            OperatorKind::In(InValues::Iterable(None)) => self.visit_null_check(not),
            OperatorKind::In(InValues::Iterable(Some(values)) | InValues::Values(values)) => {
                self.write(if not { "not in (" } else { "in (" });

                let len = values.len();

                for (i, value) in values.iter().enumerate() {
                    if value.is_null() {
                        self.write("null");
                    } else {
                        self.visit_operand(value);
                    }

                    if i < (len - 1) {
                        self.write(", ");
                    }
                }

                self.write(")");
            }
            OperatorKind::In(InValues::Named(name)) => {
                self.write(if not { "not in (" } else { "in (" });
                self.visit_named(name, true);
                self.write(")");
            }
            OperatorKind::Like { value, .. } if value.is_null() => self.visit_null_check(not),
            OperatorKind::Like {
                value,
                leading_wildcard,
                trailing_wildcard,
            } => {
                self.write(if not { "not like " } else { "like " });

                match value {
                    Operand::Value(Value::String(pattern)) => {
                        let mut wrapped = String::with_capacity(pattern.len() + 2);

                        if *leading_wildcard {
                            wrapped.push('%');
                        }

                        wrapped.push_str(pattern);

                        if *trailing_wildcard {
                            wrapped.push('%');
                        }

                        self.visit_value(&Value::String(wrapped));
                    }
                    other => self.visit_operand(other),
                }
            }
        }
    }

    fn visit_null_check(&mut self, not: bool) {
        self.write(if not { "is not null" } else { "is null" });
    }

    /// `>`, `>=`, `<` or `<=`, negation picking the complement.
    fn visit_comparison(&mut self, greater: bool, or_equals: bool, not: bool, value: &Operand) {
        let symbol = match (greater != not, or_equals != not) {
            (true, false) => "> ",
            (true, true) => ">= ",
            (false, false) => "< ",
            (false, true) => "<= ",
        };

        self.write(symbol);
        self.visit_operand(value);
    }

    fn visit_operand(&mut self, operand: &Operand) {
        match operand {
            Operand::Value(value) => self.visit_value(value),
            Operand::Named(name) => self.visit_named(name, false),
            Operand::Expression(expression) => self.visit_expression(expression),
        }
    }

    fn visit_grouping(&mut self, grouping: &GroupBy) {
        self.visit_expressions(&grouping.0);
    }

    fn visit_ordering(&mut self, ordering: &OrderBy) {
        let len = ordering.0.len();

        for (i, (expression, order)) in ordering.0.iter().enumerate() {
            self.visit_expression(expression);

            if let Some(order) = order {
                self.write(" ");
                self.write(order.keyword());
            }

            if i < (len - 1) {
                self.write(", ");
            }
        }
    }

    /// ` limit <count> [offset <offset>]`, both values parameterized.
    fn visit_limit(&mut self, limit: &Limit) {
        self.write(" limit ");
        self.visit_value(&Value::from(limit.count));

        if let Some(offset) = limit.offset {
            self.write(" offset ");
            self.visit_value(&Value::from(offset));
        }
    }
}

/// Whether rendering the criteria writes anything.
fn has_conditions(criteria: &Criteria) -> bool {
    criteria.criteria.iter().any(|criterion| match &criterion.kind {
        CriterionKind::Criteria(nested) => has_conditions(nested),
        _ => true,
    })
}

/// How a pseudo table without an alias is referred to.
fn pseudo_table_name(definition: &TableDef, table: TableId) -> String {
    definition
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("t{}", table.index()))
}
