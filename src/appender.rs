//! A SQL text buffer interleaving literal text and value placeholders.
//!
//! The appender is filled by a renderer and finalized into a
//! [PreparedSql]: the SQL text with positional placeholders and the values
//! bound to each position. Aliases used to name tables are resolved
//! through a stack of scopes, so that a nested statement can name its
//! tables differently from its parent while writing into the same buffer.
mod parameterized;

use std::collections::HashMap;
use std::fmt::{self, Write};

use serde_json::Value;

use crate::ast::{Catalog, TableId};

pub use parameterized::{ParamName, ParameterStyle, ParameterizedSql, PreparedSql};

/// The buffer a renderer writes into.
#[derive(Debug)]
pub struct SqlAppender<'a> {
    catalog: &'a Catalog,
    scopes: Vec<HashMap<TableId, Option<String>>>,
    sql: ParameterizedSql,
}

impl<'a> SqlAppender<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        SqlAppender {
            catalog,
            scopes: Vec::new(),
            sql: ParameterizedSql::default(),
        }
    }

    /// The catalog tables and columns are resolved against.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn write<D: fmt::Display>(&mut self, s: D) {
        let mut text = String::new();
        write!(&mut text, "{s}")
            .expect("we ran out of memory or something else why write failed");

        self.sql.push_text(&text);
    }

    /// Appends a placeholder for an anonymous value. Each call binds a new
    /// parameter.
    pub fn push_value(&mut self, value: Value) -> ParamName {
        self.sql.push_value(value)
    }

    /// Appends a placeholder for the parameter `name`. All placeholders of a
    /// name are bound to the same value. An expandable placeholder is
    /// replaced by as many placeholders as its value has items.
    pub fn push_named(&mut self, name: &str, expandable: bool) -> ParamName {
        self.sql.push_named(name, expandable)
    }

    /// Opens a naming scope: the tables a statement names, with their
    /// alias if they have one. Tables of the scope shadow the ones of
    /// enclosing scopes until it is closed.
    pub fn open_scope(&mut self, tables: HashMap<TableId, Option<String>>) {
        self.scopes.push(tables);
    }

    pub fn close_scope(&mut self) {
        self.scopes.pop();
    }

    /// Runs `f` within a new naming scope.
    pub fn scoped<F, R>(&mut self, tables: HashMap<TableId, Option<String>>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.open_scope(tables);
        let result = f(self);
        self.close_scope();

        result
    }

    /// The alias of a table in the innermost scope naming it.
    pub fn alias_of(&self, table: TableId) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&table))
            .and_then(Option::as_deref)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The text written so far, placeholders shown by name.
    pub fn template(&self) -> String {
        self.sql.template()
    }

    pub fn into_parameterized(self) -> ParameterizedSql {
        self.sql
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::ast::{Catalog, ValueType};

    #[test]
    fn inner_scope_shadows_and_restores_aliases() {
        let mut catalog = Catalog::default();
        let toto = catalog.add_table("Toto");
        catalog.add_column(toto, "a", ValueType::Integer);

        let mut appender = SqlAppender::new(&catalog);
        appender.open_scope(HashMap::from([(toto, Some(String::from("outer")))]));

        let inner = appender.scoped(
            HashMap::from([(toto, Some(String::from("inner")))]),
            |appender| appender.alias_of(toto).map(str::to_string),
        );
        let unaliased = appender.scoped(HashMap::from([(toto, None)]), |appender| {
            appender.alias_of(toto).map(str::to_string)
        });

        assert_eq!(Some("inner".to_string()), inner);
        assert_eq!(None, unaliased);
        assert_eq!(Some("outer"), appender.alias_of(toto));

        appender.close_scope();
        assert_eq!(None, appender.alias_of(toto));
    }

    #[test]
    fn scopes_never_reorder_text_and_values() {
        let catalog = Catalog::default();
        let mut appender = SqlAppender::new(&catalog);

        appender.write("a = ");
        appender.push_value(json!(1));
        appender.scoped(HashMap::new(), |appender| {
            appender.write(" and b = ");
            appender.push_value(json!(2));
        });
        appender.write(" and c = ");
        appender.push_value(json!(3));

        let prepared = appender.into_parameterized().finalize().unwrap();

        assert_eq!("a = ? and b = ? and c = ?", prepared.sql());
        assert_eq!(
            vec![json!(1), json!(2), json!(3)],
            prepared.values().values().cloned().collect::<Vec<_>>()
        );
    }
}
