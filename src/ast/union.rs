use indexmap::IndexMap;

use super::{Catalog, Query, Statement, TableId, ValueType};
use crate::{Error, Result};

/// Queries glued with `union all`.
///
/// The members are assumed column compatible. The columns the union
/// exposes once wrapped as a table are declared explicitly.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Union {
    pub(crate) queries: Vec<Query>,
    pub(crate) columns: IndexMap<String, ValueType>,
}

impl Union {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of<I>(queries: I) -> Self
    where
        I: IntoIterator<Item = Query>,
    {
        Union {
            queries: queries.into_iter().collect(),
            columns: IndexMap::new(),
        }
    }

    /// Appends a member query.
    pub fn union_all(mut self, query: impl Into<Query>) -> Self {
        self.queries.push(query.into());
        self
    }

    pub fn push(&mut self, query: impl Into<Query>) -> &mut Self {
        self.queries.push(query.into());
        self
    }

    /// Declares a column of the union. Declaring a name twice is allowed
    /// only with the same type.
    ///
    /// ```rust
    /// # use sqlweave::{ast::*, Error};
    /// let mut union = Union::new();
    /// union.register_column("id", ValueType::BigInt).unwrap();
    /// union.register_column("id", ValueType::BigInt).unwrap();
    ///
    /// assert!(matches!(
    ///     union.register_column("id", ValueType::Text),
    ///     Err(Error::UnionColumnConflict { .. })
    /// ));
    /// ```
    pub fn register_column(&mut self, name: impl Into<String>, value_type: ValueType) -> Result<()> {
        let name = name.into();

        match self.columns.get(&name) {
            Some(existing) if *existing != value_type => Err(Error::UnionColumnConflict {
                name,
                existing: existing.clone(),
                declared: value_type,
            }),
            Some(_) => Ok(()),
            None => {
                self.columns.insert(name, value_type);
                Ok(())
            }
        }
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ValueType)> {
        self.columns
            .iter()
            .map(|(name, value_type)| (name.as_str(), value_type))
    }

    /// Wraps the union as a table of the catalog exposing the declared columns.
    pub fn as_pseudo_table(self, catalog: &mut Catalog, name: Option<String>) -> TableId {
        let columns = self
            .columns
            .iter()
            .map(|(name, value_type)| (name.clone(), value_type.clone(), None))
            .collect();

        catalog.add_pseudo_table(Statement::from(self), name, columns)
    }
}
