use std::collections::HashMap;

use super::{ColumnId, Join, JoinDirection, TableId};

/// The `from` clause: a root table followed by joins, and the aliases of
/// the tables involved.
///
/// Aliases are keyed by table identity, so two clones of the same table
/// keep distinct aliases even though they share a name.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FromClause {
    pub(crate) root: Option<TableId>,
    pub(crate) joins: Vec<Join>,
    pub(crate) aliases: HashMap<TableId, String>,
}

impl FromClause {
    pub fn new(root: TableId) -> Self {
        FromClause {
            root: Some(root),
            ..Default::default()
        }
    }

    pub fn root(&self) -> Option<TableId> {
        self.root
    }

    pub fn set_root(&mut self, root: TableId) -> &mut Self {
        self.root = Some(root);
        self
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn add_join(&mut self, join: Join) -> &mut Self {
        self.joins.push(join);
        self
    }

    pub fn inner_join(&mut self, left: ColumnId, right: ColumnId) -> &mut Self {
        self.column_join(JoinDirection::Inner, left, right)
    }

    pub fn left_outer_join(&mut self, left: ColumnId, right: ColumnId) -> &mut Self {
        self.column_join(JoinDirection::LeftOuter, left, right)
    }

    pub fn right_outer_join(&mut self, left: ColumnId, right: ColumnId) -> &mut Self {
        self.column_join(JoinDirection::RightOuter, left, right)
    }

    pub fn column_join(
        &mut self,
        direction: JoinDirection,
        left: ColumnId,
        right: ColumnId,
    ) -> &mut Self {
        self.add_join(Join::Column {
            direction,
            left,
            right,
        })
    }

    /// Joins on composite keys, `left` and `right` are paired by position.
    pub fn key_join(
        &mut self,
        direction: JoinDirection,
        left: Vec<ColumnId>,
        right: Vec<ColumnId>,
    ) -> &mut Self {
        self.add_join(Join::Key {
            direction,
            left,
            right,
        })
    }

    pub fn raw_join(
        &mut self,
        direction: JoinDirection,
        right: TableId,
        on: impl Into<String>,
    ) -> &mut Self {
        self.add_join(Join::Raw {
            direction,
            right,
            on: on.into(),
        })
    }

    pub fn cross_join(&mut self, right: TableId) -> &mut Self {
        self.add_join(Join::Cross { right })
    }

    pub fn set_alias(&mut self, table: TableId, alias: impl Into<String>) -> &mut Self {
        self.aliases.insert(table, alias.into());
        self
    }

    pub fn alias_of(&self, table: TableId) -> Option<&str> {
        self.aliases.get(&table).map(String::as_str)
    }

    pub fn aliases(&self) -> &HashMap<TableId, String> {
        &self.aliases
    }

    /// Every table of the clause, with its alias if it has one.
    pub fn naming_scope(&self) -> HashMap<TableId, Option<String>> {
        let mut scope: HashMap<_, _> = self
            .aliases
            .iter()
            .map(|(table, alias)| (*table, Some(alias.clone())))
            .collect();

        for table in self.tables() {
            scope.entry(table).or_insert(None);
        }

        scope
    }

    /// The root table followed by the right table of every join.
    pub fn tables(&self) -> Vec<TableId> {
        self.root
            .into_iter()
            .chain(self.joins.iter().filter_map(Join::right_table))
            .collect()
    }
}
