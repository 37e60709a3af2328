use std::fmt::{Debug, Formatter};

use super::{ColumnDef, ColumnId, Expression, Statement, TableDef, TableId, TableKind, ValueType};

/// The arena of tables and columns statements refer to.
///
/// The mapping layer registers its tables here and hands the returned ids
/// to the query model. Every registration yields a new identity: registering
/// or cloning a table under an existing name never merges it with the first.
#[derive(Default, Clone)]
pub struct Catalog {
    tables: Vec<TableDef>,
}

impl Catalog {
    /// Registers a physical table.
    ///
    /// ```rust
    /// # use sqlweave::ast::*;
    /// let mut catalog = Catalog::default();
    /// let toto = catalog.add_table("Toto");
    /// let id = catalog.add_column(toto, "id", ValueType::BigInt);
    ///
    /// assert_eq!(Some(id), catalog.column(toto, "id"));
    /// assert_eq!("Toto", catalog.table(toto).name().unwrap());
    /// ```
    pub fn add_table(&mut self, name: impl Into<String>) -> TableId {
        self.insert(TableDef::physical(None, name.into()))
    }

    /// Registers a physical table living in the given schema.
    pub fn add_table_in(&mut self, schema: impl Into<String>, name: impl Into<String>) -> TableId {
        self.insert(TableDef::physical(Some(schema.into()), name.into()))
    }

    pub fn add_column(
        &mut self,
        table_id: TableId,
        name: impl Into<String>,
        value_type: ValueType,
    ) -> ColumnId {
        let table = &mut self.tables[table_id.0];
        table.columns.push(ColumnDef {
            name: name.into(),
            value_type,
            source: None,
        });

        ColumnId::new(table_id, table.columns.len() - 1)
    }

    /// Registers a copy of a table under a new identity, with the same name
    /// and the same columns (at the same positions).
    ///
    /// ```rust
    /// # use sqlweave::ast::*;
    /// let mut catalog = Catalog::default();
    /// let toto = catalog.add_table("Toto");
    /// let id = catalog.add_column(toto, "id", ValueType::BigInt);
    /// let other_toto = catalog.clone_table(toto);
    ///
    /// assert_ne!(toto, other_toto);
    /// assert_ne!(Some(id), catalog.column(other_toto, "id"));
    /// assert_eq!(id.column_index(), catalog.column(other_toto, "id").unwrap().column_index());
    /// ```
    pub fn clone_table(&mut self, table_id: TableId) -> TableId {
        let copy = self.tables[table_id.0].clone();
        self.insert(copy)
    }

    /// Registers a statement as a table. Its columns are given by name,
    /// type and the expression each one stands for.
    pub(crate) fn add_pseudo_table(
        &mut self,
        statement: Statement,
        name: Option<String>,
        columns: Vec<(String, ValueType, Option<Expression>)>,
    ) -> TableId {
        let columns = columns
            .into_iter()
            .map(|(name, value_type, source)| ColumnDef {
                name,
                value_type,
                source,
            })
            .collect();

        self.insert(TableDef {
            name,
            schema: None,
            columns,
            kind: TableKind::Pseudo(Box::new(statement)),
        })
    }

    pub fn table(&self, table_id: TableId) -> &TableDef {
        &self.tables[table_id.0]
    }

    pub fn column_def(&self, column_id: ColumnId) -> &ColumnDef {
        &self.tables[column_id.table_id.0].columns[column_id.column_index]
    }

    /// Looks a column up by its name in the given table.
    pub fn column(&self, table_id: TableId, name: &str) -> Option<ColumnId> {
        self.tables[table_id.0]
            .column_index(name)
            .map(|column_index| ColumnId::new(table_id, column_index))
    }

    /// All column ids of a table, in declaration order.
    pub fn columns(&self, table_id: TableId) -> Vec<ColumnId> {
        (0..self.tables[table_id.0].columns.len())
            .map(|column_index| ColumnId::new(table_id, column_index))
            .collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = (TableId, &TableDef)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(index, table)| (TableId(index), table))
    }

    fn insert(&mut self, table: TableDef) -> TableId {
        self.tables.push(table);
        TableId(self.tables.len() - 1)
    }
}

impl Debug for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (id, table) in self.tables() {
            writeln!(
                f,
                "{}: {}",
                id.index(),
                table.qualified_name().unwrap_or_default()
            )?;
            for (column_index, column) in table.columns.iter().enumerate() {
                writeln!(f, "    {}: {:?}", column_index, column)?;
            }
        }

        Ok(())
    }
}
