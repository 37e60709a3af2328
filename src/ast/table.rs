use super::{ColumnDef, Statement};

/// Identity of a table-like entity in a [Catalog](super::Catalog).
///
/// Alias and join maps are keyed by this id rather than by table name, so
/// that a table cloned for a self-join keeps its own alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub(crate) usize);

impl TableId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Either a physical table or a statement exposed as a table.
pub enum TableKind {
    Physical,
    /// A query or union wrapped as a table, rendered inline between parentheses.
    Pseudo(Box<Statement>),
}

/// A table definition
#[derive(Clone, Debug, PartialEq)]
pub struct TableDef {
    pub(crate) name: Option<String>,
    pub(crate) schema: Option<String>,
    pub(crate) columns: Vec<ColumnDef>,
    pub(crate) kind: TableKind,
}

impl TableDef {
    pub(crate) fn physical(schema: Option<String>, name: String) -> Self {
        TableDef {
            name: Some(name),
            schema,
            columns: Vec::new(),
            kind: TableKind::Physical,
        }
    }

    /// The simple name, absent for anonymous derived tables.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The name prefixed by its schema, if any.
    pub fn qualified_name(&self) -> Option<String> {
        match (&self.schema, &self.name) {
            (Some(schema), Some(name)) => Some(format!("{schema}.{name}")),
            (None, Some(name)) => Some(name.clone()),
            (_, None) => None,
        }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn kind(&self) -> &TableKind {
        &self.kind
    }

    /// The wrapped statement of a pseudo table.
    pub fn statement(&self) -> Option<&Statement> {
        match &self.kind {
            TableKind::Pseudo(statement) => Some(statement),
            TableKind::Physical => None,
        }
    }

    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }
}
