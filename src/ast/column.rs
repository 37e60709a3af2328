use super::{Expression, TableId};

/// The declared type of the values a column (or any selectable) yields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Integer,
    BigInt,
    Double,
    Decimal,
    Text,
    Date,
    Timestamp,
    Bytes,
    Json,
    /// A type known only by its SQL name.
    Other(String),
}

impl ValueType {
    /// A dialect-neutral SQL name, used when casting.
    pub fn sql_name(&self) -> &str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::BigInt => "bigint",
            ValueType::Double => "double precision",
            ValueType::Decimal => "decimal",
            ValueType::Text => "varchar",
            ValueType::Date => "date",
            ValueType::Timestamp => "timestamp",
            ValueType::Bytes => "blob",
            ValueType::Json => "json",
            ValueType::Other(name) => name,
        }
    }
}

/// Identity of a column: the table it belongs to and its position in it.
///
/// Two tables cloned from the same definition own distinct column ids,
/// even though their columns share names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId {
    pub(crate) table_id: TableId,
    pub(crate) column_index: usize,
}

impl ColumnId {
    pub(crate) fn new(table_id: TableId, column_index: usize) -> ColumnId {
        ColumnId {
            table_id,
            column_index,
        }
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }
}

/// A column definition as registered in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    /// For pseudo columns of a wrapped query, the projected expression they stand for.
    pub(crate) source: Option<Expression>,
}

impl ColumnDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn source(&self) -> Option<&Expression> {
        self.source.as_ref()
    }
}
