use crate::ast::ValueType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Union column {name} is already declared as {existing:?}, cannot redeclare it as {declared:?}")]
    UnionColumnConflict {
        name: String,
        existing: ValueType,
        declared: ValueType,
    },

    #[error("No join named {0} was registered")]
    UnknownJoin(String),

    #[error("A join named {0} is already registered")]
    DuplicateJoin(String),

    #[error("Parameter {0} is expandable and needs a value to know how many placeholders to render")]
    MissingExpansionSize(String),

    #[error("No value was bound to parameter {0}")]
    UnboundParameter(String),

    #[error("Expected at most one result but found several")]
    NonUniqueResult,

    #[error("Column {0} is not part of the result")]
    ColumnNotFound(String),

    #[error("Column index {0} is out of the result bounds")]
    ColumnIndexOutOfBounds(usize),

    #[error("Cannot convert the value of column {column}: {source}")]
    ColumnConversion {
        column: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cursor: {0}")]
    Cursor(#[from] anyhow::Error),
}
