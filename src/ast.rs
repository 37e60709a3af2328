//! An abstract syntax tree for SQL queries.
//!
//! The ast module handles everything related building abstract `select`
//! and `union` statements without going into database-level specifics.
//! Tables and columns are registered in a [Catalog] and referred to by id.
mod catalog;
mod column;
mod compare;
mod criteria;
mod expression;
mod fluent;
mod from;
mod function;
mod grouping;
mod join;
mod join_tree;
mod limit;
mod operator;
mod ordering;
mod query;
mod select;
mod statement;
mod table;
mod union;

pub use catalog::Catalog;
pub use column::{ColumnDef, ColumnId, ValueType};
pub use compare::Comparable;
pub use criteria::{Condition, Criteria, Criterion, CriterionKind, Fragment, LogicalOperator};
pub use expression::*;
pub use fluent::*;
pub use from::FromClause;
pub use function::*;
pub use grouping::GroupBy;
pub use join::{Join, JoinDirection};
pub use join_tree::{JoinNode, JoinTree};
pub use limit::Limit;
pub use operator::*;
pub use ordering::{IntoOrderDefinition, Order, OrderBy, OrderDefinition, Orderable};
pub use query::Query;
pub use select::Select;
pub use serde_json::{Map, Value};
pub use statement::Statement;
pub use table::{TableDef, TableId, TableKind};
pub use union::Union;
