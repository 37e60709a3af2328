//! A persistence toolkit core.
//!
//! The [ast] module models `SELECT` and `UNION` statements over tables and
//! columns registered in a [Catalog](ast::Catalog). The [renderer] module
//! turns them into SQL text, either with literal values ([Inline](renderer::Inline))
//! or with placeholders and a binding map ([Prepared](renderer::Prepared)),
//! through the scoped buffer of the [appender] module.
//!
//! The other way around, the [materialize] module folds a tabular result
//! cursor into a graph of beans with the help of an [accumulator], so that
//! duplicated joined rows converge onto the same instances.
//!
//! ```rust
//! # use sqlweave::{ast::*, renderer::{Prepared, Renderer}};
//! # fn main() -> sqlweave::Result<()> {
//! let mut catalog = Catalog::default();
//! let toto = catalog.add_table("Toto");
//! let a = catalog.add_column(toto, "a", ValueType::Integer);
//! let b = catalog.add_column(toto, "b", ValueType::Integer);
//!
//! let query = Query::select([a, b])
//!     .from_aliased(toto, "t")
//!     .where_(b.equals(1))
//!     .and(a.in_values([1, 2, 3]))
//!     .limit(2);
//!
//! let prepared = Prepared::build(&catalog, &query.into()).finalize()?;
//!
//! assert_eq!(
//!     "select t.a, t.b from Toto as t where t.b = ? and t.a in (?, ?, ?) limit ?",
//!     prepared.sql()
//! );
//! assert_eq!(5, prepared.values().len());
//! # Ok(())
//! # }
//! ```
pub mod accumulator;
pub mod appender;
pub mod ast;
mod error;
pub mod materialize;
pub mod renderer;

pub use error::{Error, Result};
