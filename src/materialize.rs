//! Folding tabular results into bean graphs.
//!
//! A [RowTransformer] turns the current row of a [ResultCursor] into a bean:
//! its [BeanFactory] creates the bean or finds it in the traversal's
//! identity cache, column consumers fill it, and relations assemble the
//! beans it refers to through [BeanRelationFixer]s. A
//! [WholeResultSetTransformer] runs it over every row and folds the root
//! beans with an [Accumulator](crate::accumulator::Accumulator).
mod bean;
mod context;
mod cursor;
mod factory;
mod fixer;
mod key;
mod result_set;
mod transformer;

pub use bean::{Bean, WeakBean};
pub use context::MaterializationContext;
pub use cursor::{InMemoryCursor, ResultCursor, Row};
pub use factory::BeanFactory;
pub use fixer::{BeanCollection, BeanRelationFixer};
pub use key::BeanKey;
pub use result_set::WholeResultSetTransformer;
pub use transformer::{AssemblerId, AssemblyPolicy, RowTransformer};
