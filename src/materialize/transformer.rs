use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Bean, BeanFactory, BeanKey, BeanRelationFixer, MaterializationContext, Row};
use crate::{Error, Result};

static NEXT_ASSEMBLER: AtomicU64 = AtomicU64::new(0);

/// Identity of a registered relation, unique for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssemblerId(u64);

impl AssemblerId {
    pub(crate) fn next() -> Self {
        AssemblerId(NEXT_ASSEMBLER.fetch_add(1, Ordering::Relaxed))
    }
}

/// When a relation wires its related bean into the owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssemblyPolicy {
    /// On every row carrying a related bean. Collections grow row by row.
    #[default]
    OnEachRow,
    /// At most once per owner bean during a traversal.
    OncePerBean,
}

type ColumnConsumer<T> = Rc<dyn Fn(&mut T, Value) -> Result<()>>;

struct ColumnMapping<T> {
    label: String,
    consume: ColumnConsumer<T>,
}

impl<T> Clone for ColumnMapping<T> {
    fn clone(&self) -> Self {
        ColumnMapping {
            label: self.label.clone(),
            consume: Rc::clone(&self.consume),
        }
    }
}

/// A relation of an owner of type `T`, whatever the related type.
trait RelationAssembler<T> {
    fn assemble(
        &self,
        owner: &Bean<T>,
        row: &dyn Row,
        ctx: &mut MaterializationContext,
    ) -> Result<()>;

    fn with_aliases(&self, aliases: &HashMap<String, String>) -> Rc<dyn RelationAssembler<T>>;
}

struct Relation<T, R> {
    id: AssemblerId,
    transformer: RowTransformer<R>,
    fixer: BeanRelationFixer<T, R>,
    policy: AssemblyPolicy,
}

impl<T: 'static, R: 'static> RelationAssembler<T> for Relation<T, R> {
    fn assemble(
        &self,
        owner: &Bean<T>,
        row: &dyn Row,
        ctx: &mut MaterializationContext,
    ) -> Result<()> {
        let Some(related) = self.transformer.transform(row, ctx)? else {
            return Ok(());
        };

        let apply = match self.policy {
            AssemblyPolicy::OnEachRow => true,
            AssemblyPolicy::OncePerBean => ctx.mark_treated(owner, self.id),
        };

        if apply {
            self.fixer.fix(owner, &related);
        }

        Ok(())
    }

    fn with_aliases(&self, aliases: &HashMap<String, String>) -> Rc<dyn RelationAssembler<T>> {
        Rc::new(Relation {
            id: AssemblerId::next(),
            transformer: self.transformer.copy_with_aliases(aliases),
            fixer: self.fixer.clone(),
            policy: self.policy,
        })
    }
}

/// Turns the current row into a bean of type `T`.
///
/// The factory provides the bean, column consumers fill it and every
/// relation transforms the same row into a related bean wired in by its
/// fixer. Relations nest, so one transformer describes a whole graph.
///
/// ```rust
/// # use sqlweave::materialize::*;
/// # use sqlweave::accumulator::to_list;
/// #[derive(Default)]
/// struct Author { id: i64, name: String, books: Vec<Bean<Book>> }
///
/// #[derive(Default)]
/// struct Book { title: String }
///
/// let books = RowTransformer::new(BeanFactory::keyed(["book_id"], |_| Book::default()))
///     .add_typed_column("title", |book: &mut Book, title: Option<String>| {
///         book.title = title.unwrap_or_default();
///     });
///
/// let authors = RowTransformer::new(BeanFactory::keyed(["id"], |key| Author {
///     id: key.single().and_then(|id| id.as_i64()).unwrap_or_default(),
///     ..Default::default()
/// }))
/// .add_typed_column("name", |author: &mut Author, name: Option<String>| {
///     author.name = name.unwrap_or_default();
/// })
/// .add_relation(
///     books,
///     BeanRelationFixer::of_many(|author: &mut Author| &mut author.books),
///     AssemblyPolicy::OnEachRow,
/// );
///
/// let mut cursor = InMemoryCursor::new(["id", "name", "book_id", "title"])
///     .with_row([1.into(), "Herbert".into(), 10.into(), "Dune".into()])
///     .with_row([1.into(), "Herbert".into(), 11.into(), "Dune Messiah".into()]);
///
/// let authors = WholeResultSetTransformer::new(authors)
///     .transform_all(&mut cursor, &to_list())
///     .unwrap();
///
/// assert_eq!(1, authors.len());
/// assert_eq!(1, authors[0].borrow().id);
/// assert_eq!(2, authors[0].borrow().books.len());
/// ```
pub struct RowTransformer<T> {
    factory: BeanFactory<T>,
    columns: Vec<ColumnMapping<T>>,
    relations: Vec<Rc<dyn RelationAssembler<T>>>,
}

impl<T: 'static> RowTransformer<T> {
    pub fn new(factory: BeanFactory<T>) -> Self {
        RowTransformer {
            factory,
            columns: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn factory(&self) -> &BeanFactory<T> {
        &self.factory
    }

    /// Column labels the transformer reads, key columns excluded.
    pub fn column_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|column| column.label.as_str())
    }

    /// Fills the bean from a column. The consumer also receives `null`.
    pub fn add_column<F>(mut self, label: impl Into<String>, consume: F) -> Self
    where
        F: Fn(&mut T, Value) + 'static,
    {
        self.columns.push(ColumnMapping {
            label: label.into(),
            consume: Rc::new(move |bean: &mut T, value: Value| {
                consume(bean, value);
                Ok(())
            }),
        });

        self
    }

    /// Fills the bean from a column read as `V`, `None` standing for `null`.
    pub fn add_typed_column<V, F>(mut self, label: impl Into<String>, consume: F) -> Self
    where
        V: DeserializeOwned,
        F: Fn(&mut T, Option<V>) + 'static,
    {
        let label = label.into();
        let column = label.clone();

        self.columns.push(ColumnMapping {
            label,
            consume: Rc::new(move |bean: &mut T, value: Value| -> Result<()> {
                let value = match value {
                    Value::Null => None,
                    value => Some(serde_json::from_value(value).map_err(|source| {
                        Error::ColumnConversion {
                            column: column.clone(),
                            source,
                        }
                    })?),
                };

                consume(bean, value);
                Ok(())
            }),
        });

        self
    }

    /// Assembles a related bean from the same row.
    pub fn add_relation<R: 'static>(
        mut self,
        transformer: RowTransformer<R>,
        fixer: BeanRelationFixer<T, R>,
        policy: AssemblyPolicy,
    ) -> Self {
        self.relations.push(Rc::new(Relation {
            id: AssemblerId::next(),
            transformer,
            fixer,
            policy,
        }));

        self
    }

    /// The bean of the current row, or `None` when its key is `null`.
    pub fn transform(
        &self,
        row: &dyn Row,
        ctx: &mut MaterializationContext,
    ) -> Result<Option<Bean<T>>> {
        let Some((bean, _)) = self.factory.produce(row, ctx)? else {
            return Ok(None);
        };

        {
            let mut target = bean.borrow_mut();

            for column in &self.columns {
                (column.consume)(&mut target, row.get(&column.label)?)?;
            }
        }

        for relation in &self.relations {
            relation.assemble(&bean, row, ctx)?;
        }

        Ok(Some(bean))
    }

    /// The same transformer reading renamed columns, relations included.
    /// Labels missing from `aliases` are kept.
    pub fn copy_with_aliases(&self, aliases: &HashMap<String, String>) -> Self {
        RowTransformer {
            factory: self.factory.with_aliases(aliases),
            columns: self
                .columns
                .iter()
                .map(|column| ColumnMapping {
                    label: aliases
                        .get(&column.label)
                        .unwrap_or(&column.label)
                        .clone(),
                    consume: Rc::clone(&column.consume),
                })
                .collect(),
            relations: self
                .relations
                .iter()
                .map(|relation| relation.with_aliases(aliases))
                .collect(),
        }
    }

    /// The same key and column mapping producing beans of type `U`, which
    /// embeds a `T` reachable through `upcast`.
    ///
    /// Relations are not carried: their fixers wire beans of type `T`.
    pub fn copy_for<U, F>(&self, construct: F, upcast: fn(&mut U) -> &mut T) -> RowTransformer<U>
    where
        U: 'static,
        F: Fn(&BeanKey) -> U + 'static,
    {
        RowTransformer {
            factory: self.factory.substitute(construct),
            columns: self
                .columns
                .iter()
                .map(|column| {
                    let consume = Rc::clone(&column.consume);

                    ColumnMapping {
                        label: column.label.clone(),
                        consume: Rc::new(move |bean: &mut U, value: Value| consume(upcast(bean), value))
                            as ColumnConsumer<U>,
                    }
                })
                .collect(),
            relations: Vec::new(),
        }
    }
}

impl<T> Clone for RowTransformer<T> {
    fn clone(&self) -> Self {
        RowTransformer {
            factory: self.factory.clone(),
            columns: self.columns.clone(),
            relations: self.relations.clone(),
        }
    }
}

impl<T> fmt::Debug for RowTransformer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowTransformer")
            .field("factory", &self.factory)
            .field(
                "columns",
                &self
                    .columns
                    .iter()
                    .map(|column| column.label.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("relations", &self.relations.len())
            .finish()
    }
}
