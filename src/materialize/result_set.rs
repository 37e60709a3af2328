use tracing::{debug, instrument};

use super::{Bean, MaterializationContext, ResultCursor, RowTransformer};
use crate::accumulator::{to_list, unique_non_null, Accumulator};
use crate::Result;

/// Materializes a whole result with a root [RowTransformer].
///
/// Each traversal owns its identity cache: beans of two traversals are
/// never shared. Every root bean reaches the accumulator once, on the first
/// row reading it as a root, even if an earlier row already built it as a
/// related bean. Later rows with the same key only complete it.
#[derive(Debug)]
pub struct WholeResultSetTransformer<T> {
    root: RowTransformer<T>,
}

impl<T: 'static> WholeResultSetTransformer<T> {
    pub fn new(root: RowTransformer<T>) -> Self {
        WholeResultSetTransformer { root }
    }

    pub fn root(&self) -> &RowTransformer<T> {
        &self.root
    }

    /// Reads the cursor to its end, folding the root beans with `accumulator`.
    #[instrument(skip(self, cursor, accumulator))]
    pub fn transform_all<C, A>(&self, cursor: &mut C, accumulator: &A) -> Result<A::Output>
    where
        C: ResultCursor,
        A: Accumulator<Bean<T>>,
    {
        let mut ctx = MaterializationContext::new();
        let mut seed = accumulator.supply();
        let mut rows = 0_usize;
        let mut roots = 0_usize;

        while cursor.advance()? {
            rows += 1;

            if let Some(bean) = self.root.transform(&*cursor, &mut ctx)? {
                if ctx.mark_root(&bean) {
                    roots += 1;
                    accumulator.aggregate(&mut seed, bean)?;
                }
            }
        }

        debug!(
            rows,
            roots,
            cached_beans = ctx.cached_beans(),
            "result set materialized"
        );

        accumulator.finish(seed)
    }

    /// The root beans in order of first appearance.
    pub fn list<C: ResultCursor>(&self, cursor: &mut C) -> Result<Vec<Bean<T>>> {
        self.transform_all(cursor, &to_list())
    }

    /// The only root bean, failing with
    /// [NonUniqueResult](crate::Error::NonUniqueResult) if there are more.
    pub fn unique<C: ResultCursor>(&self, cursor: &mut C) -> Result<Option<Bean<T>>> {
        self.transform_all(cursor, &unique_non_null())
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;
    use serde_json::{json, Value};
    use test_log::test;

    use super::*;
    use crate::accumulator::{grouping_by, to_set};
    use crate::materialize::{
        AssemblyPolicy, BeanFactory, BeanKey, BeanRelationFixer, InMemoryCursor, WeakBean,
    };
    use crate::Error;

    #[derive(Debug, Default)]
    struct Order {
        id: i64,
        customer: String,
        lines: IndexSet<Bean<Line>>,
    }

    #[derive(Debug, Default)]
    struct Line {
        order: i64,
        number: i64,
        product: String,
        owner: WeakBean<Order>,
    }

    fn single_id(key: &BeanKey) -> i64 {
        key.single().and_then(Value::as_i64).unwrap_or_default()
    }

    fn orders() -> WholeResultSetTransformer<Order> {
        let lines = RowTransformer::new(BeanFactory::keyed(["line_order", "line_number"], |key| {
            Line {
                order: key.values()[0].as_i64().unwrap_or_default(),
                number: key.values()[1].as_i64().unwrap_or_default(),
                ..Default::default()
            }
        }))
        .add_typed_column("product", |line: &mut Line, product: Option<String>| {
            line.product = product.unwrap_or_default();
        });

        let orders = RowTransformer::new(BeanFactory::keyed(["id"], |key| Order {
            id: single_id(key),
            ..Default::default()
        }))
        .add_typed_column("customer", |order: &mut Order, customer: Option<String>| {
            order.customer = customer.unwrap_or_default();
        })
        .add_relation(
            lines,
            BeanRelationFixer::of_many(|order: &mut Order| &mut order.lines)
                .with_reverse(BeanRelationFixer::of_weak(|line: &mut Line| &mut line.owner)),
            AssemblyPolicy::OnEachRow,
        );

        WholeResultSetTransformer::new(orders)
    }

    fn cursor() -> InMemoryCursor {
        InMemoryCursor::new(["id", "customer", "line_order", "line_number", "product"])
            .with_row([json!(1), json!("ann"), json!(1), json!(1), json!("pen")])
            .with_row([json!(1), json!("ann"), json!(1), json!(2), json!("ink")])
            .with_row([json!(1), json!("ann"), json!(1), json!(3), json!("pad")])
            .with_row([json!(2), json!("bob"), json!(null), json!(null), json!(null)])
            .with_row([json!(3), json!("ann"), json!(3), json!(1), json!("pen")])
    }

    #[test]
    fn repeated_root_rows_converge_on_one_bean() {
        let orders = orders().list(&mut cursor()).unwrap();

        assert_eq!(
            vec![1, 2, 3],
            orders.iter().map(|order| order.borrow().id).collect::<Vec<_>>()
        );

        let first = orders[0].borrow();
        assert_eq!("ann", first.customer);
        assert_eq!(
            vec![
                (1, 1, String::from("pen")),
                (1, 2, String::from("ink")),
                (1, 3, String::from("pad")),
            ],
            first
                .lines
                .iter()
                .map(|line| {
                    let line = line.borrow();
                    (line.order, line.number, line.product.clone())
                })
                .collect::<Vec<_>>()
        );

        for line in &first.lines {
            assert_eq!(Some(orders[0].clone()), line.borrow().owner.upgrade());
        }

        assert!(orders[1].borrow().lines.is_empty());
    }

    #[test]
    fn composite_keys_are_distinct_per_order() {
        let orders = orders().list(&mut cursor()).unwrap();

        let first_line = orders[0].borrow().lines[0].clone();
        let other_first_line = orders[2].borrow().lines[0].clone();

        assert_ne!(first_line, other_first_line);
        assert_eq!(1, other_first_line.borrow().number);
        assert_eq!(3, other_first_line.borrow().order);
    }

    #[test]
    fn accumulators_shape_the_result() {
        let set = orders().transform_all(&mut cursor(), &to_set()).unwrap();
        assert_eq!(3, set.len());

        let by_customer = orders()
            .transform_all(
                &mut cursor(),
                &grouping_by(|order: &Bean<Order>| order.borrow().customer.clone()),
            )
            .unwrap();

        assert_eq!(2, by_customer["ann"].len());
        assert_eq!(1, by_customer["bob"].len());
    }

    #[test]
    fn unique_fails_on_a_second_root() {
        let error = orders().unique(&mut cursor()).unwrap_err();
        assert!(matches!(error, Error::NonUniqueResult));

        let mut single =
            InMemoryCursor::new(["id", "customer", "line_order", "line_number", "product"])
                .with_row([json!(9), json!("cid"), json!(9), json!(1), json!("pen")])
                .with_row([json!(9), json!("cid"), json!(9), json!(2), json!("ink")]);

        let order = orders().unique(&mut single).unwrap().unwrap();
        assert_eq!(2, order.borrow().lines.len());

        let mut empty = InMemoryCursor::new(["id"]);
        assert!(orders().unique(&mut empty).unwrap().is_none());
    }

    #[test]
    fn traversals_do_not_share_beans() {
        let transformer = orders();

        let first = transformer.list(&mut cursor()).unwrap();
        let second = transformer.list(&mut cursor()).unwrap();

        assert_ne!(first[0], second[0]);
        assert_eq!(3, second[0].borrow().lines.len());
    }

    #[test]
    fn flat_rows_produce_one_bean_each() {
        let flat = WholeResultSetTransformer::new(
            RowTransformer::new(BeanFactory::no_identifier(String::new)).add_column(
                "word",
                |word: &mut String, value| {
                    word.push_str(value.as_str().unwrap_or_default());
                },
            ),
        );

        let mut cursor = InMemoryCursor::new(["word"])
            .with_row([json!("a")])
            .with_row([json!("a")])
            .with_row([json!(null)]);

        let words = flat.list(&mut cursor).unwrap();

        assert_eq!(
            vec!["a", "a", ""],
            words.iter().map(|word| word.borrow().clone()).collect::<Vec<_>>()
        );
    }

    #[derive(Debug, Default)]
    struct Person {
        id: i64,
        friends: Vec<Bean<Person>>,
    }

    #[test]
    fn root_first_built_as_a_related_bean_is_still_a_root() {
        let friends = RowTransformer::new(BeanFactory::keyed(["friend_id"], |key| Person {
            id: single_id(key),
            ..Default::default()
        }));

        let people = WholeResultSetTransformer::new(
            RowTransformer::new(BeanFactory::keyed(["id"], |key| Person {
                id: single_id(key),
                ..Default::default()
            }))
            .add_relation(
                friends,
                BeanRelationFixer::of_many(|person: &mut Person| &mut person.friends),
                AssemblyPolicy::OnEachRow,
            ),
        );

        let mut cursor = InMemoryCursor::new(["id", "friend_id"])
            .with_row([json!(1), json!(2)])
            .with_row([json!(2), json!(null)])
            .with_row([json!(1), json!(2)]);

        let people = people.list(&mut cursor).unwrap();

        assert_eq!(
            vec![1, 2],
            people.iter().map(|person| person.borrow().id).collect::<Vec<_>>()
        );
        assert_eq!(vec![people[1].clone()], people[0].borrow().friends);
    }
}
