//! Folds reducing a stream of items to a result container.
//!
//! An [Accumulator] supplies a fresh seed, absorbs items one at a time and
//! finishes the seed into its output. The same traversal can then produce
//! a list, a set, a map of groups or a single value depending on the
//! accumulator it is given.
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::{materialize::Bean, Error, Result};

/// A three step fold: supply a seed, aggregate every item into it, finish
/// the seed into the output.
pub trait Accumulator<T> {
    type Seed;
    type Output;

    /// A fresh, empty seed.
    fn supply(&self) -> Self::Seed;

    /// Absorbs one item.
    fn aggregate(&self, seed: &mut Self::Seed, item: T) -> Result<()>;

    fn finish(&self, seed: Self::Seed) -> Result<Self::Output>;

    /// Folds every item of `items`.
    ///
    /// ```rust
    /// # use sqlweave::accumulator::*;
    /// let evens = grouping_by(|n: &i32| n % 2 == 0).collect([1, 2, 3, 4]).unwrap();
    ///
    /// assert_eq!(vec![1, 3], evens[&false]);
    /// assert_eq!(vec![2, 4], evens[&true]);
    /// ```
    fn collect<I>(&self, items: I) -> Result<Self::Output>
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        let mut seed = self.supply();

        for item in items {
            self.aggregate(&mut seed, item)?;
        }

        self.finish(seed)
    }
}

/// Items that may stand for an absent value.
pub trait Nullable {
    fn is_null(&self) -> bool;
}

impl<T> Nullable for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl Nullable for Value {
    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}

impl<T> Nullable for Bean<T> {
    fn is_null(&self) -> bool {
        false
    }
}

/// All items, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToList;

pub fn to_list() -> ToList {
    ToList
}

impl<T> Accumulator<T> for ToList {
    type Seed = Vec<T>;
    type Output = Vec<T>;

    fn supply(&self) -> Vec<T> {
        Vec::new()
    }

    fn aggregate(&self, seed: &mut Vec<T>, item: T) -> Result<()> {
        seed.push(item);
        Ok(())
    }

    fn finish(&self, seed: Vec<T>) -> Result<Vec<T>> {
        Ok(seed)
    }
}

/// Distinct items.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToSet;

pub fn to_set() -> ToSet {
    ToSet
}

impl<T: Eq + Hash> Accumulator<T> for ToSet {
    type Seed = HashSet<T>;
    type Output = HashSet<T>;

    fn supply(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn aggregate(&self, seed: &mut HashSet<T>, item: T) -> Result<()> {
        seed.insert(item);
        Ok(())
    }

    fn finish(&self, seed: HashSet<T>) -> Result<HashSet<T>> {
        Ok(seed)
    }
}

/// Distinct items, in order of first appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToOrderedSet;

pub fn to_ordered_set() -> ToOrderedSet {
    ToOrderedSet
}

impl<T: Eq + Hash> Accumulator<T> for ToOrderedSet {
    type Seed = IndexSet<T>;
    type Output = IndexSet<T>;

    fn supply(&self) -> IndexSet<T> {
        IndexSet::new()
    }

    fn aggregate(&self, seed: &mut IndexSet<T>, item: T) -> Result<()> {
        seed.insert(item);
        Ok(())
    }

    fn finish(&self, seed: IndexSet<T>) -> Result<IndexSet<T>> {
        Ok(seed)
    }
}

/// Items grouped by a key, each group folded by a downstream accumulator.
/// Groups keep the order in which their key first appeared.
#[derive(Debug, Clone)]
pub struct GroupingBy<F, D, K> {
    key: F,
    downstream: D,
    group: PhantomData<fn() -> K>,
}

/// Groups items in lists.
pub fn grouping_by<T, K, F>(key: F) -> GroupingBy<F, ToList, K>
where
    F: Fn(&T) -> K,
{
    grouping_by_with(key, ToList)
}

pub fn grouping_by_with<T, K, F, D>(key: F, downstream: D) -> GroupingBy<F, D, K>
where
    F: Fn(&T) -> K,
    D: Accumulator<T>,
{
    GroupingBy {
        key,
        downstream,
        group: PhantomData,
    }
}

impl<T, K, F, D> Accumulator<T> for GroupingBy<F, D, K>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    D: Accumulator<T>,
{
    type Seed = IndexMap<K, D::Seed>;
    type Output = IndexMap<K, D::Output>;

    fn supply(&self) -> Self::Seed {
        IndexMap::new()
    }

    fn aggregate(&self, seed: &mut Self::Seed, item: T) -> Result<()> {
        let group = seed
            .entry((self.key)(&item))
            .or_insert_with(|| self.downstream.supply());

        self.downstream.aggregate(group, item)
    }

    fn finish(&self, seed: Self::Seed) -> Result<Self::Output> {
        seed.into_iter()
            .map(|(key, group)| Ok((key, self.downstream.finish(group)?)))
            .collect()
    }
}

/// The first item that is not null.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNonNull;

pub fn first_non_null() -> FirstNonNull {
    FirstNonNull
}

impl<T: Nullable> Accumulator<T> for FirstNonNull {
    type Seed = Option<T>;
    type Output = Option<T>;

    fn supply(&self) -> Option<T> {
        None
    }

    fn aggregate(&self, seed: &mut Option<T>, item: T) -> Result<()> {
        if seed.is_none() && !item.is_null() {
            *seed = Some(item);
        }

        Ok(())
    }

    fn finish(&self, seed: Option<T>) -> Result<Option<T>> {
        Ok(seed)
    }
}

/// The only item that is not null. A second one is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueNonNull;

pub fn unique_non_null() -> UniqueNonNull {
    UniqueNonNull
}

impl<T: Nullable> Accumulator<T> for UniqueNonNull {
    type Seed = Option<T>;
    type Output = Option<T>;

    fn supply(&self) -> Option<T> {
        None
    }

    fn aggregate(&self, seed: &mut Option<T>, item: T) -> Result<()> {
        if item.is_null() {
            return Ok(());
        }

        if seed.is_some() {
            return Err(Error::NonUniqueResult);
        }

        *seed = Some(item);
        Ok(())
    }

    fn finish(&self, seed: Option<T>) -> Result<Option<T>> {
        Ok(seed)
    }
}

/// An accumulator made of three closures.
pub struct Fold<Sup, Agg, Fin, T> {
    supplier: Sup,
    aggregator: Agg,
    finisher: Fin,
    item: PhantomData<fn(T)>,
}

/// ```rust
/// # use sqlweave::accumulator::*;
/// let total = fold(|| 0, |sum: &mut i32, n: i32| *sum += n, |sum| sum * 10);
///
/// assert_eq!(60, total.collect([1, 2, 3]).unwrap());
/// ```
pub fn fold<T, S, R, Sup, Agg, Fin>(
    supplier: Sup,
    aggregator: Agg,
    finisher: Fin,
) -> Fold<Sup, Agg, Fin, T>
where
    Sup: Fn() -> S,
    Agg: Fn(&mut S, T),
    Fin: Fn(S) -> R,
{
    Fold {
        supplier,
        aggregator,
        finisher,
        item: PhantomData,
    }
}

impl<T, S, R, Sup, Agg, Fin> Accumulator<T> for Fold<Sup, Agg, Fin, T>
where
    Sup: Fn() -> S,
    Agg: Fn(&mut S, T),
    Fin: Fn(S) -> R,
{
    type Seed = S;
    type Output = R;

    fn supply(&self) -> S {
        (self.supplier)()
    }

    fn aggregate(&self, seed: &mut S, item: T) -> Result<()> {
        (self.aggregator)(seed, item);
        Ok(())
    }

    fn finish(&self, seed: S) -> Result<R> {
        Ok((self.finisher)(seed))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sets_drop_duplicates() {
        let set = to_set().collect([3, 1, 3, 2]).unwrap();
        assert_eq!(HashSet::from([1, 2, 3]), set);

        let ordered = to_ordered_set().collect([3, 1, 3, 2]).unwrap();
        assert_eq!(vec![3, 1, 2], ordered.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let groups = grouping_by_with(|word: &&str| word.len(), to_ordered_set())
            .collect(["bb", "a", "cc", "bb", "d"])
            .unwrap();

        assert_eq!(vec![2, 1], groups.keys().copied().collect::<Vec<_>>());
        assert_eq!(
            vec!["bb", "cc"],
            groups[&2].iter().copied().collect::<Vec<_>>()
        );
    }

    #[test]
    fn first_non_null_skips_nulls() {
        let first = first_non_null()
            .collect([json!(null), json!(1), json!(2)])
            .unwrap();

        assert_eq!(Some(json!(1)), first);
        assert_eq!(None, first_non_null().collect(Vec::<Value>::new()).unwrap());
    }

    #[test]
    fn unique_non_null_rejects_a_second_value() {
        let unique = unique_non_null()
            .collect([None, Some(1), None])
            .unwrap();
        assert_eq!(Some(Some(1)), unique);

        let error = unique_non_null()
            .collect([Some(1), Some(2)])
            .unwrap_err();
        assert!(matches!(error, Error::NonUniqueResult));
    }
}
