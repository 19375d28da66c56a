//! Collection runtime contract
//!
//! The algebra never touches elements directly; every matrix operation is
//! expressed with the operations below over an opaque collection type.
//! A runtime is free to execute them in parallel and to redistribute
//! elements between workers.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::Hash;

/// Execution hint for shuffle operations.
///
/// Hints never change results, only how a runtime computes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tuner {
    /// Let the runtime decide
    #[default]
    Default,
    /// Group on the calling thread
    Sequential,
    /// Group in parallel with at least `min_chunk` elements per task
    Parallel { min_chunk: usize },
}

/// Distributed or parallel collection operations consumed by the algebra
pub trait Runtime: Clone + Send + Sync {
    /// Opaque collection of `T`
    type Collection<T: Send>: Send;

    /// Distribute a local vector
    fn from_vec<T: Send>(&self, items: Vec<T>) -> Self::Collection<T>;

    /// Apply `f` to every element
    fn map<T, U, F>(&self, collection: Self::Collection<T>, f: F) -> Self::Collection<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync;

    /// Apply `f` to every element and flatten the results
    fn flat_map<T, U, I, F>(&self, collection: Self::Collection<T>, f: F) -> Self::Collection<U>
    where
        T: Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync;

    /// Concatenate two collections
    fn union<T: Send>(
        &self,
        left: Self::Collection<T>,
        right: Self::Collection<T>,
    ) -> Self::Collection<T>;

    /// Collect the values of every key.
    ///
    /// The order of values within a group is unspecified.
    fn group_by_key<K, V>(
        &self,
        collection: Self::Collection<(K, V)>,
        tuner: &Tuner,
    ) -> Self::Collection<(K, Vec<V>)>
    where
        K: Eq + Hash + Send,
        V: Send;

    /// Merge the values of every key with an associative, commutative `f`
    fn reduce_by_key<K, V, F>(
        &self,
        collection: Self::Collection<(K, V)>,
        f: F,
        tuner: &Tuner,
    ) -> Self::Collection<(K, V)>
    where
        K: Eq + Hash + Send,
        V: Send,
        F: Fn(V, V) -> V + Send + Sync;

    /// Inner join on key; every matching pair of values is emitted
    fn join<K, V, W>(
        &self,
        left: Self::Collection<(K, V)>,
        right: Self::Collection<(K, W)>,
        tuner: &Tuner,
    ) -> Self::Collection<(K, (V, W))>
    where
        K: Eq + Hash + Clone + Send + Sync,
        V: Clone + Send + Sync,
        W: Clone + Send + Sync;

    /// Sort the values of every group with `compare`
    fn sort_within<K, V, F>(
        &self,
        collection: Self::Collection<(K, Vec<V>)>,
        compare: F,
    ) -> Self::Collection<(K, Vec<V>)>
    where
        K: Send,
        V: Send,
        F: Fn(&V, &V) -> Ordering + Send + Sync;

    /// Bring every element back to the caller
    fn materialize<T: Send>(&self, collection: Self::Collection<T>) -> Vec<T>;

    /// Share a read-only value with every worker
    fn broadcast<T: Send + Sync>(&self, value: T) -> Arc<T> {
        Arc::new(value)
    }
}
