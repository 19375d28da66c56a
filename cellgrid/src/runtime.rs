//! Local data-parallel runtime
//!
//! [`LocalRuntime`] implements the collection contract over plain vectors
//! using rayon. Shuffles fold each worker's share into a private hash map and
//! merge the maps pairwise, so partial aggregation states are combined in no
//! particular order.

use std::cmp::Ordering;
use std::hash::Hash;
use std::sync::Arc;

use cellgrid_core::{Runtime, Tuner};
use hashbrown::HashMap;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::error::Result;

/// Configuration for the local runtime
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    /// Worker threads of a dedicated pool; `None` uses the global rayon pool
    pub threads: Option<usize>,
    /// Minimum number of elements per parallel task.
    ///
    /// Collections smaller than this are shuffled on the calling thread.
    pub min_chunk: usize,
    /// Name prefix for the threads of a dedicated pool
    pub thread_name: String,
}

impl RuntimeConfig {
    /// Use a dedicated pool with `threads` workers
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the minimum number of elements per parallel task
    pub fn with_min_chunk(mut self, min_chunk: usize) -> Self {
        self.min_chunk = min_chunk.max(1);
        self
    }

    /// Set the name prefix of dedicated worker threads
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Load configuration from JSON; missing fields take their defaults
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            threads: None,
            min_chunk: 1024,
            thread_name: String::from("cellgrid-worker"),
        }
    }
}

/// Runtime executing collection operations on rayon
#[derive(Debug, Clone, Default)]
pub struct LocalRuntime {
    pool: Option<Arc<ThreadPool>>,
    config: RuntimeConfig,
}

/// How a shuffle is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Sequential,
    Parallel(usize),
}

impl LocalRuntime {
    /// Runtime on the global rayon pool with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime built from `config`, creating a dedicated pool if requested
    pub fn with_config(config: RuntimeConfig) -> Result<Self> {
        let pool = match config.threads {
            Some(threads) => {
                let prefix = config.thread_name.clone();
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(move |index| format!("{prefix}-{index}"))
                    .build()?;
                debug!(threads, "built dedicated thread pool");
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(Self { pool, config })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of worker threads operations run on
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn install<T, OP>(&self, op: OP) -> T
    where
        T: Send,
        OP: FnOnce() -> T + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn strategy(&self, tuner: &Tuner, len: usize) -> Strategy {
        match *tuner {
            Tuner::Sequential => Strategy::Sequential,
            Tuner::Parallel { min_chunk } => Strategy::Parallel(min_chunk.max(1)),
            Tuner::Default if len < self.config.min_chunk => Strategy::Sequential,
            Tuner::Default => Strategy::Parallel(self.config.min_chunk),
        }
    }
}

fn push_group<K: Eq + Hash, V>(mut groups: HashMap<K, Vec<V>>, (key, value): (K, V)) -> HashMap<K, Vec<V>> {
    groups.entry(key).or_default().push(value);
    groups
}

fn merge_groups<K: Eq + Hash, V>(
    mut left: HashMap<K, Vec<V>>,
    mut right: HashMap<K, Vec<V>>,
) -> HashMap<K, Vec<V>> {
    if left.len() < right.len() {
        std::mem::swap(&mut left, &mut right);
    }
    for (key, mut values) in right {
        left.entry(key).or_default().append(&mut values);
    }
    left
}

fn reduce_into<K: Eq + Hash, V>(
    map: &mut HashMap<K, V>,
    key: K,
    value: V,
    f: &impl Fn(V, V) -> V,
) {
    let merged = match map.remove(&key) {
        Some(current) => f(current, value),
        None => value,
    };
    map.insert(key, merged);
}

impl Runtime for LocalRuntime {
    type Collection<T: Send> = Vec<T>;

    fn from_vec<T: Send>(&self, items: Vec<T>) -> Vec<T> {
        items
    }

    fn map<T, U, F>(&self, collection: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync,
    {
        self.install(|| collection.into_par_iter().map(f).collect())
    }

    fn flat_map<T, U, I, F>(&self, collection: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync,
    {
        self.install(|| collection.into_par_iter().flat_map_iter(f).collect())
    }

    fn union<T: Send>(&self, mut left: Vec<T>, mut right: Vec<T>) -> Vec<T> {
        left.append(&mut right);
        left
    }

    fn group_by_key<K, V>(&self, collection: Vec<(K, V)>, tuner: &Tuner) -> Vec<(K, Vec<V>)>
    where
        K: Eq + Hash + Send,
        V: Send,
    {
        let strategy = self.strategy(tuner, collection.len());
        trace!(elements = collection.len(), ?strategy, "group_by_key");

        let groups = match strategy {
            Strategy::Sequential => collection.into_iter().fold(HashMap::new(), push_group),
            Strategy::Parallel(min_chunk) => self.install(|| {
                collection
                    .into_par_iter()
                    .with_min_len(min_chunk)
                    .fold(HashMap::new, push_group)
                    .reduce(HashMap::new, merge_groups)
            }),
        };

        groups.into_iter().collect()
    }

    fn reduce_by_key<K, V, F>(&self, collection: Vec<(K, V)>, f: F, tuner: &Tuner) -> Vec<(K, V)>
    where
        K: Eq + Hash + Send,
        V: Send,
        F: Fn(V, V) -> V + Send + Sync,
    {
        let strategy = self.strategy(tuner, collection.len());
        trace!(elements = collection.len(), ?strategy, "reduce_by_key");

        let reduced = match strategy {
            Strategy::Sequential => {
                let mut map = HashMap::new();
                for (key, value) in collection {
                    reduce_into(&mut map, key, value, &f);
                }
                map
            }
            Strategy::Parallel(min_chunk) => {
                let f = &f;
                self.install(|| {
                    collection
                        .into_par_iter()
                        .with_min_len(min_chunk)
                        .fold(HashMap::new, |mut map, (key, value)| {
                            reduce_into(&mut map, key, value, f);
                            map
                        })
                        .reduce(HashMap::new, |mut left, mut right| {
                            if left.len() < right.len() {
                                std::mem::swap(&mut left, &mut right);
                            }
                            for (key, value) in right {
                                reduce_into(&mut left, key, value, f);
                            }
                            left
                        })
                })
            }
        };

        reduced.into_iter().collect()
    }

    fn join<K, V, W>(
        &self,
        left: Vec<(K, V)>,
        right: Vec<(K, W)>,
        tuner: &Tuner,
    ) -> Vec<(K, (V, W))>
    where
        K: Eq + Hash + Clone + Send + Sync,
        V: Clone + Send + Sync,
        W: Clone + Send + Sync,
    {
        trace!(left = left.len(), right = right.len(), "join");
        let index: HashMap<K, Vec<W>> = self.group_by_key(right, tuner).into_iter().collect();

        self.install(|| {
            left.into_par_iter()
                .flat_map_iter(|(key, value)| {
                    index
                        .get(&key)
                        .map(|matches| {
                            matches
                                .iter()
                                .map(|other| (key.clone(), (value.clone(), other.clone())))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
    }

    fn sort_within<K, V, F>(&self, mut collection: Vec<(K, Vec<V>)>, compare: F) -> Vec<(K, Vec<V>)>
    where
        K: Send,
        V: Send,
        F: Fn(&V, &V) -> Ordering + Send + Sync,
    {
        self.install(|| {
            collection
                .par_iter_mut()
                .for_each(|(_, values)| values.sort_by(|a, b| compare(a, b)))
        });
        collection
    }

    fn materialize<T: Send>(&self, collection: Vec<T>) -> Vec<T> {
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted<K: Ord, V: Ord>(mut groups: Vec<(K, Vec<V>)>) -> Vec<(K, Vec<V>)> {
        for (_, values) in groups.iter_mut() {
            values.sort();
        }
        groups.sort();
        groups
    }

    fn pairs() -> Vec<(u32, u32)> {
        (0..5000).map(|i| (i % 7, i)).collect()
    }

    #[test]
    fn test_group_by_key_strategies_agree() {
        let runtime = LocalRuntime::new();
        let sequential = runtime.group_by_key(pairs(), &Tuner::Sequential);
        let parallel = runtime.group_by_key(pairs(), &Tuner::Parallel { min_chunk: 16 });
        let default = runtime.group_by_key(pairs(), &Tuner::Default);

        assert_eq!(sequential.len(), 7);
        assert_eq!(sorted(sequential.clone()), sorted(parallel));
        assert_eq!(sorted(sequential), sorted(default));
    }

    #[test]
    fn test_reduce_by_key() {
        let runtime = LocalRuntime::new();
        let mut totals = runtime.reduce_by_key(pairs(), |a, b| a + b, &Tuner::Parallel { min_chunk: 8 });
        totals.sort();

        let expected: Vec<(u32, u32)> = (0..7)
            .map(|key| (key, (0..5000).filter(|i| i % 7 == key).sum()))
            .collect();
        assert_eq!(totals, expected);
    }

    #[test]
    fn test_join_emits_every_match() {
        let runtime = LocalRuntime::new();
        let left = vec![(1, "a"), (2, "b"), (3, "c")];
        let right = vec![(1, 10), (1, 11), (3, 30), (4, 40)];
        let mut joined = runtime.join(left, right, &Tuner::Default);
        joined.sort();
        assert_eq!(joined, vec![(1, ("a", 10)), (1, ("a", 11)), (3, ("c", 30))]);
    }

    #[test]
    fn test_sort_within() {
        let runtime = LocalRuntime::new();
        let groups = vec![("x", vec![3, 1, 2]), ("y", vec![9, 8])];
        let sorted = runtime.sort_within(groups, |a, b| b.cmp(a));
        assert_eq!(sorted, vec![("x", vec![3, 2, 1]), ("y", vec![9, 8])]);
    }

    #[test]
    fn test_dedicated_pool() {
        let config = RuntimeConfig::default()
            .with_threads(2)
            .with_thread_name("test-pool")
            .with_min_chunk(4);
        let runtime = LocalRuntime::with_config(config).expect("pool builds");
        assert_eq!(runtime.threads(), 2);

        let doubled = runtime.map((0..100).collect::<Vec<_>>(), |x: i32| x * 2);
        assert_eq!(doubled.iter().sum::<i32>(), 9900);
    }

    #[test]
    fn test_flat_map_and_union() {
        let runtime = LocalRuntime::new();
        let expanded = runtime.flat_map(vec![1usize, 2, 3], |x| vec![x; x]);
        assert_eq!(expanded, vec![1, 2, 2, 3, 3, 3]);
        assert_eq!(runtime.union(vec![1], vec![2, 3]), vec![1, 2, 3]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let config = RuntimeConfig::from_json(r#"{"threads": 3, "min_chunk": 64}"#).expect("valid json");
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.min_chunk, 64);
        assert_eq!(config.thread_name, "cellgrid-worker");

        assert!(RuntimeConfig::from_json("{").is_err());
    }
}
