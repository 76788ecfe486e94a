//! Caller-supplied equality.
//!
//! An [`EqualityStrategy`] pairs an equivalence predicate with a hash function so
//! values can be compared, deduplicated and grouped by a notion of sameness other
//! than their own `PartialEq` (case-insensitive user names, records compared by id).
//!
//! The strategy trusts its caller: when `equals(a, b)` holds, `hash_of(a)` must
//! equal `hash_of(b)`. Nothing checks this. A strategy that breaks the contract
//! makes [`EqualityStrategy::dedup`], [`EqualityStrategy::group`] and any std
//! container holding [`Keyed`] values behave unpredictably.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

type EqFn<T> = dyn Fn(&T, &T) -> bool + Send + Sync;
type HashFn<T> = dyn Fn(&T) -> u64 + Send + Sync;

pub struct EqualityStrategy<T: ?Sized> {
    eq: Arc<EqFn<T>>,
    hash: Arc<HashFn<T>>,
}

impl<T: ?Sized> Clone for EqualityStrategy<T> {
    fn clone(&self) -> Self {
        Self {
            eq: Arc::clone(&self.eq),
            hash: Arc::clone(&self.hash),
        }
    }
}

impl<T: ?Sized> fmt::Debug for EqualityStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityStrategy").finish_non_exhaustive()
    }
}

impl<T: Hash + ?Sized + 'static> EqualityStrategy<T> {
    /// Uses `eq` for equivalence and the type's own `Hash` impl for hashing.
    ///
    /// Only sound when `eq` is no coarser than `T`'s own equality.
    pub fn new<E>(eq: E) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::with_hasher(eq, |value: &T| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl<T: ?Sized + 'static> EqualityStrategy<T> {
    pub fn with_hasher<E, H>(eq: E, hash: H) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
        H: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        Self {
            eq: Arc::new(eq),
            hash: Arc::new(hash),
        }
    }

    /// Compares values through a derived key, hashing the key as well.
    ///
    /// Consistent by construction.
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Eq + Hash,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let key = Arc::new(key);
        let hash_key = Arc::clone(&key);
        Self::with_hasher(
            move |a, b| key(a) == key(b),
            move |v| {
                let mut hasher = DefaultHasher::new();
                hash_key(v).hash(&mut hasher);
                hasher.finish()
            },
        )
    }

    pub fn equals(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    pub fn hash_of(&self, value: &T) -> u64 {
        (self.hash)(value)
    }
}

impl<T: 'static> EqualityStrategy<T> {
    /// Wraps `value` so std containers use this strategy.
    pub fn key(&self, value: T) -> Keyed<T> {
        Keyed {
            value,
            strategy: self.clone(),
        }
    }

    /// Drops later duplicates, keeping the first occurrence of each class in
    /// order.
    pub fn dedup(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut out: Vec<T> = Vec::new();
        for item in items {
            let bucket = buckets.entry(self.hash_of(&item)).or_default();
            if bucket.iter().any(|&i| self.equals(&out[i], &item)) {
                continue;
            }
            bucket.push(out.len());
            out.push(item);
        }
        out
    }

    /// Partitions items into equivalence classes, in order of first appearance.
    pub fn group(&self, items: impl IntoIterator<Item = T>) -> Vec<Vec<T>> {
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut groups: Vec<Vec<T>> = Vec::new();
        for item in items {
            let bucket = buckets.entry(self.hash_of(&item)).or_default();
            match bucket.iter().copied().find(|&g| self.equals(&groups[g][0], &item)) {
                Some(g) => groups[g].push(item),
                None => {
                    bucket.push(groups.len());
                    groups.push(vec![item]);
                }
            }
        }
        groups
    }
}

/// A value paired with the strategy that decides its equality and hash.
///
/// Two `Keyed` values are compared with the left-hand side's strategy; mixing
/// strategies in one container is the caller's problem.
pub struct Keyed<T: 'static> {
    value: T,
    strategy: EqualityStrategy<T>,
}

impl<T: 'static> Keyed<T> {
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: 'static> PartialEq for Keyed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.strategy.equals(&self.value, &other.value)
    }
}

impl<T: 'static> Eq for Keyed<T> {}

impl<T: 'static> Hash for Keyed<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.strategy.hash_of(&self.value));
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Keyed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keyed").field(&self.value).finish()
    }
}

/// Case-insensitive string equality. Record lists use it to collapse repeats.
pub fn case_insensitive() -> EqualityStrategy<String> {
    EqualityStrategy::by_key(|s: &String| s.to_lowercase())
}
