// Chained hash table used as the node index of every graph
use crate::{Error, Result};
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

/// Fixed seeds so bucket placement (and therefore iteration order) is
/// reproducible for the same sequence of operations.
const HASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Keys accepted by [`HashtableMap`].
///
/// A blank key plays the role of an absent key and is rejected on insert.
/// Only string-like keys can be blank.
pub trait MapKey: Hash + Eq + Debug {
    #[inline]
    fn is_blank(&self) -> bool {
        false
    }
}

impl MapKey for str {
    #[inline]
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl MapKey for String {
    #[inline]
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T: MapKey + ?Sized> MapKey for &T {
    #[inline]
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

macro_rules! never_blank {
    ($($t:ty),* $(,)?) => {
        $(impl MapKey for $t {})*
    };
}

never_blank!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool);

const MIN_GROWTH_FACTOR: usize = 2;
const MAX_GROWTH_FACTOR: usize = 16;

/// Sizing policy for a [`HashtableMap`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub initial_capacity: usize,
    /// Resize once `len >= load_factor_threshold * capacity`
    pub load_factor_threshold: f64,
    pub growth_factor: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            load_factor_threshold: 0.8,
            growth_factor: 2,
        }
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::InvalidConfig(
                "initial_capacity must be at least 1".to_string(),
            ));
        }
        if !(self.load_factor_threshold > 0.0 && self.load_factor_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "load_factor_threshold must be in (0, 1], got {}",
                self.load_factor_threshold
            )));
        }
        if !(MIN_GROWTH_FACTOR..=MAX_GROWTH_FACTOR).contains(&self.growth_factor) {
            return Err(Error::InvalidConfig(format!(
                "growth_factor must be in [{MIN_GROWTH_FACTOR}, {MAX_GROWTH_FACTOR}], got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Pair<K, V> {
    key: K,
    value: V,
}

/// Key/value store backed by an array of buckets, each bucket a chain of
/// pairs whose keys hash to it.
///
/// Keys are unique across the table. Inserting a key that is already present
/// fails instead of overwriting. The bucket array grows by `growth_factor`
/// as soon as the load factor reaches the configured threshold, and every
/// pair is rehashed into the new array.
#[derive(Debug, Clone)]
pub struct HashtableMap<K, V> {
    table: Vec<Vec<Pair<K, V>>>,
    size: usize,
    config: MapConfig,
    hasher: RandomState,
}

impl<K: MapKey, V> HashtableMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(MapConfig::default())
    }

    /// Table with `capacity` buckets (at least one) and the default load policy.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_valid_config(MapConfig {
            initial_capacity: capacity.max(1),
            ..MapConfig::default()
        })
    }

    pub fn with_config(config: MapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: MapConfig) -> Self {
        Self {
            table: empty_table(config.initial_capacity),
            size: 0,
            config,
            hasher: RandomState::with_seeds(
                HASH_SEEDS[0],
                HASH_SEEDS[1],
                HASH_SEEDS[2],
                HASH_SEEDS[3],
            ),
        }
    }

    #[inline]
    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(key) % self.table.len() as u64) as usize
    }

    /// Insert a new key. Fails on blank or already present keys, and when the
    /// table would have to grow past `usize::MAX` buckets. A failed insert
    /// leaves the map unchanged.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        if key.is_blank() {
            return Err(Error::InvalidKey(format!("{key:?}")));
        }
        let idx = self.bucket_index(&key);
        if self.table[idx].iter().any(|pair| pair.key == key) {
            return Err(Error::DuplicateKey(format!("{key:?}")));
        }

        let size = self.size + 1;
        let threshold = self.config.load_factor_threshold * self.table.len() as f64;
        let grow_to = if size as f64 >= threshold {
            Some(grown_capacity(self.table.len(), self.config.growth_factor)?)
        } else {
            None
        };

        self.table[idx].push(Pair { key, value });
        self.size = size;

        if let Some(new_capacity) = grow_to {
            self.resize(new_capacity);
        }
        Ok(())
    }

    fn resize(&mut self, new_capacity: usize) {
        tracing::trace!(
            from = self.table.len(),
            to = new_capacity,
            entries = self.size,
            "resizing hashtable"
        );

        let old = std::mem::replace(&mut self.table, empty_table(new_capacity));
        for pair in old.into_iter().flatten() {
            let idx = self.bucket_index(&pair.key);
            self.table[idx].push(pair);
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<&Pair<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_index(key);
        self.table[idx].iter().find(|pair| pair.key.borrow() == key)
    }

    /// Non-failing lookup.
    #[inline]
    pub fn lookup<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|pair| &pair.value)
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.lookup(key)
            .ok_or_else(|| Error::KeyNotFound(format!("{key:?}")))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.bucket_index(key);
        self.table[idx]
            .iter_mut()
            .find(|pair| pair.key.borrow() == key)
            .map(|pair| &mut pair.value)
            .ok_or_else(|| Error::KeyNotFound(format!("{key:?}")))
    }

    /// Remove a key and hand back its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.bucket_index(key);
        let bucket = &mut self.table[idx];
        match bucket.iter().position(|pair| pair.key.borrow() == key) {
            Some(pos) => {
                let pair = bucket.swap_remove(pos);
                self.size -= 1;
                Ok(pair.value)
            }
            None => Err(Error::KeyNotFound(format!("{key:?}"))),
        }
    }

    /// Drop every entry. Capacity is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.table {
            bucket.clear();
        }
        self.size = 0;
    }
}

impl<K, V> HashtableMap<K, V> {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table
            .iter()
            .flat_map(|bucket| bucket.iter().map(|pair| (&pair.key, &pair.value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.table
            .iter_mut()
            .flat_map(|bucket| bucket.iter_mut().map(|pair| &mut pair.value))
    }
}

impl<K: MapKey, V> Default for HashtableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn grown_capacity(capacity: usize, growth_factor: usize) -> Result<usize> {
    capacity.checked_mul(growth_factor).ok_or_else(|| {
        Error::InvalidConfig(format!(
            "capacity {capacity} cannot grow by a factor of {growth_factor}"
        ))
    })
}

fn empty_table<K, V>(capacity: usize) -> Vec<Vec<Pair<K, V>>> {
    (0..capacity).map(|_| Vec::new()).collect()
}
