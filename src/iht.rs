use std::hash::Hash;
use fxhash::FxHashMap;
use crate::error::{Error, Result};


/// Index hash table.
///
/// Assigns small, stable integer indices to tile coordinates in the order
/// they are first seen. The table holds at most `capacity` keys. A new key
/// arriving after the table is full is an error; the table never hands out
/// colliding indices.
#[derive(Debug, Clone)]
pub struct IndexHashTable<K> {
    /// Maximum number of distinct keys
    capacity: usize,
    /// Key to index mapping. Indices are `0..table.len()`.
    table: FxHashMap<K, usize>,
    /// Number of rejected keys since the table was created or cleared
    overflow_count: u64,
}

impl<K: Hash + Eq> IndexHashTable<K> {
    pub fn new(capacity: usize) -> Result<IndexHashTable<K>> {
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                String::from("index hash table capacity must be positive")));
        }
        Ok(IndexHashTable {
            capacity,
            table: FxHashMap::default(),
            overflow_count: 0,
        })
    }

    /// Change the capacity. Existing assignments are kept, so the new
    /// capacity can't be smaller than the number of keys already held.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                String::from("index hash table capacity must be positive")));
        }
        if capacity < self.table.len() {
            return Err(Error::InvalidConfig(format!(
                "capacity {} is smaller than the {} keys already assigned",
                capacity, self.table.len())));
        }
        self.capacity = capacity;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of keys currently assigned.
    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn is_full(&self) -> bool {
        self.table.len() >= self.capacity
    }

    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }

    /// Forget every key. Indices are handed out from zero again.
    pub fn clear(&mut self) {
        self.table.clear();
        self.overflow_count = 0;
    }

    /// Index previously assigned to `key`, without inserting it.
    pub fn lookup(&self, key: &K) -> Option<usize> {
        self.table.get(key).copied()
    }

    /// Return the index for `key`, assigning the next sequential index if
    /// the key is new.
    ///
    /// Fails with `Error::CapacityExceeded` on every new key once the table is
    /// full. Only the first overflow is logged.
    pub fn get_index(&mut self, key: K) -> Result<usize> {
        if let Some(&index) = self.table.get(&key) {
            return Ok(index);
        }
        let size = self.table.len();
        if size >= self.capacity {
            if self.overflow_count == 0 {
                log::warn!(
                    "Index hash table full at {} entries, new tiles will be rejected",
                    self.capacity);
            }
            self.overflow_count += 1;
            return Err(Error::CapacityExceeded { capacity: self.capacity });
        }
        self.table.insert(key, size);
        Ok(size)
    }
}
