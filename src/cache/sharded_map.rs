//! Lock-striped concurrent map with first-writer-wins insertion.
//!
//! Each entry goes through two states: a *pending* slot installed by the
//! first thread to claim the key, and a *ready* slot holding the committed
//! value. The first writer constructs the value outside any shard lock;
//! concurrent lookups for the same key park on the slot's condition
//! variable until the value is committed. Lookups on different keys only
//! contend when they happen to share a shard, and then only for the
//! duration of a hash-map operation.

use std::collections::hash_map::Entry;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHasher};

const SHARD_COUNT: usize = 16;

enum SlotState<V> {
    Pending,
    Ready(V),
}

struct Slot<V> {
    state: Mutex<SlotState<V>>,
    ready: Condvar,
}

impl<V: Clone> Slot<V> {
    fn pending() -> Self {
        Self {
            state: Mutex::new(SlotState::Pending),
            ready: Condvar::new(),
        }
    }

    fn commit(&self, value: V) {
        let mut state = self.state.lock();
        *state = SlotState::Ready(value);
        self.ready.notify_all();
    }

    fn wait_ready(&self) -> V {
        let mut state = self.state.lock();
        loop {
            match &*state {
                SlotState::Ready(value) => return value.clone(),
                SlotState::Pending => self.ready.wait(&mut state),
            }
        }
    }
}

type Shard<K, V> = RwLock<FxHashMap<K, Arc<Slot<V>>>>;

/// A concurrent insert-or-lookup map.
pub struct ShardedMap<K, V> {
    shards: [Shard<K, V>; SHARD_COUNT],
}

impl<K: Eq + Hash, V: Clone> Default for ShardedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: Clone> ShardedMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
        }
    }

    fn shard(&self, key: &K) -> &Shard<K, V> {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    /// Looks up the committed value for `key`.
    ///
    /// Blocks if the key's first writer has claimed the entry but not yet
    /// committed; returns `None` only when the key is entirely absent.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let slot = self.shard(key).read().get(key).cloned()?;
        Some(slot.wait_ready())
    }

    /// Looks up `key`, constructing and committing the value if the key is
    /// absent.
    ///
    /// Returns the committed value plus whether this call was the first
    /// writer. Exactly one caller constructs; every other concurrent call
    /// for the same key observes that caller's committed value.
    pub fn find_or_create(&self, key: K, construct: impl FnOnce() -> V) -> (V, bool) {
        let existing = self.shard(&key).read().get(&key).cloned();
        if let Some(slot) = existing {
            return (slot.wait_ready(), false);
        }

        let shard = self.shard(&key);
        let (slot, is_first) = match shard.write().entry(key) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let slot = Arc::new(Slot::pending());
                entry.insert(Arc::clone(&slot));
                (slot, true)
            }
        };

        if is_first {
            let value = construct();
            slot.commit(value.clone());
            (value, true)
        } else {
            (slot.wait_ready(), false)
        }
    }

    /// Removes every entry.
    ///
    /// Callers must guarantee no entry is pending; the cache's coarse
    /// write lock provides that.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.write().clear();
        }
    }

    /// Number of entries, pending included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn find_or_create_constructs_once() {
        let map: ShardedMap<u32, String> = ShardedMap::new();

        let (value, first) = map.find_or_create(7, || "seven".to_string());
        assert!(first);
        assert_eq!(value, "seven");

        let (value, first) = map.find_or_create(7, || "never".to_string());
        assert!(!first);
        assert_eq!(value, "seven");

        assert_eq!(map.get(&7), Some("seven".to_string()));
        assert_eq!(map.get(&8), None);
    }

    #[test]
    fn clear_empties_all_shards() {
        let map: ShardedMap<u32, u32> = ShardedMap::new();
        for i in 0..64 {
            map.find_or_create(i, || i * 2);
        }
        assert_eq!(map.len(), 64);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&3), None);
    }

    #[test]
    fn racing_writers_converge_on_one_value() {
        let map: ShardedMap<u32, usize> = ShardedMap::new();
        let constructions = AtomicUsize::new(0);
        let first_writers = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let (value, first) = map.find_or_create(42, || {
                        // Hold the slot pending long enough for the other
                        // threads to pile up on it.
                        std::thread::sleep(Duration::from_millis(20));
                        constructions.fetch_add(1, Ordering::SeqCst) + 100
                    });
                    if first {
                        first_writers.fetch_add(1, Ordering::SeqCst);
                    }
                    assert_eq!(value, 100);
                });
            }
        });

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert_eq!(first_writers.load(Ordering::SeqCst), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn distinct_keys_do_not_serialize() {
        let map: ShardedMap<u32, u32> = ShardedMap::new();

        std::thread::scope(|scope| {
            for i in 0..32 {
                let map = &map;
                scope.spawn(move || {
                    let (value, first) = map.find_or_create(i, || i + 1);
                    assert!(first);
                    assert_eq!(value, i + 1);
                });
            }
        });

        assert_eq!(map.len(), 32);
    }
}
