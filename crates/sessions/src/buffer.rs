use std::hash::Hash;

use dashmap::DashMap;

/// A value that knows the key it is stored under.
pub trait Keyed: Clone {
    type Key: Copy + Eq + Hash;

    fn key(&self) -> Self::Key;
}

/// Concurrent map holding at most one value per key.
///
/// Each operation locks only the shard that owns the key, so operations on
/// the same key are linearizable while different chats proceed in parallel.
/// No lock is held after a call returns, which keeps it safe to use between
/// `.await` points.
pub struct KeyedBuffer<V: Keyed> {
    entries: DashMap<V::Key, V>,
}

impl<V: Keyed> Default for KeyedBuffer<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V: Keyed> KeyedBuffer<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing whatever was stored under its key.
    /// Returns the replaced value.
    pub fn put(&self, value: V) -> Option<V> {
        self.entries.insert(value.key(), value)
    }

    pub fn get(&self, key: V::Key) -> Option<V> {
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    /// Delete the entry under `key`. Absent keys are a no-op.
    pub fn remove(&self, key: V::Key) -> Option<V> {
        self.entries.remove(&key).map(|(_, value)| value)
    }

    /// Delete the entry under `key` only if it still satisfies `predicate`.
    pub fn remove_if(&self, key: V::Key, predicate: impl FnOnce(&V) -> bool) -> Option<V> {
        self.entries
            .remove_if(&key, |_, value| predicate(value))
            .map(|(_, value)| value)
    }

    /// Delete the entry stored under `value`'s key.
    pub fn remove_value(&self, value: &V) -> Option<V> {
        self.remove(value.key())
    }

    /// First value matching `predicate`. Scans every shard.
    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<V> {
        self.entries
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, std::sync::Arc};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Entry {
        key: i64,
        value: &'static str,
    }

    impl Keyed for Entry {
        type Key = i64;

        fn key(&self) -> i64 {
            self.key
        }
    }

    #[test]
    fn get_after_put() {
        let buffer = KeyedBuffer::new();
        buffer.put(Entry { key: 1, value: "a" });
        assert_eq!(buffer.get(1), Some(Entry { key: 1, value: "a" }));
        assert_eq!(buffer.get(2), None);
    }

    #[test]
    fn put_overwrites() {
        let buffer = KeyedBuffer::new();
        assert!(buffer.put(Entry { key: 1, value: "a" }).is_none());
        let replaced = buffer.put(Entry { key: 1, value: "b" });
        assert_eq!(replaced.map(|e| e.value), Some("a"));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get(1).unwrap().value, "b");
    }

    #[test]
    fn remove_then_get_is_empty() {
        let buffer = KeyedBuffer::new();
        let entry = Entry { key: 7, value: "x" };
        buffer.put(entry.clone());
        assert!(buffer.remove_value(&entry).is_some());
        assert!(buffer.get(7).is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn remove_missing_is_noop() {
        let buffer: KeyedBuffer<Entry> = KeyedBuffer::new();
        assert!(buffer.remove(42).is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn find_scans_values() {
        let buffer = KeyedBuffer::new();
        buffer.put(Entry { key: 1, value: "a" });
        buffer.put(Entry { key: 2, value: "b" });
        assert_eq!(buffer.find(|e| e.value == "b").map(|e| e.key), Some(2));
        assert!(buffer.find(|e| e.value == "z").is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_chats_keep_one_entry_each() {
        let buffer = Arc::new(KeyedBuffer::new());
        let mut handles = Vec::new();
        for key in 0..16_i64 {
            let buffer = Arc::clone(&buffer);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    buffer.put(Entry { key, value: "a" });
                    buffer.put(Entry { key, value: "b" });
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(buffer.len(), 16);
        for key in 0..16 {
            assert_eq!(buffer.get(key).unwrap().value, "b");
        }
    }
}
