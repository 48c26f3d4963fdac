//! Per-category write serialization
//!
//! Ledger writes against the same `(user, category)` pair run one at a time
//! so a budget check and the write it guards see the same totals. Writes to
//! different categories proceed in parallel. A key's mutex lives in the
//! table only while some caller holds or waits for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::{category_key, UserId};

/// Lock key for one user's category
pub fn lock_key(user_id: UserId, category: &str) -> String {
    format!("{}:{}", user_id, category_key(category))
}

#[derive(Default)]
pub struct CategoryLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CategoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Arc<Mutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(table.entry(key.to_string()).or_default())
    }

    /// Drop the table entry for `key` unless another caller still has it.
    /// The table's copy plus `slot` make two references.
    fn release(&self, key: &str, slot: &Arc<Mutex<()>>) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(slot) == 2 {
            table.remove(key);
        }
    }

    /// Run `f` while holding every lock in `keys`
    ///
    /// Keys are deduplicated and taken in sorted order, so two callers
    /// needing the same pair cannot deadlock. A panic in an earlier holder
    /// does not block later writers.
    pub fn with_keys<T>(&self, keys: &[String], f: impl FnOnce() -> T) -> T {
        let mut keys: Vec<String> = keys.to_vec();
        keys.sort();
        keys.dedup();

        let slots = keys.iter().map(|k| self.slot(k)).collect();
        let held = Held {
            locks: self,
            keys,
            slots,
        };
        // Declared after `held`, so the guards unlock before it is dropped
        let _guards: Vec<_> = held
            .slots
            .iter()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();
        f()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Slots taken by one `with_keys` call; prunes them on drop, unwinding included
struct Held<'a> {
    locks: &'a CategoryLocks,
    keys: Vec<String>,
    slots: Vec<Arc<Mutex<()>>>,
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        for (key, slot) in self.keys.iter().zip(&self.slots) {
            self.locks.release(key, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_lock_key_normalizes_category() {
        let user = UserId::new();
        assert_eq!(lock_key(user, " COMIDA"), lock_key(user, "comida"));
        assert_ne!(lock_key(user, "comida"), lock_key(UserId::new(), "comida"));
    }

    #[test]
    fn test_same_key_is_exclusive() {
        let locks = Arc::new(CategoryLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let key = vec!["u:comida".to_string()];

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (locks, inside, max_seen, key) =
                    (locks.clone(), inside.clone(), max_seen.clone(), key.clone());
                thread::spawn(move || {
                    locks.with_keys(&key, || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_opposite_order_pairs_do_not_deadlock() {
        let locks = Arc::new(CategoryLocks::new());
        let a = "u:a".to_string();
        let b = "u:b".to_string();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let locks = locks.clone();
                let keys = if i % 2 == 0 {
                    vec![a.clone(), b.clone()]
                } else {
                    vec![b.clone(), a.clone()]
                };
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_keys(&keys, || ());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_duplicate_keys_do_not_self_deadlock() {
        let locks = CategoryLocks::new();
        let k = "u:a".to_string();
        assert_eq!(locks.with_keys(&[k.clone(), k], || 7), 7);
    }

    #[test]
    fn test_table_is_pruned_after_use() {
        let locks = CategoryLocks::new();
        for i in 0..100 {
            let keys = vec![format!("u:cat{}", i), "u:shared".to_string()];
            locks.with_keys(&keys, || assert_eq!(locks.len(), 2));
        }
        assert_eq!(locks.len(), 0);

        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            locks.with_keys(&["u:boom".to_string()], || panic!("writer failed"))
        }));
        assert!(panicked.is_err());
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn test_entry_kept_while_another_caller_waits() {
        let locks = Arc::new(CategoryLocks::new());
        let key = vec!["u:comida".to_string()];
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (go_tx, go_rx) = std::sync::mpsc::channel::<()>();

        let holder = {
            let (locks, key) = (locks.clone(), key.clone());
            thread::spawn(move || {
                locks.with_keys(&key, || {
                    entered_tx.send(()).unwrap();
                    go_rx.recv().unwrap();
                })
            })
        };
        entered_rx.recv().unwrap();
        assert_eq!(locks.len(), 1);

        let waiter = {
            let (locks, key) = (locks.clone(), key.clone());
            thread::spawn(move || locks.with_keys(&key, || 5))
        };
        thread::sleep(Duration::from_millis(20));
        go_tx.send(()).unwrap();

        holder.join().unwrap();
        assert_eq!(waiter.join().unwrap(), 5);
        assert_eq!(locks.len(), 0);
    }
}
