#![forbid(unsafe_code)]

//! Thread-safe freelist of recyclable values.
//!
//! The virtualization layer cycles two kinds of storage through pools
//! instead of allocating per frame: renderable item instances, and the
//! transient snapshot buffers used while diffing visible windows. Both are
//! unordered bags with no capacity bound and no eviction; a released value
//! stays available until obtained again or the pool is dropped.

use std::sync::{Mutex, PoisonError};

/// An unbounded, unordered freelist.
///
/// `obtain` returning `None` means the caller must construct a fresh value
/// itself; the pool never invokes a factory on the caller's behalf.
/// `obtain` and `release` are safe to call concurrently from any thread.
#[derive(Debug, Default)]
pub struct Pool<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Pool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Take an idle value out of the pool, most recently released first.
    pub fn obtain(&self) -> Option<T> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
    }

    /// Return a value to the pool for later reuse.
    pub fn release(&self, item: T) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
    }

    /// Number of idle values currently held.
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the pool holds no idle values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn obtain_from_empty_pool() {
        let pool: Pool<u32> = Pool::new();
        assert!(pool.obtain().is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn release_then_obtain_is_lifo() {
        let pool = Pool::new();
        pool.release(1);
        pool.release(2);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.obtain(), Some(2));
        assert_eq!(pool.obtain(), Some(1));
        assert_eq!(pool.obtain(), None);
    }

    #[test]
    fn no_eviction() {
        let pool = Pool::new();
        for i in 0..1000 {
            pool.release(i);
        }
        assert_eq!(pool.len(), 1000);
    }

    #[test]
    fn concurrent_obtain_release() {
        let pool = Arc::new(Pool::new());
        for i in 0..64 {
            pool.release(i);
        }
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        if let Some(v) = pool.obtain() {
                            pool.release(v);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // Every value survives the churn.
        assert_eq!(pool.len(), 64);
    }
}
