//! Thread-local storage pool for staging buffers.
//!
//! Storages are handed back zero-filled so a pooled buffer is
//! indistinguishable from a freshly allocated one.

use std::cell::RefCell;

/// Default staging capacity, matching the classic 1 KiB copy buffer.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Storages larger than this are released instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Maximum number of storages to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// Takes a zero-filled storage of exactly `capacity` bytes, reusing a pooled
/// one when available.
pub(crate) fn take(capacity: usize) -> Vec<u8> {
    let reused = THREAD_STORAGE_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        let idx = pool.iter().position(|s| s.len() == capacity)?;
        Some(pool.swap_remove(idx))
    });

    match reused {
        Some(storage) => storage,
        None => vec![0u8; capacity],
    }
}

/// Returns a storage to the pool, zeroing it first.
pub(crate) fn give_back(mut storage: Vec<u8>) {
    if storage.is_empty() || storage.len() > MAX_POOLED_CAPACITY {
        return;
    }

    storage.fill(0);
    THREAD_STORAGE_POOL.with(|pool| {
        let mut pool = pool.borrow_mut();
        if pool.len() < MAX_POOL_SIZE {
            pool.push(storage);
        }
    });
}

#[cfg(test)]
pub(crate) fn pooled_count() -> usize {
    THREAD_STORAGE_POOL.with(|pool| pool.borrow().len())
}

// Thread-local storage pool
thread_local! {
    static THREAD_STORAGE_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
