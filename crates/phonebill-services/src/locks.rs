//! Write serialization for the query boundary
//!
//! Appends for the same customer are serialized through a per-customer
//! mutex. Reset takes the exclusive side of a global lock, so it waits for
//! in-flight requests and blocks new ones until it finishes.
//!
//! A customer's mutex lives in the map only while some Append holds or
//! waits for it; the last guard out removes it.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct CustomerLocks {
    global: RwLock<()>,
    customers: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held while an Append runs
pub struct AppendGuard<'a> {
    locks: &'a CustomerLocks,
    customer: Option<OwnedMutexGuard<()>>,
    _shared: RwLockReadGuard<'a, ()>,
}

impl Drop for AppendGuard<'_> {
    fn drop(&mut self) {
        self.customer.take();
        // Entries still referenced belong to a holder or a waiter. This also
        // sweeps entries left by waiters that were cancelled.
        self.locks
            .customers
            .lock()
            .retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }
}

impl CustomerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn customer_mutex(&self, customer: &str) -> Arc<AsyncMutex<()>> {
        self.customers
            .lock()
            .entry(customer.to_string())
            .or_default()
            .clone()
    }

    /// Shared access for a read
    pub async fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.global.read().await
    }

    /// Shared global access plus exclusive access to `customer`
    pub async fn append(&self, customer: &str) -> AppendGuard<'_> {
        let shared = self.global.read().await;
        let customer = self.customer_mutex(customer).lock_owned().await;
        AppendGuard {
            locks: self,
            customer: Some(customer),
            _shared: shared,
        }
    }

    /// Exclusive access to everything
    ///
    /// Per-customer entries are dropped while the guard is held since no
    /// other request can be holding one.
    pub async fn reset(&self) -> RwLockWriteGuard<'_, ()> {
        let guard = self.global.write().await;
        self.customers.lock().clear();
        guard
    }

    /// Number of customers with a lock entry
    pub fn tracked(&self) -> usize {
        self.customers.lock().len()
    }
}
