//! Checkout accounting for a pooled handle
//!
//! The driver's pool enforces the connection limit. These counters only
//! observe it: a guard is taken while a caller waits for a connection and
//! another while it holds one, and both are dropped on every exit path.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Snapshot of a handle's checkout counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Connection limit configured on the pool
    max_size: usize,
    /// Connections currently checked out
    active: usize,
    /// Callers currently waiting for a connection
    waiting: usize,
    /// Highest `active` seen since the handle was created
    peak_active: usize,
    /// Successful checkouts since the handle was created
    acquired: u64,
    /// Connections handed back since the handle was created
    released: u64,
}

impl PoolStats {
    /// Get the configured connection limit
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get the number of checked-out connections
    pub fn active(&self) -> usize {
        self.active
    }

    /// Get the number of waiting callers
    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Get the highest number of simultaneously checked-out connections
    pub fn peak_active(&self) -> usize {
        self.peak_active
    }

    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    pub fn released(&self) -> u64 {
        self.released
    }

    /// Calculate utilization of the connection limit (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.active as f64 / self.max_size as f64
        }
    }

    /// Check if every allowed connection is checked out
    pub fn is_full(&self) -> bool {
        self.max_size > 0 && self.active >= self.max_size
    }
}

#[derive(Debug)]
pub(crate) struct CheckoutCounters {
    max_size: usize,
    active: AtomicUsize,
    waiting: AtomicUsize,
    peak_active: AtomicUsize,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl CheckoutCounters {
    pub(crate) fn new(max_size: usize) -> Arc<Self> {
        Arc::new(Self {
            max_size,
            active: AtomicUsize::new(0),
            waiting: AtomicUsize::new(0),
            peak_active: AtomicUsize::new(0),
            acquired: AtomicU64::new(0),
            released: AtomicU64::new(0),
        })
    }

    /// Mark a caller as waiting until the guard drops
    pub(crate) fn wait(self: &Arc<Self>) -> CounterGuard {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        CounterGuard {
            counters: Arc::clone(self),
            kind: CounterKind::Waiting,
        }
    }

    /// Mark a connection as checked out until the guard drops
    pub(crate) fn checkout(self: &Arc<Self>) -> CounterGuard {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(active, Ordering::SeqCst);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        CounterGuard {
            counters: Arc::clone(self),
            kind: CounterKind::Active,
        }
    }

    pub(crate) fn snapshot(&self) -> PoolStats {
        PoolStats {
            max_size: self.max_size,
            active: self.active.load(Ordering::SeqCst),
            waiting: self.waiting.load(Ordering::SeqCst),
            peak_active: self.peak_active.load(Ordering::SeqCst),
            acquired: self.acquired.load(Ordering::SeqCst),
            released: self.released.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CounterKind {
    Waiting,
    Active,
}

/// Decrements its counter when dropped
#[derive(Debug)]
pub(crate) struct CounterGuard {
    counters: Arc<CheckoutCounters>,
    kind: CounterKind,
}

impl Drop for CounterGuard {
    fn drop(&mut self) {
        match self.kind {
            CounterKind::Waiting => {
                self.counters.waiting.fetch_sub(1, Ordering::SeqCst);
            }
            CounterKind::Active => {
                self.counters.active.fetch_sub(1, Ordering::SeqCst);
                self.counters.released.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
