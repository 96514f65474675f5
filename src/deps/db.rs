//! Scoped database handle.
//!
//! The "connection" is a placeholder value; what matters is the lifecycle.
//! [`DbPool::acquire`] opens a handle and the returned [`DbHandle`] releases it
//! in `Drop`, so release runs on every exit path of the consumer: normal
//! return, early `?` return, or unwinding panic. Release runs exactly once per
//! acquisition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::metrics;

#[derive(Debug, Default)]
struct Counters {
    opened: AtomicU64,
    closed: AtomicU64,
}

/// Hands out scoped database handles.
#[derive(Debug, Clone)]
pub struct DbPool {
    connection: Arc<str>,
    counters: Arc<Counters>,
}

/// Snapshot of handle lifecycle counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    /// Handles acquired so far.
    pub opened: u64,
    /// Handles released so far.
    pub closed: u64,
}

impl DbStats {
    /// Handles currently held.
    pub fn in_use(&self) -> u64 {
        self.opened.saturating_sub(self.closed)
    }
}

impl DbPool {
    /// Create a pool that hands out `connection` as its handle value.
    pub fn new(connection: impl Into<String>) -> Self {
        let connection: String = connection.into();
        Self {
            connection: Arc::from(connection),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Open a handle. It is released when the returned guard is dropped.
    pub fn acquire(&self) -> DbHandle {
        let id = self.counters.opened.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::inc_db_handles_opened();
        info!(handle = id, "open");

        DbHandle {
            id,
            connection: Arc::clone(&self.connection),
            counters: Arc::clone(&self.counters),
        }
    }

    /// Current lifecycle counts.
    pub fn stats(&self) -> DbStats {
        DbStats {
            opened: self.counters.opened.load(Ordering::SeqCst),
            closed: self.counters.closed.load(Ordering::SeqCst),
        }
    }
}

/// An open database handle.
#[derive(Debug)]
pub struct DbHandle {
    id: u64,
    connection: Arc<str>,
    counters: Arc<Counters>,
}

impl DbHandle {
    /// The connection value this handle wraps.
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Sequence number of this handle within its pool.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for DbHandle {
    fn drop(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        metrics::inc_db_handles_closed();
        info!(handle = self.id, panicking = std::thread::panicking(), "close");
    }
}
