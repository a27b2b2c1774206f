//! Worker identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one concurrent worker.
///
/// Identities are process-unique and never reused, so a record owned by a
/// finished worker can never be confused with a newer worker's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u64);

impl WorkerId {
    /// Allocates a fresh process-unique worker identity.
    pub fn next() -> Self {
        Self(NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}
