//! Session records and the shared registry.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::caps::Capabilities;
use crate::device::DeviceHandle;
use crate::phase::Phase;
use crate::session::SessionHandle;
use crate::worker::WorkerId;

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable binding of a live session to its name, device, phase and owner.
///
/// A record never changes after construction; only its membership in the
/// [`SessionRegistry`] does.
pub struct SessionRecord {
    id: u64,
    name: String,
    handle: Arc<dyn SessionHandle>,
    device: Arc<dyn DeviceHandle>,
    phase: Phase,
    owner: WorkerId,
    original_capabilities: Capabilities,
}

impl SessionRecord {
    /// Binds a freshly provisioned session to its creation context.
    pub fn new(
        name: impl Into<String>,
        handle: Arc<dyn SessionHandle>,
        device: Arc<dyn DeviceHandle>,
        phase: Phase,
        owner: WorkerId,
        original_capabilities: Capabilities,
    ) -> Self {
        Self {
            id: NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            handle,
            device,
            phase,
            owner,
            original_capabilities,
        }
    }

    /// Logical session name, unique within its owner's scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The live session handle.
    pub fn handle(&self) -> &Arc<dyn SessionHandle> {
        &self.handle
    }

    /// Device the session runs on; the null-device sentinel when unbound.
    pub fn device(&self) -> &Arc<dyn DeviceHandle> {
        &self.device
    }

    /// Lifecycle phase the session was created in.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Worker that created the session. Only meaningful for non-global
    /// phases; suite-level sessions are shared regardless of owner.
    pub fn owner(&self) -> WorkerId {
        self.owner
    }

    /// Capabilities the session was created with, used to rebuild an
    /// equivalent session on restart.
    pub fn original_capabilities(&self) -> &Capabilities {
        &self.original_capabilities
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("name", &self.name)
            .field("session_id", &self.handle.id())
            .field("phase", &self.phase)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Concurrency-safe set of live session records.
///
/// Insertion, removal and snapshotting are safe from any number of workers
/// without external locking. Name uniqueness within a scope is enforced
/// upstream by the creation pipeline, not here.
#[derive(Default)]
pub struct SessionRegistry {
    records: DashMap<u64, Arc<SessionRecord>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record.
    pub fn insert(&self, record: Arc<SessionRecord>) {
        self.records.insert(record.id, record);
    }

    /// Removes a single record.
    pub fn remove(&self, record: &SessionRecord) {
        self.records.remove(&record.id);
    }

    /// Removes a batch of records in one pass.
    pub fn remove_all<'a>(&self, records: impl IntoIterator<Item = &'a Arc<SessionRecord>>) {
        for record in records {
            self.records.remove(&record.id);
        }
    }

    /// Copies the current membership into an iterable snapshot.
    ///
    /// The snapshot is decoupled from the registry: concurrent inserts and
    /// removals never invalidate it.
    pub fn snapshot(&self) -> Vec<Arc<SessionRecord>> {
        self.records
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no record is registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
