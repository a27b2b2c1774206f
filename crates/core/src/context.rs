//! Per-worker execution context.

use std::sync::Arc;

use parking_lot::RwLock;

use gridpool_runtime::{Capabilities, DeviceHandle, Phase, WorkerId};

/// Explicit per-worker state threaded through every pool call.
///
/// Each worker owns exactly one context and never shares it, so the slots
/// need no cross-worker coordination: another worker can neither observe nor
/// mutate them. The context replaces hidden thread-local state with a value
/// the harness passes around.
pub struct WorkerContext {
    id: WorkerId,
    phase: RwLock<Phase>,
    current_device: RwLock<Option<Arc<dyn DeviceHandle>>>,
    custom_capabilities: RwLock<Option<Capabilities>>,
}

impl WorkerContext {
    /// Creates a context for a new worker, starting in [`Phase::Method`].
    pub fn new() -> Self {
        Self::in_phase(Phase::Method)
    }

    /// Creates a context starting in the given phase.
    pub fn in_phase(phase: Phase) -> Self {
        Self {
            id: WorkerId::next(),
            phase: RwLock::new(phase),
            current_device: RwLock::new(None),
            custom_capabilities: RwLock::new(None),
        }
    }

    /// This worker's identity.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Lifecycle phase new sessions are tagged with.
    pub fn phase(&self) -> Phase {
        *self.phase.read()
    }

    /// Moves the worker to a new lifecycle phase.
    pub fn set_phase(&self, phase: Phase) {
        *self.phase.write() = phase;
    }

    /// Device most recently registered by this worker, if any.
    pub fn current_device(&self) -> Option<Arc<dyn DeviceHandle>> {
        self.current_device.read().clone()
    }

    pub(crate) fn set_current_device(&self, device: Arc<dyn DeviceHandle>) {
        *self.current_device.write() = Some(device);
    }

    /// Clears the current-device slot.
    ///
    /// Nothing depends on this being called, but long-lived workers should do
    /// so once a device is handed back.
    pub fn clear_current_device(&self) {
        *self.current_device.write() = None;
    }

    /// Capabilities override applied to default-capability lookups, if set.
    ///
    /// Reads do not consume the override; it stays active until cleared.
    pub fn custom_capabilities(&self) -> Option<Capabilities> {
        self.custom_capabilities.read().clone()
    }

    /// Sets the capabilities override for subsequent lookups.
    pub fn set_custom_capabilities(&self, capabilities: Capabilities) {
        *self.custom_capabilities.write() = Some(capabilities);
    }

    /// Drops the capabilities override.
    pub fn clear_custom_capabilities(&self) {
        *self.custom_capabilities.write() = None;
    }
}

impl Default for WorkerContext {
    fn default() -> Self {
        Self::new()
    }
}
