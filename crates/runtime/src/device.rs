//! Physical device collaborators.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;

use crate::error::Result;

/// Handle to a physical or virtual device a session may be bound to.
///
/// Connection management is the embedder's concern; the pool only calls
/// [`connect`](DeviceHandle::connect) on registration (when configured) and
/// [`disconnect`](DeviceHandle::disconnect) during teardown and after failed
/// creation attempts.
#[async_trait]
pub trait DeviceHandle: Send + Sync {
    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Stable device identity (udid).
    fn udid(&self) -> &str;

    /// Establishes the remote control channel to the device.
    async fn connect(&self) -> Result<()>;

    /// Tears the remote control channel down.
    async fn disconnect(&self) -> Result<()>;
}

/// Placeholder standing in for "no device attached".
///
/// Distinct from an absent lookup result: getters return this sentinel so
/// callers never have to null-check a device before reading its fields.
struct NullDevice;

#[async_trait]
impl DeviceHandle for NullDevice {
    fn name(&self) -> &str {
        ""
    }

    fn udid(&self) -> &str {
        ""
    }

    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

static NULL_DEVICE: LazyLock<Arc<dyn DeviceHandle>> = LazyLock::new(|| Arc::new(NullDevice));

/// Returns the process-wide null-device sentinel.
pub fn null_device() -> Arc<dyn DeviceHandle> {
    Arc::clone(&NULL_DEVICE)
}

/// Returns true when `device` is the null-device sentinel.
pub fn is_null_device(device: &Arc<dyn DeviceHandle>) -> bool {
    Arc::ptr_eq(device, &NULL_DEVICE)
}
