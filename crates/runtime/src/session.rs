//! Session handle and factory collaborator traits.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::caps::Capabilities;
use crate::error::Result;

/// Live automation session obtained from a [`SessionFactory`].
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Remote session identifier assigned by the endpoint.
    fn id(&self) -> &str;

    /// Soft-closes visible surfaces without terminating the session.
    async fn close(&self) -> Result<()>;

    /// Terminates the remote session.
    async fn quit(&self) -> Result<()>;

    /// Inner handle when this one decorates another.
    ///
    /// Wrapping layers (event listeners, reporters) implement this so that
    /// shutdown calls and session-id lookups reach the real session rather
    /// than being intercepted by the decorator.
    fn underlying(&self) -> Option<Arc<dyn SessionHandle>> {
        None
    }
}

impl fmt::Debug for dyn SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id())
            .finish()
    }
}

/// Drills through decorating layers to the innermost session handle.
pub fn innermost(handle: Arc<dyn SessionHandle>) -> Arc<dyn SessionHandle> {
    let mut current = handle;
    while let Some(inner) = current.underlying() {
        current = inner;
    }
    current
}

/// A provisioned session plus the capabilities the factory actually used.
///
/// The returned capabilities are recorded on the session's registry entry and
/// reused to build an equivalent session on restart.
pub struct CreatedSession {
    pub handle: Arc<dyn SessionHandle>,
    pub capabilities: Capabilities,
}

/// Builds sessions against a remote automation endpoint.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Provisions a new session.
    ///
    /// `capabilities` of `None` asks the factory for its defaults; `endpoint`
    /// overrides the factory's default remote endpoint when set. Failures are
    /// treated as transient by the pool and retried up to its configured
    /// attempt budget.
    async fn create(
        &self,
        name: &str,
        capabilities: Option<&Capabilities>,
        endpoint: Option<&str>,
    ) -> Result<CreatedSession>;
}
