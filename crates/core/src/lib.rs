//! gridpool: a worker-scoped pool for remote automation sessions
//!
//! The pool hands concurrent test workers named sessions (browser or device
//! control channels) provisioned by an external factory. A worker asks for a
//! session by name and gets either the live one already bound to its scope or
//! a freshly created one; sessions created during suite setup are shared
//! across all workers, everything else stays private to its creator.
//!
//! What the pool owns:
//!
//! - the shared session registry and per-worker scope resolution
//! - bounded-retry creation against a per-scope capacity limit
//! - best-effort, timeout-bounded teardown (single, by name, or bulk by
//!   lifecycle phase)
//! - restart of the default session, optionally pinned to the same physical
//!   device
//! - the per-worker current-device and capabilities-override side channels
//!
//! Session construction, capability negotiation and device discovery are
//! collaborator concerns behind the `SessionFactory`, `SessionHandle` and
//! `DeviceHandle` traits from `gridpool-runtime`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gridpool::{Phase, PoolSettings, SessionPool, WorkerContext};
//!
//! let pool = Arc::new(SessionPool::new(factory, PoolSettings::default()));
//!
//! // One context per worker; the harness threads it through every call.
//! let ctx = WorkerContext::in_phase(Phase::BeforeMethod);
//! let session = pool.session(&ctx).await?;
//! // ... drive the session ...
//! ctx.set_phase(Phase::Method);
//! pool.quit_phases(&ctx, &[Phase::BeforeMethod, Phase::Method]).await;
//! ```

mod create;
mod teardown;

pub mod context;
pub mod pool;
pub mod settings;

pub use context::WorkerContext;
pub use pool::{DEFAULT_SESSION, SessionPool};
pub use settings::PoolSettings;

// Re-export the runtime primitives the API surfaces.
pub use gridpool_runtime::{
    Capabilities, CreatedSession, DeviceHandle, Error, Phase, Result, SessionFactory,
    SessionHandle, SessionRecord, WorkerId, caps, innermost, is_null_device, null_device,
};
