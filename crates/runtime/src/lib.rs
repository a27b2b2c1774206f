//! gridpool runtime - session lifecycle primitives and the shared registry
//!
//! This crate provides the low-level building blocks the pool is assembled
//! from:
//!
//! - **Collaborator traits**: the session factory, session handles (with an
//!   explicit decorator-unwrap capability), and device handles
//! - **Session records**: immutable bindings of a live session to its name,
//!   device, lifecycle phase and owning worker
//! - **Registry**: a concurrency-safe record set shared by all workers
//! - **Value types**: capability maps, lifecycle phases, worker identities,
//!   and the error taxonomy
//!
//! The crate never provisions or drives sessions itself; everything that
//! talks to a remote endpoint is behind [`SessionFactory`], [`SessionHandle`]
//! and [`DeviceHandle`], so the pool logic in `gridpool` stays independent of
//! any concrete automation protocol.

pub mod caps;
pub mod device;
pub mod error;
pub mod phase;
pub mod registry;
pub mod session;
pub mod worker;

// Re-export key types at crate root
pub use caps::Capabilities;
pub use device::{DeviceHandle, is_null_device, null_device};
pub use error::{Error, Result};
pub use phase::Phase;
pub use registry::{SessionRecord, SessionRegistry};
pub use session::{CreatedSession, SessionFactory, SessionHandle, innermost};
pub use worker::WorkerId;
