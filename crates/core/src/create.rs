//! Bounded-retry session creation.

use std::sync::Arc;

use tracing::{debug, warn};

use gridpool_runtime::{Capabilities, Error, Result, SessionHandle, SessionRecord, null_device};

use crate::context::WorkerContext;
use crate::pool::SessionPool;

/// Result of one provisioning attempt.
enum AttemptOutcome {
    Created(Arc<SessionRecord>),
    Retry(Error),
}

impl SessionPool {
    /// Provisions a session and registers it, retrying transient factory
    /// failures up to the configured attempt budget.
    ///
    /// Capacity and duplicate-name violations are caller errors: they fail
    /// immediately, are never retried, and are checked before the factory is
    /// invoked so a rejected request cannot leak a provisioned session.
    pub(crate) async fn create_session(
        &self,
        ctx: &WorkerContext,
        name: &str,
        capabilities: Option<Capabilities>,
        endpoint: Option<&str>,
    ) -> Result<Arc<dyn SessionHandle>> {
        // One attempt by default; init_retry_count adds more.
        let max_attempts = self.settings().init_retry_count.saturating_add(1);

        for attempt in 1..=max_attempts {
            self.check_scope(ctx, name)?;

            match self.attempt(ctx, name, capabilities.as_ref(), endpoint).await {
                AttemptOutcome::Created(record) => {
                    let handle = Arc::clone(record.handle());
                    self.registry().insert(record);
                    debug!(name, worker = %ctx.id(), "session initialization finished");
                    return Ok(handle);
                }
                AttemptOutcome::Retry(err) => {
                    self.disconnect_current_device(ctx).await;
                    if attempt == max_attempts {
                        return Err(Error::InitFailed {
                            name: name.to_string(),
                            attempts: max_attempts,
                            source: Box::new(err),
                        });
                    }
                    // Intermediate failures stay terse; only the final one
                    // surfaces with its full cause chain.
                    warn!(
                        name,
                        attempt,
                        max_attempts,
                        error = %err,
                        "session initialization failed, retrying"
                    );
                    tokio::time::sleep(self.settings().init_retry_interval).await;
                }
            }
        }

        Err(Error::Internal(
            "session creation loop exited without a handle or an error".to_string(),
        ))
    }

    /// Capacity and duplicate-name preconditions for the worker's scope.
    fn check_scope(&self, ctx: &WorkerContext, name: &str) -> Result<()> {
        let scope = self.visible_to(ctx.id());
        if scope.len() >= self.settings().max_session_count {
            return Err(Error::PoolExhausted {
                max: self.settings().max_session_count,
            });
        }
        if scope.contains_key(name) {
            return Err(Error::DuplicateName {
                name: name.to_string(),
                worker: ctx.id(),
            });
        }
        Ok(())
    }

    /// Runs a single factory call and binds the result to a record.
    async fn attempt(
        &self,
        ctx: &WorkerContext,
        name: &str,
        capabilities: Option<&Capabilities>,
        endpoint: Option<&str>,
    ) -> AttemptOutcome {
        debug!(name, worker = %ctx.id(), "session initialization start");
        match self.factory().create(name, capabilities, endpoint).await {
            Ok(created) => {
                let device = ctx.current_device().unwrap_or_else(null_device);
                let record = SessionRecord::new(
                    name,
                    created.handle,
                    device,
                    ctx.phase(),
                    ctx.id(),
                    created.capabilities,
                );
                AttemptOutcome::Created(Arc::new(record))
            }
            Err(err) => AttemptOutcome::Retry(err),
        }
    }

    /// Best-effort disconnect of the worker's tentatively attached device
    /// after a failed attempt.
    async fn disconnect_current_device(&self, ctx: &WorkerContext) {
        if let Some(device) = ctx.current_device() {
            if let Err(err) = device.disconnect().await {
                debug!(
                    device = device.name(),
                    error = %err,
                    "device disconnect failed after init failure"
                );
            }
        }
    }
}
