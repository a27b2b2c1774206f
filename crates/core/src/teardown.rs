//! Best-effort session teardown.

use std::sync::Arc;

use tracing::{debug, error, warn};

use gridpool_runtime::{Error, Phase, Result, SessionRecord, innermost};

use crate::context::WorkerContext;
use crate::pool::{DEFAULT_SESSION, SessionPool};

impl SessionPool {
    /// Quits the worker's default session and removes it from the registry.
    pub async fn quit(&self, ctx: &WorkerContext) -> Result<()> {
        self.quit_named(ctx, DEFAULT_SESSION).await
    }

    /// Quits the named session visible to the worker (its own or a
    /// suite-level one) and removes it from the registry.
    pub async fn quit_named(&self, ctx: &WorkerContext, name: &str) -> Result<()> {
        let target = self.registry().snapshot().into_iter().find(|record| {
            record.name() == name && (record.phase().is_global() || record.owner() == ctx.id())
        });
        let Some(record) = target else {
            return Err(Error::NotFound(format!("session '{name}'")));
        };

        self.quit_record(&record).await;
        self.registry().remove(&record);
        Ok(())
    }

    /// Quits every session owned by the worker whose phase is in `phases`.
    ///
    /// [`Phase::All`] widens the sweep to every record regardless of owner.
    /// Torn-down records are removed from the registry in one pass at the
    /// end, and the worker's capabilities override is cleared.
    pub async fn quit_phases(&self, ctx: &WorkerContext, phases: &[Phase]) {
        let wildcard = phases.iter().any(|phase| phase.is_wildcard());
        let mut finished = Vec::new();
        for record in self.registry().snapshot() {
            if wildcard || (phases.contains(&record.phase()) && record.owner() == ctx.id()) {
                self.quit_record(&record).await;
                finished.push(record);
            }
        }
        self.registry().remove_all(&finished);
        ctx.clear_custom_capabilities();
    }

    /// Shuts one session down without touching the registry.
    ///
    /// Every step is fault tolerant: a failing device disconnect, a shutdown
    /// error or a timeout is logged and swallowed, and control always returns
    /// to the caller. Registry removal is the caller's job so batch sweeps
    /// can remove many records in one pass after sequential teardown.
    pub(crate) async fn quit_record(&self, record: &SessionRecord) {
        if let Err(err) = record.device().disconnect().await {
            warn!(
                device = record.device().name(),
                error = %err,
                "device disconnect failed during teardown"
            );
        }

        debug!(name = record.name(), "session shutdown start");
        // Shutdown goes to the innermost handle so a decorating layer cannot
        // intercept or lose the quit.
        let handle = innermost(Arc::clone(record.handle()));
        let close_before_quit = self.settings().close_before_quit;
        let timeout = self.settings().close_timeout;

        let shutdown = async {
            if close_before_quit {
                debug!(name = record.name(), "soft close before quit");
                handle.close().await?;
            }
            handle.quit().await
        };

        match tokio::time::timeout(timeout, shutdown).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) if err.is_remote() => {
                // The remote side usually terminated the session already.
                debug!(
                    name = record.name(),
                    error = %err,
                    "remote error during session shutdown"
                );
            }
            Ok(Err(err)) => {
                error!(
                    name = record.name(),
                    error = %err,
                    "unexpected error during session shutdown"
                );
            }
            Err(_) => {
                error!(
                    name = record.name(),
                    timeout_secs = timeout.as_secs(),
                    "session did not shut down within the timeout"
                );
            }
        }
        debug!(name = record.name(), "session shutdown finished");
    }
}
