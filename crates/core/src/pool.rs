//! The session pool: scope resolution, lookup surface and restart.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use gridpool_runtime::{
    Capabilities, DeviceHandle, Error, Result, SessionFactory, SessionHandle, SessionRecord,
    SessionRegistry, WorkerId, caps, innermost, is_null_device, null_device,
};

use crate::context::WorkerContext;
use crate::settings::PoolSettings;

/// Name a worker's primary session is registered under.
pub const DEFAULT_SESSION: &str = "default";

/// Pool of live automation sessions shared by a set of workers.
///
/// Constructed once per run and passed by reference to every worker. All
/// per-worker state lives in [`WorkerContext`]; the pool itself only holds
/// the shared registry, the factory and its settings.
pub struct SessionPool {
    registry: SessionRegistry,
    factory: Arc<dyn SessionFactory>,
    settings: PoolSettings,
}

impl SessionPool {
    /// Creates a pool around a session factory.
    pub fn new(factory: Arc<dyn SessionFactory>, settings: PoolSettings) -> Self {
        Self {
            registry: SessionRegistry::new(),
            factory,
            settings,
        }
    }

    /// Pool configuration.
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub(crate) fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub(crate) fn factory(&self) -> &Arc<dyn SessionFactory> {
        &self.factory
    }

    /// Returns the worker's default session, creating it on first use.
    pub async fn session(&self, ctx: &WorkerContext) -> Result<Arc<dyn SessionHandle>> {
        self.session_named(ctx, DEFAULT_SESSION).await
    }

    /// Returns the named session, creating it on first use with the worker's
    /// capabilities override when one is set.
    pub async fn session_named(
        &self,
        ctx: &WorkerContext,
        name: &str,
    ) -> Result<Arc<dyn SessionHandle>> {
        self.session_with(ctx, name, ctx.custom_capabilities(), None)
            .await
    }

    /// Returns the named session, creating it on first use with the given
    /// capabilities.
    pub async fn session_with_capabilities(
        &self,
        ctx: &WorkerContext,
        name: &str,
        capabilities: Option<Capabilities>,
    ) -> Result<Arc<dyn SessionHandle>> {
        self.session_with(ctx, name, capabilities, None).await
    }

    /// Returns the named session, creating it on first use with the given
    /// capabilities against an explicit remote endpoint.
    pub async fn session_with(
        &self,
        ctx: &WorkerContext,
        name: &str,
        capabilities: Option<Capabilities>,
        endpoint: Option<&str>,
    ) -> Result<Arc<dyn SessionHandle>> {
        if let Some(record) = self.visible_sessions(ctx).get(name) {
            if record.phase().is_global() {
                info!(name, "suite-level registered session will be returned");
            } else {
                debug!(name, phase = %record.phase(), "registered session will be returned");
            }
            return Ok(Arc::clone(record.handle()));
        }

        debug!(name, "nothing found in the pool, starting a new session");
        self.create_session(ctx, name, capabilities, endpoint).await
    }

    /// Finds a session by remote session id across every worker's records.
    ///
    /// Unlike the scoped lookups this searches all workers, which is what
    /// cross-worker consumers such as reporting callbacks need. Decorated
    /// handles are unwrapped before their ids are compared.
    pub fn session_by_id(&self, session_id: &str) -> Result<Arc<dyn SessionHandle>> {
        for record in self.registry.snapshot() {
            let real = innermost(Arc::clone(record.handle()));
            if real.id() == session_id {
                return Ok(Arc::clone(record.handle()));
            }
        }
        Err(Error::NotFound(format!("session id '{session_id}'")))
    }

    /// Finds the session bound to `device`, if any.
    pub fn session_for_device(
        &self,
        device: &Arc<dyn DeviceHandle>,
    ) -> Option<Arc<dyn SessionHandle>> {
        self.registry
            .snapshot()
            .iter()
            .find(|record| Arc::ptr_eq(record.device(), device))
            .map(|record| Arc::clone(record.handle()))
    }

    /// Returns true when `name` resolves within the calling worker's scope.
    pub fn is_registered(&self, ctx: &WorkerContext, name: &str) -> bool {
        self.visible_sessions(ctx).contains_key(name)
    }

    /// Sessions visible to the calling worker, indexed by name.
    ///
    /// A worker sees suite-level sessions plus its own. When a worker-owned
    /// session shares a name with a suite-level one, the worker-owned session
    /// shadows it; the tie-break is deterministic regardless of registration
    /// order.
    pub fn visible_sessions(&self, ctx: &WorkerContext) -> HashMap<String, Arc<SessionRecord>> {
        self.visible_to(ctx.id())
    }

    /// Computes the scope for a worker id from a fresh registry snapshot.
    pub(crate) fn visible_to(&self, worker: WorkerId) -> HashMap<String, Arc<SessionRecord>> {
        let mut visible: HashMap<String, Arc<SessionRecord>> = HashMap::new();
        for record in self.registry.snapshot() {
            if record.owner() == worker {
                visible.insert(record.name().to_string(), record);
            } else if record.phase().is_global() {
                visible.entry(record.name().to_string()).or_insert(record);
            }
        }
        visible
    }

    /// Restarts the worker's default session from its original capabilities.
    pub async fn restart(&self, ctx: &WorkerContext) -> Result<Arc<dyn SessionHandle>> {
        self.restart_with(ctx, false, None).await
    }

    /// Restarts the default session pinned to the same physical device.
    pub async fn restart_on_same_device(
        &self,
        ctx: &WorkerContext,
    ) -> Result<Arc<dyn SessionHandle>> {
        self.restart_with(ctx, true, None).await
    }

    /// Restarts the default session, optionally pinning it to its current
    /// device and layering extra capabilities over the original ones.
    pub async fn restart_with(
        &self,
        ctx: &WorkerContext,
        same_device: bool,
        extra: Option<Capabilities>,
    ) -> Result<Arc<dyn SessionHandle>> {
        let handle = self.session(ctx).await?;

        let mut overrides = Capabilities::new();
        if same_device {
            // The identity must be read before teardown disconnects the device.
            let device = self.device_for_handle(&handle);
            debug!(udid = device.udid(), "pinning restarted session to its device");
            overrides.insert(caps::UDID, device.udid());
        }
        if let Some(extra) = extra {
            overrides = overrides.merge(&extra);
        }

        let mut capabilities = None;
        for record in self.registry.snapshot() {
            if handles_match(record.handle(), &handle) {
                capabilities = Some(record.original_capabilities().clone().merge(&overrides));
                self.quit_record(&record).await;
                self.registry.remove(&record);
                break;
            }
        }

        // No matching record: recreate from the overrides alone.
        let capabilities = capabilities.unwrap_or(overrides);
        self.create_session(ctx, DEFAULT_SESSION, Some(capabilities), None)
            .await
    }

    // ------------------------ device surface ------------------------

    /// Device bound to the worker's default session; the null device when the
    /// default session does not exist.
    pub fn device(&self, ctx: &WorkerContext) -> Arc<dyn DeviceHandle> {
        self.device_named(ctx, DEFAULT_SESSION)
    }

    /// Device bound to a named session; the null device when the name is not
    /// registered. Never an error, so callers can read device fields without
    /// guarding.
    pub fn device_named(&self, ctx: &WorkerContext, name: &str) -> Arc<dyn DeviceHandle> {
        match self.visible_sessions(ctx).get(name) {
            Some(record) => Arc::clone(record.device()),
            None => null_device(),
        }
    }

    /// Device bound to a live handle; the null device when no record matches.
    pub fn device_for_handle(&self, handle: &Arc<dyn SessionHandle>) -> Arc<dyn DeviceHandle> {
        for record in self.registry.snapshot() {
            if handles_match(record.handle(), handle) {
                return Arc::clone(record.device());
            }
        }
        null_device()
    }

    /// Registers `device` as the worker's current device, connecting its
    /// remote channel when the pool is configured to do so.
    ///
    /// The next session this worker creates is bound to the device. Other
    /// workers are unaffected.
    pub async fn register_device(
        &self,
        ctx: &WorkerContext,
        device: Arc<dyn DeviceHandle>,
    ) -> Result<Arc<dyn DeviceHandle>> {
        debug!(worker = %ctx.id(), device = device.name(), "registering current device");
        ctx.set_current_device(Arc::clone(&device));
        if self.settings.connect_device_on_register {
            device.connect().await?;
        }
        Ok(device)
    }

    /// Most recently registered device for the worker; the null device when
    /// none was registered.
    #[deprecated(note = "read the session's device via `device`/`device_named` instead")]
    pub fn last_registered_device(&self, ctx: &WorkerContext) -> Arc<dyn DeviceHandle> {
        match ctx.current_device() {
            Some(device) => {
                if device.name().is_empty() {
                    debug!(worker = %ctx.id(), "current device has no name");
                }
                device
            }
            None => null_device(),
        }
    }

    /// Returns true when the worker has registered a real (non-null) device.
    pub fn is_device_registered(&self, ctx: &WorkerContext) -> bool {
        ctx.current_device()
            .is_some_and(|device| !is_null_device(&device))
    }
}

/// Returns true when both handles resolve to the same innermost session.
pub(crate) fn handles_match(a: &Arc<dyn SessionHandle>, b: &Arc<dyn SessionHandle>) -> bool {
    Arc::ptr_eq(&innermost(Arc::clone(a)), &innermost(Arc::clone(b)))
}
