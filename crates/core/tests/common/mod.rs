#![allow(dead_code)]
//! Shared mock collaborators for pool integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use gridpool::{
    Capabilities, CreatedSession, DeviceHandle, Error, Result, SessionFactory, SessionHandle,
};

/// How a mock session behaves when the pool shuts it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitBehavior {
    Clean,
    RemoteError,
    TransportError,
    Hang,
}

pub struct MockSession {
    id: String,
    behavior: QuitBehavior,
    pub close_calls: AtomicU32,
    pub quit_calls: AtomicU32,
}

impl MockSession {
    pub fn new(id: impl Into<String>, behavior: QuitBehavior) -> Self {
        Self {
            id: id.into(),
            behavior,
            close_calls: AtomicU32::new(0),
            quit_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl SessionHandle for MockSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.quit_calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            QuitBehavior::Clean => Ok(()),
            QuitBehavior::RemoteError => Err(Error::Remote("invalid session id".to_string())),
            QuitBehavior::TransportError => Err(Error::Transport("broken pipe".to_string())),
            QuitBehavior::Hang => std::future::pending::<Result<()>>().await,
        }
    }
}

/// Decorator standing in for an event-listener wrapper around a session.
pub struct ListenerSession {
    inner: Arc<MockSession>,
    pub close_calls: AtomicU32,
    pub quit_calls: AtomicU32,
}

impl ListenerSession {
    pub fn new(inner: Arc<MockSession>) -> Self {
        Self {
            inner,
            close_calls: AtomicU32::new(0),
            quit_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl SessionHandle for ListenerSession {
    fn id(&self) -> &str {
        "listener-wrapper"
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.close().await
    }

    async fn quit(&self) -> Result<()> {
        self.quit_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.quit().await
    }

    fn underlying(&self) -> Option<Arc<dyn SessionHandle>> {
        Some(Arc::clone(&self.inner) as Arc<dyn SessionHandle>)
    }
}

pub struct MockDevice {
    name: String,
    udid: String,
    pub connect_calls: AtomicU32,
    pub disconnect_calls: AtomicU32,
}

impl MockDevice {
    pub fn new(name: impl Into<String>, udid: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            udid: udid.into(),
            connect_calls: AtomicU32::new(0),
            disconnect_calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl DeviceHandle for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn udid(&self) -> &str {
        &self.udid
    }

    async fn connect(&self) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Scripted session factory: fails a configured number of times, then
/// produces mock sessions, optionally wrapped in a decorator.
pub struct MockFactory {
    failures_left: AtomicU32,
    quit_behavior: QuitBehavior,
    wrap: bool,
    pub calls: AtomicU32,
    pub created: Mutex<Vec<Arc<MockSession>>>,
    pub wrappers: Mutex<Vec<Arc<ListenerSession>>>,
    pub last_capabilities: Mutex<Option<Capabilities>>,
}

impl MockFactory {
    pub fn new() -> Arc<Self> {
        Self::build(0, QuitBehavior::Clean, false)
    }

    pub fn failing(failures: u32) -> Arc<Self> {
        Self::build(failures, QuitBehavior::Clean, false)
    }

    pub fn with_quit_behavior(behavior: QuitBehavior) -> Arc<Self> {
        Self::build(0, behavior, false)
    }

    pub fn wrapping() -> Arc<Self> {
        Self::build(0, QuitBehavior::Clean, true)
    }

    fn build(failures: u32, quit_behavior: QuitBehavior, wrap: bool) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicU32::new(failures),
            quit_behavior,
            wrap,
            calls: AtomicU32::new(0),
            created: Mutex::new(Vec::new()),
            wrappers: Mutex::new(Vec::new()),
            last_capabilities: Mutex::new(None),
        })
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn create(
        &self,
        name: &str,
        capabilities: Option<&Capabilities>,
        _endpoint: Option<&str>,
    ) -> Result<CreatedSession> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_capabilities.lock() = capabilities.cloned();

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(Error::Transport(format!(
                "connection refused on attempt {call}"
            )));
        }

        let inner = Arc::new(MockSession::new(
            format!("{name}-session-{call}"),
            self.quit_behavior,
        ));
        self.created.lock().push(Arc::clone(&inner));

        let handle: Arc<dyn SessionHandle> = if self.wrap {
            let wrapper = Arc::new(ListenerSession::new(Arc::clone(&inner)));
            self.wrappers.lock().push(Arc::clone(&wrapper));
            wrapper
        } else {
            inner
        };

        Ok(CreatedSession {
            handle,
            capabilities: capabilities.cloned().unwrap_or_default(),
        })
    }
}
