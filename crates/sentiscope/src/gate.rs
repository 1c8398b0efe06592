//! Write-once readiness slots
//!
//! Each startup resource (corpus, classifier) lives in a [`ReadyGate`]. The
//! analyze action reads gates without blocking; the batch mode awaits them.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Current state of a gate
pub enum GateState<T: ?Sized> {
    Pending,
    Ready(Arc<T>),
    Failed(Arc<str>),
}

impl<T: ?Sized> Clone for GateState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Pending => Self::Pending,
            Self::Ready(value) => Self::Ready(value.clone()),
            Self::Failed(reason) => Self::Failed(reason.clone()),
        }
    }
}

impl<T: ?Sized> GateState<T> {
    fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

impl<T: ?Sized> fmt::Debug for GateState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "Failed({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

/// A resource that becomes available once, or fails to
pub struct ReadyGate<T: ?Sized> {
    tx: watch::Sender<GateState<T>>,
}

impl<T: ?Sized + Send + Sync> ReadyGate<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(GateState::Pending);
        Self { tx }
    }

    /// Make the value available. Returns false if the gate was already settled.
    pub fn open(&self, value: Arc<T>) -> bool {
        self.settle(GateState::Ready(value))
    }

    /// Record that the value will never become available
    pub fn fail(&self, reason: impl Into<Arc<str>>) -> bool {
        self.settle(GateState::Failed(reason.into()))
    }

    fn settle(&self, next: GateState<T>) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_settled() {
                return false;
            }
            *state = next;
            true
        })
    }

    /// The value, if the gate is open
    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.tx.borrow() {
            GateState::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn state(&self) -> GateState<T> {
        self.tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.tx.borrow(), GateState::Ready(_))
    }

    /// Wait until the gate settles
    pub async fn wait(&self) -> Result<Arc<T>, Arc<str>> {
        let mut rx = self.tx.subscribe();
        let state = match rx.wait_for(GateState::is_settled).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here
            Err(_) => GateState::Failed(Arc::from("readiness channel closed")),
        };

        match state {
            GateState::Ready(value) => Ok(value),
            GateState::Failed(reason) => Err(reason),
            GateState::Pending => Err(Arc::from("readiness channel closed")),
        }
    }
}

impl<T: ?Sized + Send + Sync> Default for ReadyGate<T> {
    fn default() -> Self {
        Self::new()
    }
}
