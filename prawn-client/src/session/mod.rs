//! Customer session lifecycle
//!
//! A session is created by the entry form, re-validated on every
//! protected-page activation, and ends in exactly one of two ways:
//! checkout completion or TTL eviction. Eviction is a normal terminal
//! transition, never an error.
//!
//! The manager owns at most one pending eviction task at a time. The task
//! is cancellable and is cancelled by every path that ends or suspends
//! the session (deactivation, checkout, re-activation, drop); an
//! uncancelled timer could fire against a page that has already navigated
//! away.

pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use shared::models::{Session, SessionError};
use shared::util::now_millis;

use self::storage::{SessionStore, StorageError};

/// Canonical session time-to-live
pub const SESSION_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Error)]
pub enum SessionManagerError {
    #[error(transparent)]
    Invalid(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Why the caller should route back to the entry flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NoSession,
    Expired,
}

/// Outcome of a protected-page activation
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Session is live; an eviction task is scheduled for `remaining`
    Active {
        session: Session,
        remaining: Duration,
    },
    RedirectToEntry(RedirectReason),
}

/// Published when the TTL fires (or an expired session is found on
/// activation) and the session is evicted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionNotice {
    pub restaurant_id: i64,
}

struct EvictionTask {
    cancel: CancellationToken,
    _handle: JoinHandle<()>,
}

/// Owns the persisted session, its TTL and the eviction timer
pub struct SessionManager<S: SessionStore> {
    storage: Arc<S>,
    ttl: Duration,
    evicted_tx: broadcast::Sender<EvictionNotice>,
    pending: Option<EvictionTask>,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(storage: S) -> Self {
        Self::with_ttl(storage, SESSION_TTL)
    }

    pub fn with_ttl(storage: S, ttl: Duration) -> Self {
        let (evicted_tx, _) = broadcast::channel(8);
        Self {
            storage: Arc::new(storage),
            ttl,
            evicted_tx,
            pending: None,
        }
    }

    /// Storage handle, shared with the cart engine
    pub fn storage(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Notifications for TTL evictions; the embedding UI redirects on them
    pub fn subscribe_evictions(&self) -> broadcast::Receiver<EvictionNotice> {
        self.evicted_tx.subscribe()
    }

    /// Entry-form submission: validate and persist a fresh session.
    ///
    /// On validation failure nothing is persisted.
    pub fn begin(
        &self,
        name: &str,
        phone: &str,
        restaurant_id: i64,
    ) -> Result<Session, SessionManagerError> {
        let session = Session::create(name, phone, restaurant_id)?;
        self.storage.save_session(&session)?;
        tracing::info!(restaurant_id, "Session started");
        Ok(session)
    }

    /// Protected-page activation check.
    ///
    /// Reads the persisted session; absent or expired sessions redirect
    /// (expired ones are evicted first). A live session reschedules the
    /// single eviction task for the remaining TTL.
    pub fn activate(&mut self) -> Result<Activation, SessionManagerError> {
        let Some(session) = self.storage.load_session()? else {
            return Ok(Activation::RedirectToEntry(RedirectReason::NoSession));
        };

        let now = now_millis();
        if session.is_expired(now, self.ttl) {
            self.evict(&session);
            return Ok(Activation::RedirectToEntry(RedirectReason::Expired));
        }

        let remaining = session.remaining(now, self.ttl);
        self.schedule_eviction(&session, remaining);
        Ok(Activation::Active { session, remaining })
    }

    /// Cancel the pending eviction task (page deactivated).
    ///
    /// The persisted session stays; the next activation re-checks it.
    pub fn deactivate(&mut self) {
        self.cancel_pending();
    }

    /// Normal end of life (checkout completed): cancel the timer and clear
    /// session + cart. No eviction notice; this is not an eviction.
    pub fn end(&mut self) -> Result<(), StorageError> {
        self.cancel_pending();
        self.storage.clear()
    }

    pub fn has_pending_eviction(&self) -> bool {
        self.pending.is_some()
    }

    fn evict(&mut self, session: &Session) {
        self.cancel_pending();
        if let Err(e) = self.storage.clear() {
            tracing::error!(error = %e, "Failed to clear expired session");
        }
        tracing::info!(restaurant_id = session.restaurant_id, "Session evicted");
        let _ = self.evicted_tx.send(EvictionNotice {
            restaurant_id: session.restaurant_id,
        });
    }

    fn schedule_eviction(&mut self, session: &Session, remaining: Duration) {
        self.cancel_pending();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let storage = Arc::clone(&self.storage);
        let tx = self.evicted_tx.clone();
        let notice = EvictionNotice {
            restaurant_id: session.restaurant_id,
        };

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(remaining) => {
                    if let Err(e) = storage.clear() {
                        tracing::error!(error = %e, "Failed to clear expired session");
                    }
                    tracing::info!("Session TTL elapsed, evicted");
                    let _ = tx.send(notice);
                }
            }
        });

        self.pending = Some(EvictionTask {
            cancel,
            _handle: handle,
        });
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel.cancel();
        }
    }
}

impl<S: SessionStore> Drop for SessionManager<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
