//! Session manager: owns the stored token's lifecycle and the proactive
//! refresh scheduler.
//!
//! One background task per manager recomputes the refresh schedule from the
//! stored token on every pass, so "cancel any pending timer, then rearm"
//! falls out of the loop structure: at most one timer can be pending. Both
//! the scheduler and the HTTP client's reactive 401 path refresh through
//! [`SessionManager::refresh_now`], which coalesces concurrent triggers into
//! a single network call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::auth::{endpoints, AuthError, AuthToken, TokenStore};
use crate::config::ClientConfig;
use crate::error::FlagdeckError;

use super::events::{SessionEvent, SessionEvents};
use super::policy::{self, RefreshDecision};

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer pending (no token, token not refreshable, or TTL too short
    /// for proactive refresh).
    Idle,
    /// A timer is armed; the refresh fires after `due_in`.
    Armed { due_in: StdDuration },
    /// A refresh call is in flight.
    Refreshing,
}

/// Manages the session token: sign-in/sign-out, proactive refresh, and the
/// session event bus.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use flagdeck::auth::FileTokenStore;
/// use flagdeck::config::ClientConfig;
/// use flagdeck::session::SessionManager;
///
/// # fn example() -> flagdeck::error::Result<()> {
/// let config = ClientConfig::new("https://api.flagdeck.example");
/// let manager = SessionManager::new(&config, Arc::new(FileTokenStore::new_default()))?;
/// manager.start();
/// # Ok(())
/// # }
/// ```
pub struct SessionManager {
    inner: Arc<SessionInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct SessionInner {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    events: SessionEvents,
    /// Single in-flight guard shared by the proactive and reactive paths.
    refresh_lock: tokio::sync::Mutex<()>,
    /// Bumped on every token replacement; lets a caller that waited on the
    /// guard detect that someone else already refreshed.
    generation: AtomicU64,
    state: Mutex<SchedulerState>,
}

impl SessionManager {
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, FlagdeckError> {
        Ok(Self::with_parts(
            config.base_url.clone(),
            config.build_http()?,
            store,
        ))
    }

    /// Assemble from explicit parts (custom HTTP client, test servers).
    pub fn with_parts(
        base_url: impl Into<String>,
        http: reqwest::Client,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                http,
                base_url: base_url.into(),
                store,
                events: SessionEvents::new(),
                refresh_lock: tokio::sync::Mutex::new(()),
                generation: AtomicU64::new(0),
                state: Mutex::new(SchedulerState::Idle),
            }),
            task: Mutex::new(None),
        }
    }

    /// The session event bus.
    pub fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Read the currently stored token.
    pub fn token(&self) -> Result<Option<AuthToken>, AuthError> {
        self.inner.store.load()
    }

    /// Current scheduler state.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.inner.state()
    }

    /// Start (or restart) the proactive refresh scheduler.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
        *task = Some(tokio::spawn(run_loop(self.inner.clone())));
    }

    /// Stop the scheduler. The stored token is left untouched.
    pub fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
        self.inner.set_state(SchedulerState::Idle);
    }

    /// Exchange credentials for a token, store it, and wake the scheduler.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        let token =
            endpoints::sign_in(&self.inner.http, &self.inner.base_url, email, password).await?;
        self.inner.store.save(&token)?;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.events.emit(SessionEvent::TokenRefreshed);
        Ok(token)
    }

    /// Destroy the stored token and signal consumers.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.store.clear()?;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.events.emit(SessionEvent::Unauthenticated);
        Ok(())
    }

    /// Tell the manager the stored token was replaced externally (another
    /// process wrote to the shared store). The scheduler recomputes its
    /// schedule against the new token.
    pub fn notify_token_changed(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.events.emit(SessionEvent::TokenChangedExternally);
    }

    /// Refresh the token now, coalescing with any refresh already in flight.
    ///
    /// On success the stored token is replaced wholesale and exactly one
    /// [`SessionEvent::TokenRefreshed`] is emitted. A 401/403 from the
    /// refresh endpoint ends the session: the token is cleared and exactly
    /// one [`SessionEvent::Unauthenticated`] is emitted. Transient failures
    /// emit nothing; the scheduler retries on its normal cadence.
    pub async fn refresh_now(&self) -> Result<AuthToken, AuthError> {
        self.inner.refresh_now().await
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}

impl SessionInner {
    fn state(&self) -> SchedulerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Compute the scheduling decision for the current token, or `None`
    /// when there is nothing to schedule (no token, not refreshable).
    fn decision(&self) -> Option<RefreshDecision> {
        let token = match self.store.load() {
            Ok(token) => token?,
            Err(err) => {
                tracing::warn!(error = %err, "token store read failed; scheduler idle");
                return None;
            }
        };
        if !token.is_refreshable() {
            return None;
        }
        let ttl = token.ttl(Utc::now())?;
        Some(policy::decide(ttl))
    }

    async fn refresh_now(&self) -> Result<AuthToken, AuthError> {
        let seen = self.generation.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;
        if self.generation.load(Ordering::Acquire) != seen {
            // Another caller replaced the token while we waited for the
            // guard; reuse it instead of issuing a second network call.
            if let Some(token) = self.store.load()? {
                return Ok(token);
            }
        }
        let current = self.store.load()?.ok_or(AuthError::NotSignedIn)?;
        let refresh_token = current.refresh_token.clone().ok_or(AuthError::NotSignedIn)?;

        let prior = self.state();
        self.set_state(SchedulerState::Refreshing);
        tracing::debug!("refreshing access token");
        match endpoints::refresh(&self.http, &self.base_url, &refresh_token).await {
            Ok(fresh) => {
                self.store.save(&fresh)?;
                self.generation.fetch_add(1, Ordering::AcqRel);
                self.events.emit(SessionEvent::TokenRefreshed);
                tracing::debug!("access token refreshed");
                Ok(fresh)
            }
            Err(err) => {
                if let AuthError::RefreshRejected { status } = &err {
                    tracing::warn!(status, "refresh rejected; ending session");
                    self.store.clear()?;
                    self.set_state(SchedulerState::Idle);
                    self.events.emit(SessionEvent::Unauthenticated);
                } else {
                    // A transient failure emits nothing, so nobody wakes the
                    // scheduler; put its observable state back as it was.
                    tracing::warn!(error = %err, "refresh failed; retrying on schedule");
                    self.set_state(prior);
                }
                Err(err)
            }
        }
    }
}

/// Scheduler loop. Each pass recomputes the schedule from the stored token;
/// any session event cancels a pending timer and forces a recompute.
async fn run_loop(inner: Arc<SessionInner>) {
    let mut wake = inner.events.subscribe();
    loop {
        // Collapse wake signals that arrived while we were busy; the
        // decision below reads current state anyway.
        loop {
            match wake.try_recv() {
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Closed) => return,
            }
        }

        match inner.decision() {
            None | Some(RefreshDecision::Skip) => {
                inner.set_state(SchedulerState::Idle);
                if !wait_for_wake(&mut wake).await {
                    return;
                }
            }
            Some(RefreshDecision::Immediate) => {
                // Errors were already logged and signaled; the next pass
                // decides whether another attempt makes sense.
                let _ = inner.refresh_now().await;
            }
            Some(RefreshDecision::After(delay)) => {
                tracing::debug!(delay_ms = delay.as_millis() as u64, "refresh timer armed");
                inner.set_state(SchedulerState::Armed { due_in: delay });
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {
                        let _ = inner.refresh_now().await;
                    }
                    alive = wait_for_wake(&mut wake) => {
                        if !alive {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Wait for any session event. Returns `false` when the bus is gone.
async fn wait_for_wake(rx: &mut broadcast::Receiver<SessionEvent>) -> bool {
    match rx.recv().await {
        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => true,
        Err(broadcast::error::RecvError::Closed) => false,
    }
}
