//! Session-bound permission store.
//!
//! One fetch cycle runs per authenticated session (or manual refresh):
//!
//! 1. wait `settle_delay` (zero for refresh)
//! 2. fetch permissions and roles concurrently under `attempt_timeout`
//! 3. on timeout, sleep `backoff.delay(n)` and go back to 2, at most
//!    `max_retries` times
//! 4. commit the sets on success, or empty sets on any terminal failure
//!
//! Every cycle carries a generation number. A result is committed only while
//! its generation is still the current one, so a superseded cycle can never
//! overwrite newer state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use access_control_sdk::{AccessSnapshot, FetchError, PermissionSource};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use portal_security::{AccessCheck, AccessState, AccessToken, Grants, Session, SessionStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backoff::Backoff;

/// Timing of a fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    pub settle_delay: Duration,
    pub attempt_timeout: Duration,
    /// Retries after the initial attempt; only timeouts are retried.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            attempt_timeout: Duration::from_secs(5),
            max_retries: 3,
            backoff: Backoff::default(),
        }
    }
}

/// Caches the current user's permission and role names.
///
/// Cheap to clone; all clones share one state. Reads are lock-free snapshot
/// loads. Create one per session and call [`PermissionStore::shutdown`] on
/// teardown.
#[derive(Clone)]
pub struct PermissionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    source: Arc<dyn PermissionSource>,
    policy: FetchPolicy,
    state: ArcSwap<AccessSnapshot>,
    changes: watch::Sender<Arc<AccessSnapshot>>,
    control: Mutex<Control>,
}

#[derive(Default)]
struct Control {
    generation: u64,
    cancel: Option<CancellationToken>,
    token: Option<AccessToken>,
    closed: bool,
}

impl fmt::Debug for PermissionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionStore")
            .field("policy", &self.inner.policy)
            .field("snapshot", &self.inner.state.load())
            .finish_non_exhaustive()
    }
}

impl PermissionStore {
    #[must_use]
    pub fn new(source: Arc<dyn PermissionSource>, policy: FetchPolicy) -> Self {
        let initial = Arc::new(AccessSnapshot::initial());
        let (changes, _) = watch::channel(Arc::clone(&initial));
        Self {
            inner: Arc::new(StoreInner {
                source,
                policy,
                state: ArcSwap::new(initial),
                changes,
                control: Mutex::new(Control::default()),
            }),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &FetchPolicy {
        &self.inner.policy
    }

    /// React to a session transition.
    ///
    /// - `loading`: nothing changes.
    /// - `authenticated` with a token: start a fetch cycle after the settle
    ///   delay, unless one already runs or ran for the same token.
    /// - `authenticated` without a token, or `unauthenticated`: clear.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_session(&self, session: &Session) {
        match session.status() {
            SessionStatus::Loading => debug!("session still resolving; permission store unchanged"),
            SessionStatus::Authenticated => match session.bearer_token() {
                Some(token) => self.start_session(token),
                None => {
                    debug!("authenticated session without access token; clearing permissions");
                    self.clear();
                }
            },
            SessionStatus::Unauthenticated => self.clear(),
        }
    }

    fn start_session(&self, token: &AccessToken) {
        let mut control = self.inner.control.lock();
        if control.closed {
            debug!("permission store shut down; ignoring session");
            return;
        }
        if control.token.as_ref() == Some(token) {
            debug!(
                generation = control.generation,
                "session token unchanged; keeping current permissions"
            );
            return;
        }
        control.token = Some(token.clone());
        let delay = self.inner.policy.settle_delay;
        // Handle dropped: the cycle runs detached and commits through the store.
        drop(
            self.inner
                .begin_cycle(&mut control, token.clone(), delay, Grants::empty()),
        );
    }

    /// Re-fetch immediately with a fresh retry counter and wait for the
    /// cycle to settle.
    ///
    /// Without an authenticated session this returns the current (cleared)
    /// snapshot and fetches nothing.
    pub async fn refresh_permissions(&self) -> Arc<AccessSnapshot> {
        let handle = {
            let mut control = self.inner.control.lock();
            let token = match control.token.clone() {
                Some(token) if !control.closed => token,
                _ => {
                    debug!("no authenticated session; refresh skipped");
                    return self.snapshot();
                }
            };
            let keep = self.inner.state.load().grants.clone();
            self.inner
                .begin_cycle(&mut control, token, Duration::ZERO, keep)
        };

        if let Err(e) = handle.await {
            warn!(error = %e, "permission fetch task failed");
        }
        self.snapshot()
    }

    /// Drop both sets synchronously and cancel any in-flight fetch.
    pub fn clear(&self) {
        let mut control = self.inner.control.lock();
        if control.token.is_none() && control.cancel.is_none() && !self.inner.state.load().loading {
            return;
        }
        control.token = None;
        let generation = self.inner.supersede(&mut control);
        self.inner.publish(AccessSnapshot::cleared(generation));
        info!(generation, "permissions cleared");
    }

    /// Clear and refuse any further session transitions.
    pub fn shutdown(&self) {
        self.clear();
        self.inner.control.lock().closed = true;
        debug!("permission store shut down");
    }

    /// Current state. Never blocks.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AccessSnapshot> {
        self.inner.state.load_full()
    }

    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.inner.state.load().retry_count
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<AccessSnapshot>> {
        self.inner.changes.subscribe()
    }

    /// Wait until the store is no longer loading and return that snapshot.
    ///
    /// Before the first session transition the store is loading, so this
    /// also waits for the session to resolve.
    pub async fn wait_settled(&self) -> Arc<AccessSnapshot> {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(settled) => Arc::clone(&settled),
            Err(_) => self.snapshot(),
        }
    }
}

impl StoreInner {
    /// Bump the generation and cancel the previous cycle. Caller holds the
    /// control lock.
    fn supersede(&self, control: &mut Control) -> u64 {
        control.generation += 1;
        if let Some(previous) = control.cancel.take() {
            previous.cancel();
        }
        control.generation
    }

    fn begin_cycle(
        self: &Arc<Self>,
        control: &mut Control,
        token: AccessToken,
        delay: Duration,
        keep: Grants,
    ) -> JoinHandle<()> {
        let generation = self.supersede(control);
        let cancel = CancellationToken::new();
        control.cancel = Some(cancel.clone());

        self.publish(AccessSnapshot {
            grants: keep,
            loading: true,
            retry_count: 0,
            generation,
        });

        debug!(generation, delay_ms = millis(delay), "permission fetch cycle scheduled");
        tokio::spawn(Arc::clone(self).run_cycle(generation, token, cancel, delay))
    }

    async fn run_cycle(
        self: Arc<Self>,
        generation: u64,
        token: AccessToken,
        cancel: CancellationToken,
        delay: Duration,
    ) {
        if !delay.is_zero() {
            tokio::select! {
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
        }

        let mut retries = 0u32;
        let outcome = loop {
            let attempt = tokio::select! {
                () = cancel.cancelled() => return,
                res = self.attempt(&token) => res,
            };

            match attempt {
                Ok(grants) => break Ok(grants),
                Err(e) if e.is_retryable() && retries < self.policy.max_retries => {
                    let wait = self.policy.backoff.delay(retries);
                    retries += 1;
                    warn!(
                        generation,
                        attempt = retries,
                        delay_ms = millis(wait),
                        error = %e,
                        "permission fetch timed out; retrying"
                    );
                    self.commit(generation, |current| AccessSnapshot {
                        retry_count: retries,
                        ..current.clone()
                    });
                    tokio::select! {
                        () = cancel.cancelled() => return,
                        () = tokio::time::sleep(wait) => {}
                    }
                }
                Err(e) => break Err(e),
            }
        };

        match outcome {
            Ok(grants) => {
                info!(
                    generation,
                    permissions = grants.permissions.len(),
                    roles = grants.roles.len(),
                    "permissions loaded"
                );
                self.commit(generation, |_| AccessSnapshot::settled(grants, generation));
            }
            Err(e) => {
                warn!(generation, retries, error = %e, "permission fetch failed; access denied until refresh");
                self.commit(generation, |_| {
                    AccessSnapshot::settled(Grants::empty(), generation)
                });
            }
        }
    }

    /// One attempt: both fetches concurrently under a single deadline.
    async fn attempt(&self, token: &AccessToken) -> Result<Grants, FetchError> {
        let fetch = async {
            tokio::try_join!(
                self.source.fetch_permissions(token),
                self.source.fetch_roles(token)
            )
        };

        match tokio::time::timeout(self.policy.attempt_timeout, fetch).await {
            Ok(Ok((permissions, roles))) => Ok(Grants::new(permissions, roles)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout(self.policy.attempt_timeout)),
        }
    }

    /// Publish `next(current)` if `generation` is still current.
    fn commit<F>(&self, generation: u64, next: F)
    where
        F: FnOnce(&AccessSnapshot) -> AccessSnapshot,
    {
        let mut control = self.control.lock();
        if control.generation != generation {
            debug!(
                generation,
                current = control.generation,
                "discarding result of superseded fetch cycle"
            );
            return;
        }
        let snapshot = next(&self.state.load());
        if !snapshot.loading {
            control.cancel = None;
        }
        self.publish(snapshot);
    }

    fn publish(&self, snapshot: AccessSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.state.store(Arc::clone(&snapshot));
        self.changes.send_replace(snapshot);
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl AccessCheck for PermissionStore {
    fn has_permission(&self, name: &str) -> bool {
        self.inner.state.load().has_permission(name)
    }

    fn has_role(&self, name: &str) -> bool {
        self.inner.state.load().has_role(name)
    }

    fn has_any_permission(&self, names: &[String]) -> bool {
        self.inner.state.load().has_any_permission(names)
    }

    fn has_all_permissions(&self, names: &[String]) -> bool {
        self.inner.state.load().has_all_permissions(names)
    }

    fn has_any_role(&self, names: &[String]) -> bool {
        self.inner.state.load().has_any_role(names)
    }

    fn has_all_roles(&self, names: &[String]) -> bool {
        self.inner.state.load().has_all_roles(names)
    }
}

impl AccessState for PermissionStore {
    fn is_loading(&self) -> bool {
        self.inner.state.load().loading
    }
}
