//! Admission Control
//!
//! Per-client fixed-window request limiter guarding write endpoints.
//!
//! The algorithm is deliberately coarse: one integer comparison per
//! request against a window that fully resets once it expires. A client
//! can burst up to twice the limit across a window boundary; that
//! imprecision is the accepted price of trivial per-request cost.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{GuardError, Result};
use crate::limiter::ClientActivity;
use crate::tasks::Sweeper;

// == Inner State ==
#[derive(Debug)]
struct LimiterInner {
    /// Requests admitted per client per window
    max_requests: u32,
    /// Counting window length
    window: Duration,
    /// Inactivity threshold after which a client's counter is dropped
    idle_after: Duration,
    /// Per-client counters, guarded by one coarse mutex
    clients: Mutex<HashMap<String, ClientActivity>>,
    /// Observability counters
    admitted: AtomicU64,
    rejected: AtomicU64,
    /// Idle-sweep lifecycle handle
    sweeper: Mutex<Option<Sweeper>>,
}

impl LimiterInner {
    fn clients(&self) -> MutexGuard<'_, HashMap<String, ClientActivity>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drops every client untouched for longer than the idle threshold.
    fn sweep_idle(&self) -> usize {
        let mut clients = self.clients();
        let before = clients.len();
        clients.retain(|_, activity| activity.idle_for() <= self.idle_after);
        before - clients.len()
    }
}

// == Rate Limiter ==
/// Admission control keyed by client identifier.
///
/// Cheaply clonable handle; all clones share the same counters.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<LimiterInner>,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter admitting `max_requests` per client per `window`.
    ///
    /// # Arguments
    /// * `max_requests` - Admissions per window, must be positive
    /// * `window` - Window length, must be positive
    /// * `idle_after` - Inactivity threshold for forgetting a client,
    ///   must be positive
    ///
    /// # Errors
    /// Returns a configuration error when any parameter is zero; a zero
    /// limit would silently reject every request.
    pub fn new(max_requests: u32, window: Duration, idle_after: Duration) -> Result<Self> {
        if max_requests == 0 {
            return Err(GuardError::ZeroLimit);
        }
        if window.is_zero() {
            return Err(GuardError::ZeroWindow);
        }
        if idle_after.is_zero() {
            return Err(GuardError::ZeroIdleThreshold);
        }

        Ok(Self {
            inner: Arc::new(LimiterInner {
                max_requests,
                window,
                idle_after,
                clients: Mutex::new(HashMap::new()),
                admitted: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                sweeper: Mutex::new(None),
            }),
        })
    }

    // == Allow ==
    /// Decides whether to admit a request from `client_id`.
    ///
    /// Stateful by design: every call counts as a request. A client's
    /// first request is always admitted; within an open window a request
    /// is admitted while the count stays at or under the limit; a window
    /// that has fully elapsed resets to a count of 1 and admits.
    pub fn allow(&self, client_id: &str) -> bool {
        let count = {
            let mut clients = self.inner.clients();
            match clients.get_mut(client_id) {
                Some(activity) => activity.observe(self.inner.window),
                None => {
                    clients.insert(client_id.to_string(), ClientActivity::first_request());
                    1
                }
            }
        };

        let admitted = count <= self.inner.max_requests;
        if admitted {
            self.inner.admitted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.rejected.fetch_add(1, Ordering::Relaxed);
        }
        admitted
    }

    // == Sweep Idle ==
    /// Drops clients idle past the threshold, returning how many.
    ///
    /// Frees memory only; a dropped client is simply "unseen" again and
    /// its next request is admitted like any first request.
    pub fn sweep_idle(&self) -> usize {
        self.inner.sweep_idle()
    }

    // == Run Idle Sweep ==
    /// Starts the periodic idle sweep. No-op if already running.
    ///
    /// The sweep task holds only a weak handle, so it never keeps the
    /// limiter alive on its own.
    ///
    /// # Errors
    /// Returns a configuration error for a zero interval; the interval
    /// timer cannot run with a zero period, so the sweep would die on
    /// its first tick instead of reclaiming idle clients.
    pub fn run_idle_sweep(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(GuardError::ZeroInterval);
        }

        let mut slot = self
            .inner
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("idle sweep already running, ignoring start request");
            return Ok(());
        }

        let weak: Weak<LimiterInner> = Arc::downgrade(&self.inner);
        *slot = Some(Sweeper::spawn("idle client", interval, move || {
            if let Some(inner) = weak.upgrade() {
                let removed = inner.sweep_idle();
                if removed > 0 {
                    debug!("idle sweep forgot {} client(s)", removed);
                }
            }
        }));

        Ok(())
    }

    // == Stop ==
    /// Halts the idle sweep and waits for it to exit.
    ///
    /// Idempotent; safe to call when no sweep is running. After this
    /// returns no further background mutation occurs.
    pub async fn stop(&self) {
        let sweeper = self
            .inner
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(sweeper) = sweeper {
            sweeper.stop().await;
        }
    }

    // == Observability ==
    /// Number of clients currently tracked.
    pub fn active_clients(&self) -> usize {
        self.inner.clients().len()
    }

    /// Total requests admitted since startup.
    pub fn admitted_total(&self) -> u64 {
        self.inner.admitted.load(Ordering::Relaxed)
    }

    /// Total requests rejected since startup.
    pub fn rejected_total(&self) -> u64 {
        self.inner.rejected.load(Ordering::Relaxed)
    }

    /// Configured window length.
    pub fn window(&self) -> Duration {
        self.inner.window
    }
}
