//! Polling scheduler: independent periodic fetch loops with explicit start/stop.
//!
//! Each subscription owns at most one timer task. Every tick runs its fetch as a
//! separate task, so a slow response never holds back the next tick or another
//! subscription. Results carry a ticket (the epoch at dispatch time) and are only
//! applied while that epoch is still the active one; `stop` bumps the epoch under
//! the same lock, so nothing lands after a stop.

use std::{
    collections::BTreeMap,
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use futures_util::future::BoxFuture;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Point-in-time stats panel (visibility gated).
pub const REALTIME_INTERVAL: Duration = Duration::from_millis(2500);
/// Basic dashboard totals.
pub const BASIC_INTERVAL: Duration = Duration::from_millis(3000);
/// Last-hour series.
pub const LAST_HOUR_INTERVAL: Duration = Duration::from_millis(60_000);

pub type SubscriptionId = &'static str;

type TickFn = Arc<dyn Fn(Ticket) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Default)]
struct Gate {
    active: bool,
    epoch: u64,
}

/// Permission to apply one tick's result.
#[derive(Clone)]
pub struct Ticket {
    id: SubscriptionId,
    gate: Arc<Mutex<Gate>>,
    epoch: u64,
}

impl Ticket {
    /// Runs `apply` only if the subscription is still active in the same epoch.
    pub fn apply_if_current(&self, apply: impl FnOnce()) -> bool {
        let gate = self.gate.lock().unwrap_or_else(|p| p.into_inner());
        if gate.active && gate.epoch == self.epoch {
            apply();
            true
        } else {
            debug!(id = self.id, "discarding result that arrived after stop");
            false
        }
    }
}

pub struct PollingSubscription {
    id: SubscriptionId,
    every: Duration,
    tick: TickFn,
    gate: Arc<Mutex<Gate>>,
    timer: Option<JoinHandle<()>>,
}

impl PollingSubscription {
    /// `fetch` runs once per tick; `apply` receives successful results.
    pub fn new<T, F, Fut, A>(id: SubscriptionId, every: Duration, fetch: F, apply: A) -> Self
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        A: Fn(T) + Send + Sync + 'static,
    {
        let apply = Arc::new(apply);
        let tick: TickFn = Arc::new(move |ticket: Ticket| -> BoxFuture<'static, ()> {
            let fut = fetch();
            let apply = apply.clone();
            Box::pin(async move {
                match fut.await {
                    Ok(value) => {
                        ticket.apply_if_current(|| apply(value));
                    }
                    Err(ApiError::Unauthenticated) => {
                        info!(id = ticket.id, "tick skipped: not authenticated");
                    }
                    Err(e) => {
                        warn!(id = ticket.id, error = %e, "tick failed, keeping last data");
                    }
                }
            })
        });
        Self {
            id,
            every,
            tick,
            gate: Arc::new(Mutex::new(Gate::default())),
            timer: None,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.lock_gate().active
    }

    /// Immediate fetch, then one every `interval`. No-op when already active.
    pub fn start(&mut self) -> bool {
        let epoch = {
            let mut gate = self.lock_gate();
            if gate.active {
                return false;
            }
            gate.active = true;
            gate.epoch += 1;
            gate.epoch
        };
        // Anything left from an earlier activation is already stale.
        if let Some(old) = self.timer.take() {
            old.abort();
        }

        let ticket = Ticket {
            id: self.id,
            gate: self.gate.clone(),
            epoch,
        };
        let tick = self.tick.clone();
        let every = self.every;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately.
                ticker.tick().await;
                tokio::spawn(tick(ticket.clone()));
            }
        }));
        debug!(id = self.id, ?every, "subscription started");
        true
    }

    /// Disarm the timer. In-flight fetches finish but their results are dropped.
    pub fn stop(&mut self) -> bool {
        let was_active = {
            let mut gate = self.lock_gate();
            let was = gate.active;
            gate.active = false;
            gate.epoch += 1;
            was
        };
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if was_active {
            debug!(id = self.id, "subscription stopped");
        }
        was_active
    }

    /// Activation signal: `true` starts, `false` stops.
    pub fn set_active(&mut self, on: bool) {
        if on {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn has_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn lock_gate(&self) -> std::sync::MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Drop for PollingSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Registry of subscriptions for one mounted view.
#[derive(Default)]
pub struct Scheduler {
    subs: BTreeMap<SubscriptionId, PollingSubscription>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces (and stops) any subscription registered under the same id.
    pub fn insert(&mut self, sub: PollingSubscription) {
        self.subs.insert(sub.id(), sub);
    }

    pub fn start(&mut self, id: SubscriptionId) -> bool {
        self.subs.get_mut(id).is_some_and(|s| s.start())
    }

    pub fn stop(&mut self, id: SubscriptionId) -> bool {
        self.subs.get_mut(id).is_some_and(|s| s.stop())
    }

    pub fn set_active(&mut self, id: SubscriptionId, on: bool) {
        if let Some(s) = self.subs.get_mut(id) {
            s.set_active(on);
        }
    }

    pub fn is_active(&self, id: SubscriptionId) -> bool {
        self.subs.get(id).is_some_and(|s| s.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.subs.values().filter(|s| s.is_active()).count()
    }

    /// Timers currently armed across all subscriptions.
    pub fn timer_count(&self) -> usize {
        self.subs.values().filter(|s| s.has_timer()).count()
    }

    pub fn stop_all(&mut self) {
        for s in self.subs.values_mut() {
            s.stop();
        }
    }

    /// Stop everything and forget the registrations (view unmount).
    pub fn clear(&mut self) {
        self.stop_all();
        self.subs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}
