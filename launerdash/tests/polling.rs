//! Scheduler cadence with tokio's paused clock.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use launerdash::error::ApiError;
use launerdash::poller::{
    PollingSubscription, Scheduler, SubscriptionId, LAST_HOUR_INTERVAL, REALTIME_INTERVAL,
};

fn counter(id: SubscriptionId, every: Duration) -> (PollingSubscription, Arc<AtomicUsize>) {
    let applied = Arc::new(AtomicUsize::new(0));
    let a = applied.clone();
    let sub = PollingSubscription::new(
        id,
        every,
        || async { Ok::<_, ApiError>(()) },
        move |()| {
            a.fetch_add(1, Ordering::SeqCst);
        },
    );
    (sub, applied)
}

async fn advance(by: Duration) {
    tokio::time::sleep(by).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn independent_cadences_over_ten_seconds() {
    let (fast, fast_n) = counter("fast", REALTIME_INTERVAL);
    let (slow, slow_n) = counter("slow", LAST_HOUR_INTERVAL);
    let mut sched = Scheduler::new();
    sched.insert(fast);
    sched.insert(slow);
    assert!(sched.start("fast"));
    assert!(sched.start("slow"));

    advance(Duration::from_secs(10)).await;
    let fast_count = fast_n.load(Ordering::SeqCst);
    assert!((3..=5).contains(&fast_count), "fast applied {fast_count} times");
    assert_eq!(slow_n.load(Ordering::SeqCst), 1);

    sched.clear();
    assert!(sched.is_empty());
    advance(Duration::from_secs(60)).await;
    assert_eq!(fast_n.load(Ordering::SeqCst), fast_count);
    assert_eq!(slow_n.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn deactivated_subscription_stops_ticking_and_resumes_immediately() {
    let (rt, n) = counter("rt", REALTIME_INTERVAL);
    let mut sched = Scheduler::new();
    sched.insert(rt);
    sched.set_active("rt", true);
    advance(Duration::from_millis(100)).await;
    assert_eq!(n.load(Ordering::SeqCst), 1);

    sched.set_active("rt", false);
    assert_eq!(sched.timer_count(), 0);
    advance(Duration::from_secs(30)).await;
    assert_eq!(n.load(Ordering::SeqCst), 1);

    sched.set_active("rt", true);
    advance(Duration::from_millis(100)).await;
    assert_eq!(n.load(Ordering::SeqCst), 2);
    assert!(sched.is_active("rt"));
}
