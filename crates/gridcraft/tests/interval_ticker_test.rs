//! Tokio tick scheduler: delivery, generations and cancellation.

use std::sync::atomic::Ordering;

use gridcraft::tui::{AppEvent, IntervalTicker};
use gridcraft_engine::TickScheduler;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep, timeout};

const PERIOD: Duration = Duration::from_millis(20);

#[tokio::test]
async fn test_ticks_carry_live_generation() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = IntervalTicker::new(tx, Handle::current()).with_period(PERIOD);
    assert!(!ticker.is_running());

    ticker.start();
    assert!(ticker.is_running());
    let live = ticker.generation().load(Ordering::SeqCst);

    for _ in 0..3 {
        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick before timeout")
            .expect("channel open");
        assert_eq!(event, AppEvent::Tick(live));
    }
}

#[tokio::test]
async fn test_start_while_running_keeps_generation() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut ticker = IntervalTicker::new(tx, Handle::current()).with_period(PERIOD);

    ticker.start();
    let first = ticker.generation().load(Ordering::SeqCst);
    ticker.start();
    assert_eq!(ticker.generation().load(Ordering::SeqCst), first);
}

#[tokio::test]
async fn test_cancel_stops_ticks_and_bumps_generation() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = IntervalTicker::new(tx, Handle::current()).with_period(PERIOD);

    ticker.start();
    let before = ticker.generation().load(Ordering::SeqCst);
    ticker.cancel();
    assert!(!ticker.is_running());
    assert!(ticker.generation().load(Ordering::SeqCst) > before);

    sleep(PERIOD * 5).await;
    while let Ok(stale) = rx.try_recv() {
        assert_eq!(stale, AppEvent::Tick(before));
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_restart_opens_new_generation() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = IntervalTicker::new(tx, Handle::current()).with_period(PERIOD);

    ticker.start();
    ticker.cancel();
    ticker.start();
    let live = ticker.generation().load(Ordering::SeqCst);
    assert_eq!(live, 3);

    let event = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("tick before timeout")
        .expect("channel open");
    assert_eq!(event, AppEvent::Tick(live));
}
