use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

#[test]
fn stop_joins_a_cooperative_loop() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&ticks);
    let mut worker = Worker::spawn("test-loop", move |token| {
        while !token.wait(Duration::from_millis(1)) {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    })
    .unwrap();

    std::thread::sleep(Duration::from_millis(20));
    assert!(worker.is_alive());
    assert_eq!(worker.name(), "test-loop");
    assert!(worker.stop(Duration::from_secs(2)));
    assert!(!worker.is_alive());
    assert!(ticks.load(Ordering::SeqCst) > 0);

    // Second stop is a no-op.
    assert!(worker.stop(Duration::from_millis(1)));
}

#[test]
fn stop_times_out_on_a_stuck_thread() {
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
    let mut worker = Worker::spawn("stuck", move |_token| {
        let _ = release_rx.recv();
    })
    .unwrap();

    assert!(!worker.stop(Duration::from_millis(10)));
    drop(release_tx);
}

#[test]
fn finished_worker_is_not_alive() {
    let mut worker = Worker::spawn("one-shot", |_token| {}).unwrap();
    assert!(worker.stop(Duration::from_secs(2)));
    assert!(!worker.is_alive());
}
