use std::time::Instant;

use super::*;

#[test]
fn wait_times_out_when_not_cancelled() {
    let (_handle, token) = cancel_pair();
    assert!(!token.wait(Duration::from_millis(5)));
    assert!(!token.is_cancelled());
}

#[test]
fn cancel_wakes_a_blocked_wait() {
    let (mut handle, token) = cancel_pair();
    let waiter = std::thread::spawn(move || {
        let start = Instant::now();
        let cancelled = token.wait(Duration::from_secs(30));
        (cancelled, start.elapsed())
    });
    std::thread::sleep(Duration::from_millis(20));
    handle.cancel();
    let (cancelled, elapsed) = waiter.join().unwrap();
    assert!(cancelled);
    assert!(elapsed < Duration::from_secs(5), "waited {elapsed:?}");
}

#[test]
fn cancel_is_sticky_and_idempotent() {
    let (mut handle, token) = cancel_pair();
    handle.cancel();
    handle.cancel();
    assert!(token.wait(Duration::from_secs(30)));
    assert!(token.clone().is_cancelled());
}
