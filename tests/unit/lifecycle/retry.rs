use super::*;

#[test]
fn first_attempt_uses_settle_delay() {
    let p = RetryPolicy::default();
    assert_eq!(p.delay_before(0), Duration::from_millis(500));
    assert_eq!(p.delay_before(1), Duration::from_millis(1000));
    assert_eq!(p.delay_before(9), Duration::from_millis(1000));
}

#[test]
fn total_wait_sums_schedule() {
    let p = RetryPolicy {
        max_attempts: 3,
        initial_delay_ms: 5,
        interval_ms: 20,
    };
    assert_eq!(p.total_wait(), Duration::from_millis(45));
}

#[test]
fn zero_attempts_is_invalid() {
    let p = RetryPolicy {
        max_attempts: 0,
        ..RetryPolicy::default()
    };
    assert!(p.validate().is_err());
    assert!(RetryPolicy::default().validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let p: RetryPolicy = serde_json::from_str(r#"{ "max_attempts": 3 }"#).unwrap();
    assert_eq!(p.max_attempts, 3);
    assert_eq!(p.interval_ms, 1000);
}
