use super::*;

#[test]
fn only_retrying_and_connected_are_engaged() {
    assert!(!ReceiverState::Idle.is_engaged());
    assert!(ReceiverState::Retrying.is_engaged());
    assert!(ReceiverState::Connected.is_engaged());
    assert!(!ReceiverState::Stopping.is_engaged());
    assert_eq!(ReceiverState::default(), ReceiverState::Idle);
}

#[test]
fn failures_map_to_error_categories() {
    let exhausted = LinkEvent::RetryExhausted {
        target: "Studio-Cam".into(),
        attempts: 3,
    };
    let err = exhausted.failure().expect("failure");
    assert!(matches!(err, LumaError::SourceNotFound(_)));
    assert!(err.to_string().contains("Studio-Cam"));

    let refused = LinkEvent::ConnectFailed {
        source: "A".into(),
        reason: "refused".into(),
    };
    assert!(matches!(refused.failure(), Some(LumaError::Connect(_))));

    let connected = LinkEvent::Connected {
        source: "A".into(),
        attempt: 1,
    };
    assert!(connected.failure().is_none());
    assert!(LinkEvent::Stopped.failure().is_none());
}
