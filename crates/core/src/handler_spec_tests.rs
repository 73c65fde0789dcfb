use super::*;

#[test]
fn absent_retry_normalizes_to_one_attempt() {
    let spec: HandlerSpec = serde_json::from_str(r#"{"name": "ReadFile"}"#).unwrap();
    assert_eq!(spec.retry.normalized().max_retries, 1);
}

#[test]
fn explicit_zero_retries_normalizes_to_one_attempt() {
    let retry = HandlerRetry { max_retries: 0, backoff_seconds: 5 };
    let normalized = retry.normalized();
    assert_eq!(normalized.max_retries, 1);
    assert_eq!(normalized.backoff_seconds, 5);
}

#[test]
fn backoff_interval_key_maps_to_backoff_seconds() {
    let spec: HandlerSpec = serde_json::from_str(
        r#"{"name": "WriteFile", "retry": {"max_retries": 3, "backoff_interval": 2}}"#,
    )
    .unwrap();
    assert_eq!(spec.retry.max_retries, 3);
    assert_eq!(spec.retry.backoff_seconds, 2);
}
