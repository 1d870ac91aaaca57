use serde_json::json;
use splice::{Completion, RequestOptions};

mod common;
use common::{Fixture, json};

#[tokio::test]
async fn test_reverse_completion_keeps_targets_apart() {
    let fx = Fixture::new();
    let left_gate = fx.backend.respond_gated("onLeft", json(200, json!({"left": "L"})));
    let right_gate = fx.backend.respond_gated("onRight", json(200, json!({"right": "R"})));

    let left = fx.request("onLeft", RequestOptions::new().update("left", "#left"));
    let right = fx.request("onRight", RequestOptions::new().update("right", "#right"));

    let release = async {
        // Let both requests reach the backend before answering.
        while fx.backend.request_count() < 2 {
            tokio::task::yield_now().await;
        }
        right_gate.open();
        tokio::task::yield_now().await;
        left_gate.open();
    };

    let (left, right, ()) = tokio::join!(left.send(), right.send(), release);

    for completion in [left.unwrap(), right.unwrap()] {
        assert!(matches!(completion, Completion::Settled(ref s) if s.dispatched.is_success()));
    }
    assert_eq!(fx.html("#left"), "L");
    assert_eq!(fx.html("#right"), "R");
    assert_eq!(fx.frames.count(), 2);
}

#[tokio::test]
async fn test_failed_request_does_not_disturb_sibling() {
    let fx = Fixture::new();
    let ok_gate = fx.backend.respond_gated("onLeft", json(200, json!({"left": "L"})));
    fx.backend.fail("connection reset");

    let left = fx.request("onLeft", RequestOptions::new().update("left", "#left"));
    let right = fx.request("onRight", RequestOptions::new().update("right", "#right"));

    let release = async {
        while fx.backend.request_count() < 2 {
            tokio::task::yield_now().await;
        }
        ok_gate.open();
    };

    let (left, right, ()) = tokio::join!(left.send(), right.send(), release);

    assert!(left.unwrap().settlement().is_some_and(|s| s.dispatched.is_success()));
    assert!(right.unwrap().settlement().is_some_and(|s| !s.outcome.is_success()));
    assert_eq!(fx.html("#left"), "L");
    assert_eq!(fx.html("#right"), "right");
    assert_eq!(fx.dialogs.alerts(), vec!["network error: connection reset"]);
}
