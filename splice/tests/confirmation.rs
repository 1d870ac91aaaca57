use splice::{
    AbortReason, AsyncFn, Completion, ConfirmFailure, Confirmation, ConfirmationGate,
    EngineConfig, RawResponse, RequestOptions,
    hooks::{AjaxConfirmMessage, ConfirmMessageEvent},
    testing::RecordingHook,
};
use std::time::Duration;

mod common;
use common::Fixture;

#[tokio::test]
async fn test_no_prompt_never_asks() {
    let fx = Fixture::answering(false);
    let recorder = RecordingHook::<ConfirmMessageEvent>::new();
    fx.env.hooks().on_async::<AjaxConfirmMessage, _>(recorder.clone());

    for options in [RequestOptions::new(), RequestOptions::new().confirm("")] {
        let descriptor = fx.descriptor(options);
        let result = ConfirmationGate::new(&fx.env).confirm(&descriptor).await;
        assert_eq!(result.unwrap(), Confirmation::NotNeeded);
    }
    assert!(fx.dialogs.confirms().is_empty());
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_native_dialog_without_listeners() {
    let fx = Fixture::answering(false);
    fx.backend.respond(RawResponse::json(200, "{}"));

    let completion = fx
        .request("onDelete", RequestOptions::new().confirm("Delete it?"))
        .send()
        .await
        .unwrap();

    assert!(matches!(
        completion,
        Completion::Aborted(AbortReason::ConfirmationDenied)
    ));
    assert_eq!(fx.dialogs.confirms(), vec!["Delete it?"]);
    assert_eq!(fx.backend.request_count(), 0);
}

#[tokio::test]
async fn test_callback_owns_the_decision() {
    let fx = Fixture::new();
    let recorder = RecordingHook::<ConfirmMessageEvent>::new();
    fx.env.hooks().on_async::<AjaxConfirmMessage, _>(recorder.clone());

    let denied = fx.descriptor(
        RequestOptions::new()
            .confirm("Sure?")
            .handle_confirm_message(|prompt| prompt != "Sure?"),
    );
    let gate = ConfirmationGate::new(&fx.env);
    assert_eq!(gate.confirm(&denied).await.unwrap(), Confirmation::Denied);

    // Anything but a veto approves.
    let approved = fx.descriptor(
        RequestOptions::new()
            .confirm("Sure?")
            .handle_confirm_message(|_| ()),
    );
    assert_eq!(gate.confirm(&approved).await.unwrap(), Confirmation::Approved);

    assert_eq!(recorder.count(), 0);
    assert!(fx.dialogs.confirms().is_empty());
}

#[tokio::test]
async fn test_listeners_decide_instead_of_dialog() {
    let fx = Fixture::answering(false);
    fx.env
        .hooks()
        .on_async::<AjaxConfirmMessage, _>(AsyncFn(|event: ConfirmMessageEvent| async move {
            tokio::task::yield_now().await;
            event.message.contains("archive")
        }));
    let gate = ConfirmationGate::new(&fx.env);

    let yes = fx.descriptor(RequestOptions::new().confirm("Really archive?"));
    assert_eq!(gate.confirm(&yes).await.unwrap(), Confirmation::Approved);

    let no = fx.descriptor(RequestOptions::new().confirm("Really delete?"));
    assert_eq!(gate.confirm(&no).await.unwrap(), Confirmation::Denied);

    assert!(fx.dialogs.confirms().is_empty());
}

#[tokio::test]
async fn test_listener_failure_is_not_a_denial() {
    let fx = Fixture::new();
    fx.backend.respond(RawResponse::json(200, "{}"));
    fx.env
        .hooks()
        .on_async::<AjaxConfirmMessage, _>(AsyncFn(|_: ConfirmMessageEvent| async {
            Err::<bool, _>(std::io::Error::other("dialog crashed"))
        }));

    let completion = fx
        .request("onDelete", RequestOptions::new().confirm("Sure?"))
        .send()
        .await
        .unwrap();

    match completion {
        Completion::Aborted(AbortReason::ConfirmationFailed(ConfirmFailure::HookRejected(err))) => {
            assert!(err.to_string().contains("dialog crashed"));
        }
        other => panic!("unexpected completion: {other:?}"),
    }
    assert_eq!(fx.backend.request_count(), 0);
}

#[tokio::test]
async fn test_confirm_timeout() {
    let fx = Fixture::with_config(EngineConfig::new().confirm_timeout(Duration::from_millis(10)));
    fx.env
        .hooks()
        .on_async::<AjaxConfirmMessage, _>(AsyncFn(|_: ConfirmMessageEvent| async {
            futures::future::pending::<bool>().await
        }));

    let descriptor = fx.descriptor(RequestOptions::new().confirm("Sure?"));
    let err = ConfirmationGate::new(&fx.env)
        .confirm(&descriptor)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfirmFailure::TimedOut(limit) if limit == Duration::from_millis(10)));
    assert_eq!(fx.backend.request_count(), 0);
}
