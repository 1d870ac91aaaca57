use serde_json::json;
use splice::{
    Completion, Dispatched, ElementEvent, RawResponse, RequestOptions, Settlement, Verdict,
    hooks::{
        AjaxErrorMessage, AjaxFlashMessages, AjaxRedirect, AjaxValidationErrors, ErrorMessageEvent,
        FlashMessagesEvent, RedirectEvent, ValidationErrorsEvent,
    },
    testing::RecordingHook,
};
use std::sync::{Arc, Mutex};

mod common;
use common::{Fixture, json};

async fn settle(fx: &Fixture, options: RequestOptions) -> Settlement {
    match fx.request("onSave", options).send().await.unwrap() {
        Completion::Settled(settlement) => settlement,
        Completion::Aborted(reason) => panic!("unexpected abort: {reason:?}"),
    }
}

#[tokio::test]
async fn test_soft_failure_updates_then_dispatches_validation() {
    let fx = Fixture::new();
    let validation = RecordingHook::<ValidationErrorsEvent>::new();
    let flash = RecordingHook::<FlashMessagesEvent>::new();
    let redirects = RecordingHook::<RedirectEvent>::new();
    fx.env.hooks().on::<AjaxValidationErrors, _>(validation.clone());
    fx.env.hooks().on::<AjaxFlashMessages, _>(flash.clone());
    fx.env.hooks().on::<AjaxRedirect, _>(redirects.clone());
    fx.backend.respond(json(
        406,
        json!({"foo": "<p>hi</p>", "X_WINTER_ERROR_FIELDS": {"name": ["required"]}}),
    ));

    let settlement = settle(&fx, RequestOptions::new().update("foo", "#foo").flash(true)).await;

    // (a) the partial was written
    assert_eq!(fx.html("#foo"), "<p>hi</p>");
    // (b) validation handling fired with the field
    let events = validation.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields["name"], vec!["required"]);
    assert_eq!(events[0].form, Some(fx.form));
    // (c) no success path
    assert!(!settlement.outcome.is_success());
    assert_eq!(
        settlement.dispatched,
        Dispatched::Error {
            validation: true,
            message: false,
            alerted: false,
        }
    );
    assert_eq!(flash.count(), 0);
    assert_eq!(redirects.count(), 0);
    assert!(fx.dialogs.alerts().is_empty());
    assert_eq!(
        fx.doc.events_on(fx.button),
        vec![ElementEvent::Promise, ElementEvent::Fail, ElementEvent::Always]
    );
}

#[tokio::test]
async fn test_redirect_is_exclusive() {
    let fx = Fixture::new();
    let flash = RecordingHook::<FlashMessagesEvent>::new();
    fx.env.hooks().on::<AjaxFlashMessages, _>(flash.clone());
    fx.backend.respond(json(
        200,
        json!({
            "X_WINTER_REDIRECT": "/done",
            "X_WINTER_FLASH_MESSAGES": {"success": "Saved"},
            "X_WINTER_ASSETS": {"js": ["/app.js"]},
        }),
    ));

    let settlement = settle(&fx, RequestOptions::new().flash(true)).await;

    assert_eq!(fx.navigator.navigations(), vec!["/done"]);
    assert_eq!(
        settlement.dispatched,
        Dispatched::Redirect {
            url: "/done".into(),
            navigated: true,
        }
    );
    assert_eq!(flash.count(), 0);
    assert!(fx.assets.loads().is_empty());
}

#[tokio::test]
async fn test_redirect_hook_veto_prevents_navigation() {
    let fx = Fixture::new();
    fx.env.hooks().on::<AjaxRedirect, _>(RecordingHook::<RedirectEvent>::vetoing());
    fx.backend.respond(json(200, json!({"X_WINTER_REDIRECT": "/done"})));

    let settlement = settle(&fx, RequestOptions::new()).await;

    assert!(fx.navigator.navigations().is_empty());
    assert_eq!(
        settlement.dispatched,
        Dispatched::Redirect {
            url: "/done".into(),
            navigated: false,
        }
    );
}

#[tokio::test]
async fn test_redirect_callback_runs_before_hook() {
    let fx = Fixture::new();
    let hook = RecordingHook::<RedirectEvent>::new();
    fx.env.hooks().on::<AjaxRedirect, _>(hook.clone());
    fx.backend.respond(json(200, json!({})));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_callback = seen.clone();
    settle(
        &fx,
        RequestOptions::new()
            .redirect("/fallback")
            .handle_redirect_response(move |url| {
                seen_in_callback.lock().unwrap().push(url.to_owned());
                false
            }),
    )
    .await;

    assert_eq!(*seen.lock().unwrap(), vec!["/fallback"]);
    assert_eq!(hook.count(), 0);
    assert!(fx.navigator.navigations().is_empty());
}

#[tokio::test]
async fn test_redirect_listener_may_rewrite_url() {
    let fx = Fixture::new();
    fx.env
        .hooks()
        .on::<AjaxRedirect, _>(|event: &mut RedirectEvent| event.url.push_str("?from=ajax"));
    fx.backend.respond(json(200, json!({"X_WINTER_REDIRECT": "/done"})));

    settle(&fx, RequestOptions::new()).await;
    assert_eq!(fx.navigator.navigations(), vec!["/done?from=ajax"]);
}

#[tokio::test]
async fn test_hash_redirect_signals_on_pop_state() {
    let fx = Fixture::new();
    fx.backend.respond(json(200, json!({"X_WINTER_REDIRECT": "#saved"})));

    settle(&fx, RequestOptions::new()).await;
    assert_eq!(fx.navigator.pending_pop_listeners(), 1);
    assert!(!fx.doc.events_on(fx.button).contains(&ElementEvent::Redirected));

    fx.navigator.pop_state();
    assert_eq!(fx.navigator.pending_pop_listeners(), 0);
    assert_eq!(
        fx.doc.events_on(fx.button).last(),
        Some(&ElementEvent::Redirected)
    );
}

#[tokio::test]
async fn test_flash_and_assets_dispatch_independently() {
    let fx = Fixture::new();
    let flash = RecordingHook::<FlashMessagesEvent>::new();
    fx.env.hooks().on::<AjaxFlashMessages, _>(flash.clone());
    let body = json!({
        "X_WINTER_FLASH_MESSAGES": {"success": "Saved"},
        "X_WINTER_ASSETS": {"css": ["/site.css"]},
    });
    fx.backend.respond(json(200, body.clone())).respond(json(200, body));

    // Flash messages are only dispatched when requested.
    let quiet = settle(&fx, RequestOptions::new()).await;
    assert_eq!(quiet.dispatched, Dispatched::Success { flash: false, assets: true });
    assert_eq!(flash.count(), 0);

    let loud = settle(&fx, RequestOptions::new().flash(true)).await;
    assert_eq!(loud.dispatched, Dispatched::Success { flash: true, assets: true });
    let events = flash.events();
    assert_eq!(events[0].messages[0].level, "success");
    assert_eq!(events[0].messages[0].text, "Saved");
    assert_eq!(fx.assets.loads().len(), 2);
    assert_eq!(fx.assets.loads()[0].css, vec!["/site.css"]);

    let flash_header = fx.backend.requests()[1]
        .header(splice::platform::wire::HEADER_FLASH)
        .map(str::to_owned);
    assert_eq!(flash_header.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_flash_callback_veto_skips_hook() {
    let fx = Fixture::new();
    let flash = RecordingHook::<FlashMessagesEvent>::new();
    fx.env.hooks().on::<AjaxFlashMessages, _>(flash.clone());
    fx.backend.respond(json(200, json!({"X_WINTER_FLASH_MESSAGES": {"info": ["a", "b"]}})));

    let seen = Arc::new(Mutex::new(0));
    let counter = seen.clone();
    settle(
        &fx,
        RequestOptions::new().flash(true).handle_flash_messages(move |messages| {
            *counter.lock().unwrap() = messages.len();
            Verdict::Veto
        }),
    )
    .await;

    assert_eq!(*seen.lock().unwrap(), 2);
    assert_eq!(flash.count(), 0);
}

#[tokio::test]
async fn test_generic_error_alerts() {
    let fx = Fixture::new();
    fx.backend.respond(json(
        500,
        json!({"message": "Division by zero", "exception": "DivisionByZeroError"}),
    ));

    let settlement = settle(&fx, RequestOptions::new()).await;

    assert_eq!(fx.dialogs.alerts(), vec!["Division by zero"]);
    assert_eq!(
        settlement.dispatched,
        Dispatched::Error {
            validation: false,
            message: true,
            alerted: true,
        }
    );
    assert_eq!(
        fx.doc.events_on(fx.button),
        vec![ElementEvent::Promise, ElementEvent::Fail, ElementEvent::Always]
    );
}

#[tokio::test]
async fn test_error_message_hook_suppresses_alert() {
    let fx = Fixture::new();
    let hook = RecordingHook::<ErrorMessageEvent>::vetoing();
    fx.env.hooks().on::<AjaxErrorMessage, _>(hook.clone());
    fx.backend.respond(RawResponse::text(503, "Maintenance"));

    settle(&fx, RequestOptions::new()).await;

    assert_eq!(hook.events()[0].message, "Maintenance");
    assert!(fx.dialogs.alerts().is_empty());
}

#[tokio::test]
async fn test_error_message_callback_suppresses_hook_and_alert() {
    let fx = Fixture::new();
    let hook = RecordingHook::<ErrorMessageEvent>::new();
    fx.env.hooks().on::<AjaxErrorMessage, _>(hook.clone());
    fx.backend.respond(RawResponse::text(500, "boom"));

    settle(&fx, RequestOptions::new().handle_error_message(|_| false)).await;

    assert_eq!(hook.count(), 0);
    assert!(fx.dialogs.alerts().is_empty());
}

#[tokio::test]
async fn test_validation_and_message_both_fire() {
    let fx = Fixture::new();
    let validation = RecordingHook::<ValidationErrorsEvent>::new();
    fx.env.hooks().on::<AjaxValidationErrors, _>(validation.clone());
    fx.backend.respond(json(
        406,
        json!({
            "X_WINTER_ERROR_MESSAGE": "Please fix the errors",
            "X_WINTER_ERROR_FIELDS": {"email": "invalid"},
        }),
    ));

    let settlement = settle(&fx, RequestOptions::new()).await;

    assert_eq!(validation.count(), 1);
    assert_eq!(fx.dialogs.alerts(), vec!["Please fix the errors"]);
    assert_eq!(
        settlement.dispatched,
        Dispatched::Error {
            validation: true,
            message: true,
            alerted: true,
        }
    );
}

#[tokio::test]
async fn test_validation_callback_receives_form() {
    let fx = Fixture::new();
    fx.backend
        .respond(json(406, json!({"X_WINTER_ERROR_FIELDS": {"name": ["required"]}})));

    let seen = Arc::new(Mutex::new(None));
    let record = seen.clone();
    settle(
        &fx,
        RequestOptions::new().handle_validation_errors(move |form, fields| {
            *record.lock().unwrap() = Some((form, fields.keys().cloned().collect::<Vec<_>>()));
        }),
    )
    .await;

    assert_eq!(
        *seen.lock().unwrap(),
        Some((Some(fx.form), vec!["name".to_string()]))
    );
}
