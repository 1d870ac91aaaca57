//! Building the wire request and classifying what comes back.

use crate::{descriptor::RequestDescriptor, environment::Environment};
use serde_json::Value;
use splice_core::{
    ErrorPayload, FieldValue, NormalizedOutcome, RawResponse, RequestBody, SuccessPayload,
    TransportError, WireRequest,
    wire::{
        HEADER_FLASH, HEADER_HANDLER, HEADER_PARTIALS, HEADER_REQUESTED_WITH, HEADER_XSRF,
        REQUESTED_WITH_VALUE,
    },
};
use tracing::{debug, warn};

/// Performs the exchange for one request. Never fails: every failure becomes
/// an [`ErrorPayload`].
pub struct TransportClient<'a> {
    env: &'a Environment,
}

impl<'a> TransportClient<'a> {
    /// Use the backend, token source and config of `env`.
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// The POST this descriptor turns into.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> WireRequest {
        let options = descriptor.options();
        let mut headers = vec![
            (HEADER_REQUESTED_WITH.to_owned(), REQUESTED_WITH_VALUE.to_owned()),
            (HEADER_HANDLER.to_owned(), descriptor.handler().to_string()),
            (HEADER_PARTIALS.to_owned(), options.update.header_value()),
        ];
        if options.flash {
            headers.push((HEADER_FLASH.to_owned(), "1".to_owned()));
        }
        if let Some(token) = self.env.token().token() {
            headers.push((HEADER_XSRF.to_owned(), token));
        }

        let mut fields = descriptor
            .form()
            .map(|form| self.env.document().form_fields(form))
            .unwrap_or_default();
        for (key, value) in &options.data {
            fields.retain(|(name, _)| name != key);
            fields.push((key.clone(), FieldValue::Text(value.clone())));
        }

        let body = if options.files {
            RequestBody::Multipart(fields)
        } else {
            RequestBody::Form(
                fields
                    .into_iter()
                    .filter_map(|(name, value)| match value {
                        FieldValue::Text(text) => Some((name, text)),
                        FieldValue::File(_) => None,
                    })
                    .collect(),
            )
        };

        WireRequest {
            url: descriptor.url().to_owned(),
            headers,
            body,
        }
    }

    /// Send and classify.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> NormalizedOutcome {
        let request = self.build_request(descriptor);
        debug!(url = %request.url, handler = %descriptor.handler(), "sending request");

        let exchange = self.env.backend().post(request);
        let response = match self.env.config().request_timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(result) => result.map_err(TransportError::from),
                Err(_) => Err(TransportError::Timeout(limit)),
            },
            None => exchange.await.map_err(TransportError::from),
        };

        match response {
            Ok(response) => classify(response, descriptor.options().update.first_partial()),
            Err(err) => {
                warn!(error = %err, "request failed without a response");
                NormalizedOutcome::Error(failure(&err))
            }
        }
    }
}

fn failure(err: &TransportError) -> ErrorPayload {
    ErrorPayload::message(err.to_string())
}

/// Classify a raw response by status and content type.
///
/// 2xx and the soft failure status take the success branch, the latter
/// flagged unsuccessful. A non-JSON success body becomes the content of
/// `default_partial`.
pub fn classify(response: RawResponse, default_partial: Option<&str>) -> NormalizedOutcome {
    let status = response.status;

    if !response.is_ok() && !response.is_soft_failure() {
        let error = if response.is_json() {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(Value::Object(object)) => ErrorPayload::from_json(object),
                Ok(other) => ErrorPayload::message(other.to_string()),
                Err(err) => failure(&TransportError::Json(err)),
            }
        } else if response.body.trim().is_empty() {
            failure(&TransportError::Status { status })
        } else {
            ErrorPayload::message(response.body)
        };
        return NormalizedOutcome::Error(error.with_status(status));
    }

    let success = !response.is_soft_failure();
    if !response.is_json() {
        return NormalizedOutcome::Success(SuccessPayload::from_text(
            default_partial,
            response.body,
            success,
        ));
    }
    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => NormalizedOutcome::Success(SuccessPayload::from_json(value, success)),
        Err(err) => {
            NormalizedOutcome::Error(failure(&TransportError::Json(err)).with_status(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(outcome: NormalizedOutcome) -> ErrorPayload {
        match outcome {
            NormalizedOutcome::Error(error) => error,
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[test]
    fn test_soft_failure_takes_success_branch() {
        let outcome = classify(RawResponse::json(406, r#"{"foo": "<p>hi</p>"}"#), None);
        let payload = outcome.payload().unwrap();
        assert!(!payload.success);
        assert_eq!(payload.partials["foo"], "<p>hi</p>");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_text_success_uses_default_partial() {
        let outcome = classify(RawResponse::text(200, "<b>ok</b>"), Some("result"));
        assert!(outcome.is_success());
        assert_eq!(outcome.payload().unwrap().partials["result"], "<b>ok</b>");

        let outcome = classify(RawResponse::text(200, "<b>ok</b>"), None);
        assert!(outcome.payload().unwrap().partials.is_empty());
    }

    #[test]
    fn test_error_statuses() {
        let error = error_of(classify(
            RawResponse::json(500, r#"{"message": "boom", "exception": "RuntimeError"}"#),
            None,
        ));
        assert_eq!(error.message.as_deref(), Some("boom"));
        assert_eq!(error.exception.as_deref(), Some("RuntimeError"));
        assert_eq!(error.status, Some(500));

        let error = error_of(classify(RawResponse::text(404, "Not here"), None));
        assert_eq!(error.message.as_deref(), Some("Not here"));

        let error = error_of(classify(RawResponse::text(502, ""), None));
        assert_eq!(error.message.as_deref(), Some("server responded with status 502"));
    }

    #[test]
    fn test_unparsable_json_names_cause() {
        let error = error_of(classify(RawResponse::json(200, "{not json"), None));
        assert!(error.message.unwrap().starts_with("invalid JSON response"));
        assert_eq!(error.status, Some(200));
    }
}
