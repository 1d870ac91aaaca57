//! `reqwest`-backed HTTP backend.

use reqwest::{
    Client,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};
use splice_core::{
    BoxError, BoxFuture, FieldValue, HttpBackend, RawResponse, RequestBody, WireRequest,
};
use std::time::Duration;

/// Sends requests with a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestBackend {
    /// Use a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client (cookie store, proxies, TLS settings).
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Abort requests that take longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn multipart(parts: Vec<(String, FieldValue)>) -> Result<Form, BoxError> {
        let mut form = Form::new();
        for (name, value) in parts {
            form = match value {
                FieldValue::Text(text) => form.text(name, text),
                FieldValue::File(file) => {
                    let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                    if let Some(content_type) = file.content_type {
                        part = part.mime_str(&content_type)?;
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

impl HttpBackend for ReqwestBackend {
    fn post(&self, request: WireRequest) -> BoxFuture<'_, Result<RawResponse, BoxError>> {
        Box::pin(async move {
            let mut builder = self.client.post(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder = match request.body {
                RequestBody::Form(pairs) => builder.form(&pairs),
                RequestBody::Multipart(parts) => builder.multipart(Self::multipart(parts)?),
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(RawResponse {
                status,
                content_type,
                body,
            })
        })
    }
}
