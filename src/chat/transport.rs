//! HTTP/JSON transport for the chat backend.
//!
//! The bearer token is passed on every call instead of being stored as a
//! default header, so one transport can serve concurrent requests made with
//! different credentials.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chat::types::ApiEnvelope;
use crate::error::ChatError;

/// Thin request wrapper around the Web API. No retries: every call is sent
/// at most once.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ChatTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn api_url(&self, operation: &str) -> String {
        format!("{}/{operation}", self.base_url)
    }

    /// Call a Web API method and decode its payload.
    ///
    /// Fails with [`ChatError::Api`] when the request does not complete, the
    /// body is not JSON, or the backend answers `ok: false`.
    pub async fn send<B, T>(
        &self,
        token: &SecretString,
        method: Method,
        operation: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ChatError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .request(method, self.api_url(operation))
            .bearer_auth(token.expose_secret());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatError::api(operation, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::api(operation, e.to_string()))?;

        decode_response(operation, status, &text)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        token: &SecretString,
        operation: &str,
        query: &[(&str, String)],
    ) -> Result<T, ChatError> {
        self.send::<(), T>(token, Method::GET, operation, query, None)
            .await
    }

    pub async fn post<B, T>(
        &self,
        token: &SecretString,
        operation: &str,
        body: &B,
    ) -> Result<T, ChatError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(token, Method::POST, operation, &[], Some(body))
            .await
    }

    /// POST a JSON body and return only the HTTP status.
    ///
    /// For methods whose outcome is judged by status rather than the `ok` flag.
    pub async fn post_for_status<B>(
        &self,
        token: &SecretString,
        operation: &str,
        body: &B,
    ) -> Result<StatusCode, ChatError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.api_url(operation))
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::api(operation, e.to_string()))?;

        Ok(response.status())
    }

    /// PUT raw bytes to a pre-signed upload URL and return the response body.
    pub async fn put_bytes(&self, url: &str, bytes: Vec<u8>) -> Result<String, ChatError> {
        let response = self
            .client
            .put(url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ChatError::api("upload", e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ChatError::api("upload", e.to_string()))
    }
}

/// Check the `ok`/`error` envelope, then decode the payload.
pub(crate) fn decode_response<T: DeserializeOwned>(
    operation: &str,
    status: StatusCode,
    body: &str,
) -> Result<T, ChatError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        let reason = format!("HTTP {status}: response is not valid JSON ({e})");
        ChatError::api(operation, reason)
    })?;

    let envelope = ApiEnvelope::deserialize(&value).map_err(|e| {
        let reason = format!("HTTP {status}: malformed response envelope ({e})");
        ChatError::api(operation, reason)
    })?;

    if !envelope.ok {
        let message = envelope
            .error
            .unwrap_or_else(|| format!("HTTP {status}: backend reported failure"));
        return Err(ChatError::api(operation, message));
    }

    serde_json::from_value(value)
        .map_err(|e| ChatError::api(operation, format!("unexpected response payload ({e})")))
}
