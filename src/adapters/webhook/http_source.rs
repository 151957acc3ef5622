//! HTTP webhook source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::domain::webhook::{RawEventEnvelope, SIGNATURE_HEADER};
use crate::ports::{FetchError, WebhookSource};

/// Polls a webhook endpoint with one GET per call.
///
/// A 2xx with an empty body (or 204) means "nothing pending". Any other 2xx
/// must carry the `Digital-Signature` header.
pub struct HttpWebhookSource {
    url: Url,
    http_client: reqwest::Client,
}

impl HttpWebhookSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, http_client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl WebhookSource for HttpWebhookSource {
    async fn fetch(&self) -> Result<Option<RawEventEnvelope>, FetchError> {
        let response = self
            .http_client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let signature = response
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read body: {}", e)))?;

        if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        match signature {
            Some(signature) => Ok(Some(RawEventEnvelope::new(body.to_vec(), signature))),
            None => Err(FetchError::MissingSignature),
        }
    }
}
