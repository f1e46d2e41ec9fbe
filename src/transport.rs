//! reqwest-backed transport for the inference endpoint

use crate::error::Result;
use reqwest::header::CONTENT_TYPE;
use samgis_prompt_common::transport::{HttpReply, HttpTransport, JSON_CONTENT_TYPE};
use std::time::Duration;

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// `timeout_seconds == 0` disables the client timeout
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_seconds));
        }
        Ok(Self { client: builder.build()? })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: String) -> samgis_prompt_common::Result<HttpReply> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| samgis_prompt_common::Error::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "inference endpoint answered");

        let body = response
            .text()
            .await
            .map_err(|e| samgis_prompt_common::Error::Transport(e.to_string()));

        Ok(HttpReply {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
