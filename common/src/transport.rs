//! HTTP transport seam
//!
//! The request lifecycle only needs "POST this JSON, give me status and body".
//! Concrete clients (reqwest on the CLI, fetch in a browser, scripted replies
//! in tests) implement `HttpTransport`.

use crate::error::Result;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Response as seen by the request lifecycle
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    /// Reason phrase, empty when the transport has none
    pub status_text: String,
    /// Body text; `Err` when the connection dropped while reading it
    pub body: Result<String>,
}

impl HttpReply {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Ok(body.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// POST `body` to `url` with `Content-type: application/json`
    ///
    /// `Err` only when no response was received at all.
    async fn post_json(&self, url: &str, body: String) -> Result<HttpReply>;
}
