//! A client for the ServerChan push-messaging send API.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::LazyLock;
use thiserror::Error;
use tokio::task;
use tracing::{error, instrument};

/// Dedicated-push keys look like `sctp<n>t...`; `<n>` selects the host.
static SCTP_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sctp(\d+)t").expect("hardcoded pattern is valid"));

/// The structured reply returned by the ServerChan send endpoint.
///
/// A `code` of zero means the message was accepted; anything else carries
/// a human-readable `message`. Extra fields in the reply are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendReply {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Errors from the send path.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("send key is empty")]
    EmptyKey,
    #[error("send key is not a valid sctp key: {0}")]
    MalformedKey(String),
    /// The service answered with a non-success HTTP status.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, body: String },
    /// The request never completed or the reply body was unreadable.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("send task panicked: {0}")]
    Task(#[from] task::JoinError),
}

/// Derives the send endpoint for a key.
///
/// Keys matching `sctp<n>t...` address a dedicated push host; every other
/// non-empty key goes through the shared API host.
pub fn api_url(send_key: &str) -> Result<String, SendError> {
    if send_key.is_empty() {
        return Err(SendError::EmptyKey);
    }
    if send_key.starts_with("sctp") {
        let caps = SCTP_KEY
            .captures(send_key)
            .ok_or_else(|| SendError::MalformedKey(send_key.to_string()))?;
        Ok(format!(
            "https://{}.push.ft07.com/send/{}.send",
            &caps[1], send_key
        ))
    } else {
        Ok(format!("https://sctapi.ftqq.com/{}.send", send_key))
    }
}

/// A trait for clients that can push a message to ServerChan.
#[async_trait]
pub trait ServerChanApi: Send + Sync {
    /// Sends one message and returns the service's structured reply.
    async fn send(&self, title: &str, body: &str, tags: &str) -> Result<SendReply, SendError>;
}

/// The HTTP client for the ServerChan send endpoint.
pub struct ServerChanClient {
    url: String,
    timeout: std::time::Duration,
}

impl ServerChanClient {
    /// Creates a client for the given send key.
    pub fn new(send_key: &str) -> Result<Self, SendError> {
        Ok(Self {
            url: api_url(send_key)?,
            timeout: std::time::Duration::from_secs(10),
        })
    }

    /// Points the client at an explicit endpoint, bypassing key-based
    /// derivation. Used by tests.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: std::time::Duration::from_secs(10),
        }
    }

    /// Issues the request in a blocking manner.
    fn send_request(
        client: reqwest::blocking::Client,
        url: &str,
        payload: &Value,
    ) -> Result<SendReply, SendError> {
        let response = client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json;charset=utf-8")
            .json(payload)
            .send();

        match response {
            Ok(res) => {
                let status = res.status();
                if status.is_success() {
                    Ok(res.json()?)
                } else {
                    let body = res.text().unwrap_or_default();
                    error!(
                        status = %status,
                        body = %body,
                        "ServerChan rejected the send request"
                    );
                    Err(SendError::Rejected {
                        status: status.as_u16(),
                        body,
                    })
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to ServerChan failed");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl ServerChanApi for ServerChanClient {
    #[instrument(skip_all)]
    async fn send(&self, title: &str, body: &str, tags: &str) -> Result<SendReply, SendError> {
        let payload = json!({ "title": title, "desp": body, "tags": tags });
        let url = self.url.clone();
        let timeout = self.timeout;
        task::spawn_blocking(move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?;
            Self::send_request(client, &url, &payload)
        })
        .await?
    }
}
