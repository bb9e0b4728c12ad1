//! Decides whether a notice event is forwarded to ServerChan and, if so,
//! builds the outbound message and interprets the service's reply.
//!
//! Dispatch is fire-and-forget: the event bus does not consume a result,
//! so every outcome is reported on the log stream and nothing propagates
//! past `handle_notice_event`.

use crate::config::NotifierConfig;
use crate::serverchan::{SendError, ServerChanApi};
use crate::types::NoticeEvent;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Forwards notice events to ServerChan according to an immutable
/// configuration snapshot. Holds no mutable state, so concurrent
/// invocations of `handle_notice_event` are safe.
pub struct NotificationDispatcher<C: ServerChanApi> {
    config: NotifierConfig,
    client: Arc<C>,
}

impl<C: ServerChanApi> NotificationDispatcher<C> {
    /// Creates a dispatcher over a configuration snapshot. Reconfiguration
    /// means building a new dispatcher, never mutating this one.
    pub fn new(config: NotifierConfig, client: Arc<C>) -> Self {
        Self { config, client }
    }

    /// True when the channel is enabled and a send key is configured.
    pub fn is_active(&self) -> bool {
        self.config.enabled && !self.config.send_key.is_empty()
    }

    /// Handles one notice event.
    pub async fn handle_notice_event(&self, event: &NoticeEvent) {
        if !self.is_active() {
            return;
        }
        if event.is_empty() {
            return;
        }
        // An event already bound to a delivery channel is handled by that
        // channel; forwarding it here would double-send.
        if event.channel.as_deref().is_some_and(|c| !c.is_empty()) {
            return;
        }

        let title = event.title.as_deref().unwrap_or("");
        let text = event.text.as_deref().unwrap_or("");
        if title.is_empty() && text.is_empty() {
            warn!("title and text cannot both be empty");
            return;
        }

        if let Some(msg_type) = event.msg_type {
            if !self.config.msg_types.is_empty()
                && !self.config.msg_types.iter().any(|t| t == msg_type.as_str())
            {
                info!(
                    msg_type = %msg_type,
                    "message type not enabled for ServerChan, skipping"
                );
                return;
            }
        }

        let mut body = text.to_string();
        if let Some(image) = event.image.as_deref() {
            body.push_str("\r\n![image](");
            body.push_str(image);
            body.push(')');
        }

        // A blank key must never reach the network, even if the active
        // guard above changes.
        if self.config.send_key.is_empty() {
            return;
        }

        match self.client.send(title, &body, &self.config.tag).await {
            Ok(reply) if reply.code == 0 => {
                info!("ServerChan message sent");
            }
            Ok(reply) => {
                warn!(
                    code = reply.code,
                    "ServerChan message send failed: {}", reply.message
                );
            }
            Err(SendError::Rejected { status, .. }) => {
                warn!(status, "ServerChan message send failed");
            }
            Err(e) => {
                error!(error = %e, "ServerChan message send failed");
            }
        }
    }
}
