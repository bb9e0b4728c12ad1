//! Notice event payloads and common type aliases.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// The host application's notification categories.
///
/// Configuration allow-lists refer to these by their variant name
/// (e.g. `"Download"`), which is also how they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum MessageType {
    Download,
    Organize,
    Subscribe,
    SiteMessage,
    MediaServer,
    Manual,
    Plugin,
    Other,
}

impl MessageType {
    /// The stable name used in configuration allow-lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Download => "Download",
            MessageType::Organize => "Organize",
            MessageType::Subscribe => "Subscribe",
            MessageType::SiteMessage => "SiteMessage",
            MessageType::MediaServer => "MediaServer",
            MessageType::Manual => "Manual",
            MessageType::Plugin => "Plugin",
            MessageType::Other => "Other",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notice event as published on the host event bus.
///
/// Every field is optional; the host fills in whatever the originating
/// notification carried.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NoticeEvent {
    /// Delivery channel this event is already bound to, if any. A set
    /// channel means the event is handled by another delivery path.
    #[serde(default)]
    pub channel: Option<String>,
    /// The notification category, used for allow-list filtering.
    #[serde(default, rename = "type")]
    pub msg_type: Option<MessageType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Image URL appended to the outbound body as markdown.
    #[serde(default)]
    pub image: Option<String>,
}

impl NoticeEvent {
    /// True when the event carries no payload at all.
    pub fn is_empty(&self) -> bool {
        self.channel.is_none()
            && self.msg_type.is_none()
            && self.title.is_none()
            && self.text.is_none()
            && self.image.is_none()
    }
}

pub type NoticeSender = broadcast::Sender<NoticeEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_round_trips_variant_name() {
        let json = serde_json::to_string(&MessageType::SiteMessage).unwrap();
        assert_eq!(json, "\"SiteMessage\"");
        let parsed: MessageType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageType::SiteMessage);
        assert_eq!(parsed.as_str(), "SiteMessage");
    }

    #[test]
    fn test_event_with_all_fields_absent_is_empty() {
        assert!(NoticeEvent::default().is_empty());
        let event = NoticeEvent {
            text: Some("hello".to_string()),
            ..Default::default()
        };
        assert!(!event.is_empty());
    }

    #[test]
    fn test_event_deserializes_with_missing_fields() {
        let event: NoticeEvent =
            serde_json::from_str(r#"{"title": "t", "type": "Download"}"#).unwrap();
        assert_eq!(event.title.as_deref(), Some("t"));
        assert_eq!(event.msg_type, Some(MessageType::Download));
        assert!(event.channel.is_none());
        assert!(event.image.is_none());
    }
}
