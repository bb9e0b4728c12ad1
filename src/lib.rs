//! NoticePush - a ServerChan notice-forwarding channel
//!
//! This library forwards notice events published by a host application to
//! the ServerChan push-messaging service. The host owns the event bus; this
//! crate provides the configuration surface, the dispatch logic, a client
//! for the ServerChan send API, and a subscriber task that wires the
//! dispatcher onto a broadcast channel of notice events.

pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod serverchan;
pub mod subscriber;
pub mod types;

// Re-export the types a host needs to embed the channel.
pub use config::{Config, NotifierConfig};
pub use dispatcher::NotificationDispatcher;
pub use subscriber::NoticeSubscriber;
pub use types::{MessageType, NoticeEvent, NoticeSender};
