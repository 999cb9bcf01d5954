//! # Inbound Events
//!
//! The transport layer turns raw platform updates into one of two typed
//! events. Both carry a user identifier and an optional payload, so pipeline
//! stages use the common accessors and never branch on the concrete type
//! unless the semantics differ.

use serde::{Deserialize, Serialize};

use crate::entities::{UserId, UserProfile};

/// Channel an event arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Plain message.
    Message,
    /// Callback (button press).
    Callback,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::Callback => "callback",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plain message from a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub user_id: UserId,
    /// Conversation the message was posted in.
    #[serde(default)]
    pub chat_id: Option<i64>,
    /// Message text; `None` for media or service messages.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

/// A callback (inline button press) from a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackEvent {
    pub user_id: UserId,
    /// Transport-assigned callback identifier, used to answer the press.
    #[serde(default)]
    pub callback_id: String,
    /// Button payload.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

/// One inbound unit of interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message(MessageEvent),
    Callback(CallbackEvent),
}

impl InboundEvent {
    /// Convenience constructor for a text message.
    pub fn message(user_id: UserId, text: impl Into<String>) -> Self {
        InboundEvent::Message(MessageEvent {
            user_id,
            chat_id: Some(user_id),
            text: Some(text.into()),
            profile: UserProfile::default(),
        })
    }

    /// Convenience constructor for a callback with a payload.
    pub fn callback(user_id: UserId, data: impl Into<String>) -> Self {
        InboundEvent::Callback(CallbackEvent {
            user_id,
            callback_id: String::new(),
            data: Some(data.into()),
            profile: UserProfile::default(),
        })
    }

    pub fn user_id(&self) -> UserId {
        match self {
            InboundEvent::Message(m) => m.user_id,
            InboundEvent::Callback(c) => c.user_id,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::Message(_) => EventKind::Message,
            InboundEvent::Callback(_) => EventKind::Callback,
        }
    }

    /// Message text or callback data.
    pub fn payload(&self) -> Option<&str> {
        match self {
            InboundEvent::Message(m) => m.text.as_deref(),
            InboundEvent::Callback(c) => c.data.as_deref(),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        match self {
            InboundEvent::Message(m) => &m.profile,
            InboundEvent::Callback(c) => &c.profile,
        }
    }
}
