//! # Webhook Event Normalizer
//!
//! Turns the provider's nested webhook envelope into the gateway's
//! internal event model. `normalize` is a total function: any envelope
//! shape, however malformed, yields `Some` event or `None`, never an
//! error. The webhook receiver relies on this to always acknowledge
//! deliveries.

use super::schemas::incoming::{ChangeValue, Contact, Message, Metadata, Status, WebhookPayload};
use crate::consts;
use serde::Serialize;

/// Actionable webhook content
#[derive(Debug, Clone, Serialize)]
pub enum WebhookEvent {
    /// A new inbound message
    Message(InboundMessage),
    /// A delivery status update for a previously sent message
    Status(StatusUpdate),
}

/// Normalized inbound message
#[derive(Debug, Clone, Serialize)]
pub struct InboundMessage {
    /// Sender's WhatsApp ID (phone number)
    pub from: String,
    pub message_id: String,
    pub timestamp: String,
    /// Kind tag as delivered by the provider
    pub kind: String,
    pub content: MessageContent,
    /// Sender contact entry, passed through when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// Receiving-number metadata, passed through when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Normalized delivery status update, copied verbatim from the envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub message_id: String,
    pub status: String,
    pub timestamp: String,
    pub recipient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
}

/// Per-kind message content.
///
/// Every field is optional-safe: an absent upstream field stays absent
/// here. Kinds the gateway does not model are passed through raw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        body: Option<String>,
    },
    Image(MediaRef),
    Video(MediaRef),
    Document(DocumentRef),
    Audio(AudioRef),
    Location {
        latitude: Option<f64>,
        longitude: Option<f64>,
        name: Option<String>,
        address: Option<String>,
    },
    /// Selection from an interactive buttons message
    ButtonReply {
        id: Option<String>,
        title: Option<String>,
    },
    /// Selection from an interactive list message
    ListReply {
        id: Option<String>,
        title: Option<String>,
        description: Option<String>,
    },
    /// Interactive block of a type the gateway does not model
    Interactive(serde_json::Value),
    /// Quick-reply button press
    Button {
        text: Option<String>,
        payload: Option<String>,
    },
    /// Message element of a kind the gateway does not model
    Raw(serde_json::Value),
}

/// Inbound image, video or generic media reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRef {
    pub id: Option<String>,
    pub mime_type: Option<String>,
    pub caption: Option<String>,
    pub sha256: Option<String>,
}

/// Inbound document reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRef {
    pub id: Option<String>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub caption: Option<String>,
    pub sha256: Option<String>,
}

/// Inbound audio reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioRef {
    pub id: Option<String>,
    pub mime_type: Option<String>,
    pub sha256: Option<String>,
}

/// Normalizes a webhook envelope into an actionable event.
///
/// Only the first message (or, failing that, the first status) of the
/// first change of the first entry is consulted; a message always takes
/// precedence over a status. `None` means the envelope carries no
/// actionable data.
pub fn normalize(payload: &WebhookPayload) -> Option<WebhookEvent> {
    if payload.object != consts::WEBHOOK_OBJECT_TYPE {
        return None;
    }

    let value = payload.entry.first()?.changes.first()?.value.as_ref()?;

    if let Some(message) = value.messages.as_deref().and_then(|messages| messages.first()) {
        return Some(WebhookEvent::Message(normalize_message(message, value)));
    }

    if let Some(status) = value.statuses.as_deref().and_then(|statuses| statuses.first()) {
        return Some(WebhookEvent::Status(normalize_status(status)));
    }

    None
}

fn normalize_message(message: &Message, value: &ChangeValue) -> InboundMessage {
    InboundMessage {
        from: message.from.clone(),
        message_id: message.id.clone(),
        timestamp: message.timestamp.clone(),
        kind: message.msg_type.clone(),
        content: extract_content(message),
        contact: value
            .contacts
            .as_deref()
            .and_then(|contacts| contacts.first())
            .cloned(),
        metadata: value.metadata.clone(),
    }
}

fn normalize_status(status: &Status) -> StatusUpdate {
    StatusUpdate {
        message_id: status.id.clone(),
        status: status.status.clone(),
        timestamp: status.timestamp.clone(),
        recipient_id: status.recipient_id.clone(),
        errors: status.errors.clone(),
    }
}

/// Dispatches on the message kind tag and extracts the per-kind content
fn extract_content(message: &Message) -> MessageContent {
    match message.msg_type.as_str() {
        "text" => MessageContent::Text {
            body: message.text.as_ref().and_then(|text| text.body.clone()),
        },
        "image" => MessageContent::Image(media_ref(message.image.as_ref())),
        "video" => MessageContent::Video(media_ref(message.video.as_ref())),
        "document" => {
            let document = message.document.as_ref();
            MessageContent::Document(DocumentRef {
                id: document.and_then(|d| d.id.clone()),
                filename: document.and_then(|d| d.filename.clone()),
                mime_type: document.and_then(|d| d.mime_type.clone()),
                caption: document.and_then(|d| d.caption.clone()),
                sha256: document.and_then(|d| d.sha256.clone()),
            })
        }
        "audio" => {
            let audio = message.audio.as_ref();
            MessageContent::Audio(AudioRef {
                id: audio.and_then(|a| a.id.clone()),
                mime_type: audio.and_then(|a| a.mime_type.clone()),
                sha256: audio.and_then(|a| a.sha256.clone()),
            })
        }
        "location" => {
            let location = message.location.as_ref();
            MessageContent::Location {
                latitude: location.and_then(|l| l.latitude),
                longitude: location.and_then(|l| l.longitude),
                name: location.and_then(|l| l.name.clone()),
                address: location.and_then(|l| l.address.clone()),
            }
        }
        "interactive" => extract_interactive(message),
        "button" => {
            let button = message.button.as_ref();
            MessageContent::Button {
                text: button.and_then(|b| b.text.clone()),
                payload: button.and_then(|b| b.payload.clone()),
            }
        }
        _ => MessageContent::Raw(serde_json::to_value(message).unwrap_or_default()),
    }
}

fn extract_interactive(message: &Message) -> MessageContent {
    let Some(interactive) = message.interactive.as_ref() else {
        return MessageContent::Interactive(serde_json::Value::Null);
    };

    match interactive.interactive_type.as_str() {
        "button_reply" => {
            let reply = interactive.button_reply.as_ref();
            MessageContent::ButtonReply {
                id: reply.and_then(|r| r.id.clone()),
                title: reply.and_then(|r| r.title.clone()),
            }
        }
        "list_reply" => {
            let reply = interactive.list_reply.as_ref();
            MessageContent::ListReply {
                id: reply.and_then(|r| r.id.clone()),
                title: reply.and_then(|r| r.title.clone()),
                description: reply.and_then(|r| r.description.clone()),
            }
        }
        _ => MessageContent::Interactive(serde_json::to_value(interactive).unwrap_or_default()),
    }
}

fn media_ref(media: Option<&super::schemas::incoming::MediaMessage>) -> MediaRef {
    MediaRef {
        id: media.and_then(|m| m.id.clone()),
        mime_type: media.and_then(|m| m.mime_type.clone()),
        caption: media.and_then(|m| m.caption.clone()),
        sha256: media.and_then(|m| m.sha256.clone()),
    }
}
