//! # WhatsApp Webhook Schemas
//!
//! Data structures for webhook payloads sent by the WhatsApp Business
//! Cloud API (incoming messages, status updates, etc.).
//!
//! The envelope is untrusted external input: every nested level is
//! optional so that a payload missing any of them still deserializes.
//! Unknown keys on message elements are retained in `extra` maps so the
//! original element can be reproduced for passthrough handling.

use serde::{Deserialize, Serialize};

/// Root webhook payload from WhatsApp
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookPayload {
    /// The object type, "whatsapp_business_account" for business accounts
    #[serde(default)]
    pub object: String,
    /// Array of entry objects containing the actual data
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// Entry object containing changes and metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Entry {
    /// Business Account ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Array of changes that occurred
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// Change object containing the actual webhook data
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Change {
    /// The field that changed (e.g., "messages")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value containing the actual data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ChangeValue>,
}

/// Value object containing messages or statuses plus metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangeValue {
    /// Messaging product (e.g., "whatsapp")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_product: Option<String>,
    /// Metadata about the receiving business phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Array of contacts (senders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    /// Array of messages received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    /// Array of statuses (for sent messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<Status>>,
}

/// Metadata about the WhatsApp Business phone number
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Metadata {
    /// Display name of the business phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_phone_number: Option<String>,
    /// Phone number ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
}

/// Contact information for the message sender
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Contact {
    /// Profile information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// WhatsApp ID (phone number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wa_id: Option<String>,
}

/// Profile information
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Display name of the contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Message object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    /// Sender's WhatsApp ID (phone number)
    #[serde(default)]
    pub from: String,
    /// Message ID
    #[serde(default)]
    pub id: String,
    /// Timestamp of the message
    #[serde(default)]
    pub timestamp: String,
    /// Message type (text, image, video, document, etc.)
    #[serde(rename = "type", default)]
    pub msg_type: String,
    /// Text message content (if type is "text")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextMessage>,
    /// Image message content (if type is "image")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaMessage>,
    /// Video message content (if type is "video")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaMessage>,
    /// Document message content (if type is "document")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaMessage>,
    /// Audio message content (if type is "audio")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaMessage>,
    /// Location message content (if type is "location")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationMessage>,
    /// Interactive reply content (if type is "interactive")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<InteractiveMessage>,
    /// Quick-reply button content (if type is "button")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonMessage>,
    /// Context (if this is a reply to another message)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MessageContext>,
    /// Fields of message kinds this gateway does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Text message content
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextMessage {
    /// The text body of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Media message content (image, video, document, audio)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaMessage {
    /// Media ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// SHA256 hash of the media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Caption (for image, video, document)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Filename (for document)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Location message content
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Name of the location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Address of the location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Interactive reply content
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractiveMessage {
    /// Reply type ("button_reply" or "list_reply")
    #[serde(rename = "type", default)]
    pub interactive_type: String,
    /// Selected button (if type is "button_reply")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_reply: Option<ButtonReply>,
    /// Selected list row (if type is "list_reply")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_reply: Option<ListReply>,
    /// Fields of interactive kinds this gateway does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Button selected from an interactive button message
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Row selected from an interactive list message
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Quick-reply button content
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonMessage {
    /// Button label as shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Developer-defined payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Context for reply messages
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageContext {
    /// Sender of the message being replied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Message ID being referenced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Status update for sent messages
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Status {
    /// Message ID
    #[serde(default)]
    pub id: String,
    /// Status (sent, delivered, read, failed)
    #[serde(default)]
    pub status: String,
    /// Timestamp
    #[serde(default)]
    pub timestamp: String,
    /// Recipient ID
    #[serde(default)]
    pub recipient_id: String,
    /// Provider error details, present on failed deliveries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_message_envelope() {
        let json = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "123456",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {"display_phone_number": "15550001111", "phone_number_id": "phone123"},
                        "contacts": [{"profile": {"name": "Ada"}, "wa_id": "15551234567"}],
                        "messages": [{
                            "from": "15551234567",
                            "id": "wamid.1",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": {"body": "hello"}
                        }]
                    }
                }]
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.object, "whatsapp_business_account");
        let value = payload.entry[0].changes[0].value.as_ref().unwrap();
        let message = &value.messages.as_ref().unwrap()[0];
        assert_eq!(message.from, "15551234567");
        assert_eq!(message.msg_type, "text");
        assert_eq!(message.text.as_ref().unwrap().body.as_deref(), Some("hello"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_levels() {
        // no entry at all
        let payload: WebhookPayload = serde_json::from_str(r#"{"object": "x"}"#).unwrap();
        assert!(payload.entry.is_empty());

        // entry without changes, change without value
        let payload: WebhookPayload = serde_json::from_str(
            r#"{"object": "x", "entry": [{"changes": [{}]}]}"#,
        )
        .unwrap();
        assert!(payload.entry[0].changes[0].value.is_none());
    }

    #[test]
    fn test_unknown_message_kind_keeps_extra_fields() {
        let json = r#"{
            "from": "15551234567",
            "id": "wamid.2",
            "timestamp": "1700000000",
            "type": "sticker",
            "sticker": {"id": "media-9", "animated": false}
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.msg_type, "sticker");
        assert!(message.extra.contains_key("sticker"));

        // serializing reproduces the original element
        let round_trip = serde_json::to_value(&message).unwrap();
        assert_eq!(round_trip["sticker"]["id"], "media-9");
        assert_eq!(round_trip["type"], "sticker");
    }
}
