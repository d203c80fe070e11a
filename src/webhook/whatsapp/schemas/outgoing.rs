//! # WhatsApp Outgoing Message Schemas
//!
//! Request bodies for the Cloud API message-send endpoint. Each message
//! kind is an explicit variant; the kind tag and the matching content key
//! are produced by serde, so no payload is ever assembled through
//! dynamically-keyed maps.
//!
//! Field presence rules (caption only for image/video, filename only for
//! documents, `components` omitted when empty, header/footer only when
//! non-empty) are encoded in the constructors: a payload is fully formed
//! the moment it is built.

use crate::consts;
use serde::Serialize;

/// Media kinds accepted by the media send endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Document,
    Audio,
}

impl MediaKind {
    /// Parses the wire name of a media kind
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "document" => Some(Self::Document),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
            Self::Audio => "audio",
        }
    }

    /// Captions attach to image and video media only
    fn supports_caption(&self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// Message to send to WhatsApp
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: &'static str,
    /// Recipient addressing mode; absent for template sends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<&'static str>,
    /// Recipient's WhatsApp ID (phone number, digits only)
    pub to: String,
    /// Kind tag plus per-kind content
    #[serde(flatten)]
    pub payload: MessagePayload,
}

/// Per-kind message content; `type` and the content key come from the
/// variant
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    Text { text: TextContent },
    Template { template: TemplateContent },
    Image { image: MediaContent },
    Video { video: MediaContent },
    Document { document: MediaContent },
    Audio { audio: MediaContent },
    Interactive { interactive: InteractiveContent },
}

impl OutgoingMessage {
    /// Creates a text message with link previews enabled
    pub fn text(to: String, body: String) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            recipient_type: Some("individual"),
            to,
            payload: MessagePayload::Text {
                text: TextContent {
                    preview_url: true,
                    body,
                },
            },
        }
    }

    /// Creates a template message.
    ///
    /// An empty `components` list is not serialized at all; the Cloud API
    /// rejects templates carrying an empty components array.
    pub fn template(
        to: String,
        name: String,
        language_code: String,
        components: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            recipient_type: None,
            to,
            payload: MessagePayload::Template {
                template: TemplateContent {
                    name,
                    language: TemplateLanguage {
                        code: language_code,
                    },
                    components: if components.is_empty() {
                        None
                    } else {
                        Some(components)
                    },
                },
            },
        }
    }

    /// Creates a media message from a hosted link.
    ///
    /// The caption attaches only to image and video kinds, the filename
    /// only to documents, and either only when non-empty.
    pub fn media(to: String, kind: MediaKind, link: String, caption: &str, filename: &str) -> Self {
        let content = MediaContent {
            link,
            caption: (kind.supports_caption() && !caption.is_empty())
                .then(|| caption.to_string()),
            filename: (kind == MediaKind::Document && !filename.is_empty())
                .then(|| filename.to_string()),
        };

        let payload = match kind {
            MediaKind::Image => MessagePayload::Image { image: content },
            MediaKind::Video => MessagePayload::Video { video: content },
            MediaKind::Document => MessagePayload::Document { document: content },
            MediaKind::Audio => MessagePayload::Audio { audio: content },
        };

        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            recipient_type: Some("individual"),
            to,
            payload,
        }
    }

    /// Creates an interactive reply-buttons message.
    ///
    /// Buttons without a caller-supplied id get `btn_<index>` ids in
    /// input order.
    pub fn buttons(
        to: String,
        body_text: String,
        buttons: Vec<ButtonSpec>,
        header_text: &str,
        footer_text: &str,
    ) -> Self {
        let buttons = buttons
            .into_iter()
            .enumerate()
            .map(|(index, spec)| ReplyButton {
                button_type: "reply",
                reply: ReplyTarget {
                    id: spec.id.unwrap_or_else(|| format!("btn_{index}")),
                    title: spec.title,
                },
            })
            .collect();

        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            recipient_type: Some("individual"),
            to,
            payload: MessagePayload::Interactive {
                interactive: InteractiveContent::Button {
                    header: InteractiveHeader::from_text(header_text),
                    body: InteractiveBody {
                        text: body_text,
                    },
                    footer: InteractiveFooter::from_text(footer_text),
                    action: ButtonAction { buttons },
                },
            },
        }
    }

    /// Creates an interactive list message
    pub fn list(
        to: String,
        body_text: String,
        button_text: String,
        sections: Vec<ListSection>,
        header_text: &str,
        footer_text: &str,
    ) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            recipient_type: Some("individual"),
            to,
            payload: MessagePayload::Interactive {
                interactive: InteractiveContent::List {
                    header: InteractiveHeader::from_text(header_text),
                    body: InteractiveBody {
                        text: body_text,
                    },
                    footer: InteractiveFooter::from_text(footer_text),
                    action: ListAction {
                        button: button_text,
                        sections,
                    },
                },
            },
        }
    }
}

/// Text content for outgoing messages
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    /// Render URL previews in the message body
    pub preview_url: bool,
    /// Message body text
    pub body: String,
}

/// Template reference with language and optional components
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContent {
    pub name: String,
    pub language: TemplateLanguage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<serde_json::Value>>,
}

/// Template language selector
#[derive(Debug, Clone, Serialize)]
pub struct TemplateLanguage {
    /// BCP-47-ish language code, e.g. "en_US"
    pub code: String,
}

/// Hosted media reference
#[derive(Debug, Clone, Serialize)]
pub struct MediaContent {
    /// Public URL of the media asset
    pub link: String,
    /// Caption, image and video only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Display filename, documents only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Caller-facing description of one reply button
#[derive(Debug, Clone)]
pub struct ButtonSpec {
    /// Developer-defined id; defaults to `btn_<index>` when absent
    pub id: Option<String>,
    /// Label shown to the user
    pub title: String,
}

/// Interactive content, one variant per interactive type
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractiveContent {
    Button {
        #[serde(skip_serializing_if = "Option::is_none")]
        header: Option<InteractiveHeader>,
        body: InteractiveBody,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<InteractiveFooter>,
        action: ButtonAction,
    },
    List {
        #[serde(skip_serializing_if = "Option::is_none")]
        header: Option<InteractiveHeader>,
        body: InteractiveBody,
        #[serde(skip_serializing_if = "Option::is_none")]
        footer: Option<InteractiveFooter>,
        action: ListAction,
    },
}

/// Interactive message header (text type)
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveHeader {
    #[serde(rename = "type")]
    pub header_type: &'static str,
    pub text: String,
}

impl InteractiveHeader {
    /// A header is only attached for non-empty text
    fn from_text(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| Self {
            header_type: "text",
            text: text.to_string(),
        })
    }
}

/// Interactive message body
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveBody {
    pub text: String,
}

/// Interactive message footer
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveFooter {
    pub text: String,
}

impl InteractiveFooter {
    /// A footer is only attached for non-empty text
    fn from_text(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| Self {
            text: text.to_string(),
        })
    }
}

/// Action block of a reply-buttons message
#[derive(Debug, Clone, Serialize)]
pub struct ButtonAction {
    pub buttons: Vec<ReplyButton>,
}

/// One reply button on the wire
#[derive(Debug, Clone, Serialize)]
pub struct ReplyButton {
    #[serde(rename = "type")]
    pub button_type: &'static str,
    pub reply: ReplyTarget,
}

/// Id and title of a reply button
#[derive(Debug, Clone, Serialize)]
pub struct ReplyTarget {
    pub id: String,
    pub title: String,
}

/// Action block of a list message
#[derive(Debug, Clone, Serialize)]
pub struct ListAction {
    /// Label of the button opening the list
    pub button: String,
    pub sections: Vec<ListSection>,
}

/// List section containing rows
#[derive(Debug, Clone, Serialize)]
pub struct ListSection {
    /// Optional section title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Rows shown in the section
    pub rows: Vec<ListRow>,
}

/// List row (selectable item)
#[derive(Debug, Clone, Serialize)]
pub struct ListRow {
    /// Unique row ID
    pub id: String,
    /// Row title (displayed to user)
    pub title: String,
    /// Optional row description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListRow {
    /// Creates a new list row
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            description: None,
        }
    }

    /// Creates a new list row with description
    pub fn new_with_description(id: String, title: String, description: String) -> Self {
        Self {
            id,
            title,
            description: Some(description),
        }
    }
}

/// Read-receipt request; posts to the same endpoint as message sends
#[derive(Debug, Clone, Serialize)]
pub struct MarkAsReadRequest {
    pub messaging_product: &'static str,
    pub status: &'static str,
    pub message_id: String,
}

impl MarkAsReadRequest {
    pub fn new(message_id: String) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT,
            status: "read",
            message_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_shape() {
        let message = OutgoingMessage::text("14155551234".into(), "hello there".into());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["recipient_type"], "individual");
        assert_eq!(json["to"], "14155551234");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["preview_url"], true);
        assert_eq!(json["text"]["body"], "hello there");
    }

    #[test]
    fn test_template_without_components_omits_key() {
        let message =
            OutgoingMessage::template("14155551234".into(), "welcome".into(), "en_US".into(), vec![]);
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "template");
        assert_eq!(json["template"]["name"], "welcome");
        assert_eq!(json["template"]["language"]["code"], "en_US");
        // an empty components list must not be serialized as []
        assert!(json["template"].get("components").is_none());
        // templates are addressed without recipient_type
        assert!(json.get("recipient_type").is_none());
    }

    #[test]
    fn test_template_with_components_keeps_them() {
        let components = vec![serde_json::json!({
            "type": "body",
            "parameters": [{"type": "text", "text": "123456"}]
        })];
        let message = OutgoingMessage::template(
            "14155551234".into(),
            "verify_code".into(),
            "es".into(),
            components,
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["template"]["components"][0]["type"], "body");
    }

    #[test]
    fn test_document_caption_without_filename() {
        let message = OutgoingMessage::media(
            "14155551234".into(),
            MediaKind::Document,
            "https://cdn.example.com/report.pdf".into(),
            "monthly report",
            "",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "document");
        assert_eq!(json["document"]["link"], "https://cdn.example.com/report.pdf");
        // documents do not take captions
        assert!(json["document"].get("caption").is_none());
        assert!(json["document"].get("filename").is_none());
    }

    #[test]
    fn test_document_filename_attached_when_present() {
        let message = OutgoingMessage::media(
            "14155551234".into(),
            MediaKind::Document,
            "https://cdn.example.com/report.pdf".into(),
            "",
            "report.pdf",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["document"]["filename"], "report.pdf");
        assert!(json["document"].get("caption").is_none());
    }

    #[test]
    fn test_image_filename_is_never_attached() {
        let message = OutgoingMessage::media(
            "14155551234".into(),
            MediaKind::Image,
            "https://cdn.example.com/cat.jpg".into(),
            "",
            "cat.jpg",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "image");
        // filename only applies to documents, caption was empty
        assert!(json["image"].get("filename").is_none());
        assert!(json["image"].get("caption").is_none());
    }

    #[test]
    fn test_image_caption_attached_when_present() {
        let message = OutgoingMessage::media(
            "14155551234".into(),
            MediaKind::Image,
            "https://cdn.example.com/cat.jpg".into(),
            "a cat",
            "",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["image"]["caption"], "a cat");
    }

    #[test]
    fn test_audio_takes_neither_caption_nor_filename() {
        let message = OutgoingMessage::media(
            "14155551234".into(),
            MediaKind::Audio,
            "https://cdn.example.com/note.ogg".into(),
            "spoken note",
            "note.ogg",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "audio");
        assert!(json["audio"].get("caption").is_none());
        assert!(json["audio"].get("filename").is_none());
    }

    #[test]
    fn test_buttons_default_ids_follow_input_order() {
        let message = OutgoingMessage::buttons(
            "14155551234".into(),
            "Pick one:".into(),
            vec![
                ButtonSpec { id: None, title: "First".into() },
                ButtonSpec { id: Some("custom".into()), title: "Second".into() },
                ButtonSpec { id: None, title: "Third".into() },
            ],
            "",
            "",
        );
        let json = serde_json::to_value(&message).unwrap();

        let buttons = &json["interactive"]["action"]["buttons"];
        assert_eq!(json["interactive"]["type"], "button");
        assert_eq!(buttons[0]["type"], "reply");
        assert_eq!(buttons[0]["reply"]["id"], "btn_0");
        assert_eq!(buttons[1]["reply"]["id"], "custom");
        assert_eq!(buttons[2]["reply"]["id"], "btn_2");
        // empty header and footer stay off the wire
        assert!(json["interactive"].get("header").is_none());
        assert!(json["interactive"].get("footer").is_none());
    }

    #[test]
    fn test_buttons_header_and_footer_attached_when_non_empty() {
        let message = OutgoingMessage::buttons(
            "14155551234".into(),
            "Pick one:".into(),
            vec![ButtonSpec { id: None, title: "Go".into() }],
            "Main Menu",
            "Powered by the gateway",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["interactive"]["header"]["type"], "text");
        assert_eq!(json["interactive"]["header"]["text"], "Main Menu");
        assert_eq!(json["interactive"]["footer"]["text"], "Powered by the gateway");
    }

    #[test]
    fn test_list_message_shape() {
        let sections = vec![ListSection {
            title: Some("Commands".into()),
            rows: vec![
                ListRow::new("cmd_help".into(), "help".into()),
                ListRow::new_with_description(
                    "cmd_time".into(),
                    "time".into(),
                    "current UTC time".into(),
                ),
            ],
        }];
        let message = OutgoingMessage::list(
            "14155551234".into(),
            "What do you need?".into(),
            "options".into(),
            sections,
            "",
            "",
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["interactive"]["type"], "list");
        assert_eq!(json["interactive"]["action"]["button"], "options");
        let rows = &json["interactive"]["action"]["sections"][0]["rows"];
        assert_eq!(rows[0]["id"], "cmd_help");
        assert!(rows[0].get("description").is_none());
        assert_eq!(rows[1]["description"], "current UTC time");
    }

    #[test]
    fn test_mark_as_read_shape() {
        let request = MarkAsReadRequest::new("wamid.42".into());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["status"], "read");
        assert_eq!(json["message_id"], "wamid.42");
    }

    #[test]
    fn test_media_kind_parse() {
        assert_eq!(MediaKind::parse("image"), Some(MediaKind::Image));
        assert_eq!(MediaKind::parse("audio"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::parse("sticker"), None);
        assert_eq!(MediaKind::parse(""), None);
    }
}
