//! # WhatsApp API Client
//!
//! Client for the WhatsApp Business Cloud API send surface. One instance
//! is created at startup and shared through the application state.
//!
//! Every send method resolves to a [`SendResult`]: provider rejections
//! and transport failures are folded into the result value, so nothing
//! in this module returns an error to its caller.

use super::schemas::outgoing::{
    ButtonSpec, ListSection, MarkAsReadRequest, MediaKind, OutgoingMessage,
};
use crate::{config, consts, metric};
use serde::{Deserialize, Serialize};

/// Outcome of a message send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendResult {
    pub success: bool,
    /// Provider-assigned message ID; may be absent even on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderError>,
}

impl SendResult {
    fn sent(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    fn failed(error: ProviderError) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error),
        }
    }
}

/// Outcome of a media URL lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaUrlResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderError>,
}

/// Structured error returned by the Graph API.
///
/// Known fields are typed; whatever else the provider attaches
/// (`error_data`, `fbtrace_id`, ...) rides along in `details` verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl ProviderError {
    /// Synthetic error for failures without a structured provider body
    fn unknown(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error_type: Some("unknown_error".to_string()),
            code: None,
            details: serde_json::Map::new(),
        }
    }
}

/// Provider response for a successful send
#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    #[serde(default)]
    id: Option<String>,
}

/// Provider error envelope
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ProviderError>,
}

/// Provider response for a media URL lookup
#[derive(Debug, Default, Deserialize)]
struct MediaInfoResponse {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    file_size: Option<u64>,
}

/// WhatsApp API client for sending messages and resolving media
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Endpoint receiving all sends and read receipts
    send_endpoint: String,
    /// Authentication token
    auth_token: String,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client from the global configuration
    pub fn new() -> Self {
        let app_config = &*config::APP_CONFIG;

        Self {
            client: reqwest::Client::new(),
            send_endpoint: app_config.whatsapp_send_msg_endpoint(),
            auth_token: app_config.cloud_api_access_token.clone(),
        }
    }

    /// Sends a text message with link previews enabled
    pub async fn send_text_message(&self, to: String, body: String) -> SendResult {
        self.dispatch(&OutgoingMessage::text(to, body), "text").await
    }

    /// Sends a pre-approved template message.
    ///
    /// `language_code` falls back to the default template language when
    /// the caller supplies none.
    pub async fn send_template_message(
        &self,
        to: String,
        template_name: String,
        language_code: Option<String>,
        components: Vec<serde_json::Value>,
    ) -> SendResult {
        let language_code =
            language_code.unwrap_or_else(|| consts::DEFAULT_TEMPLATE_LANGUAGE.to_string());
        self.dispatch(
            &OutgoingMessage::template(to, template_name, language_code, components),
            "template",
        )
        .await
    }

    /// Sends a media message (image, video, document, audio) from a link
    pub async fn send_media_message(
        &self,
        to: String,
        kind: MediaKind,
        link: String,
        caption: &str,
        filename: &str,
    ) -> SendResult {
        self.dispatch(&OutgoingMessage::media(to, kind, link, caption, filename), kind.as_str())
            .await
    }

    /// Sends an interactive reply-buttons message
    pub async fn send_buttons_message(
        &self,
        to: String,
        body_text: String,
        buttons: Vec<ButtonSpec>,
        header_text: &str,
        footer_text: &str,
    ) -> SendResult {
        self.dispatch(
            &OutgoingMessage::buttons(to, body_text, buttons, header_text, footer_text),
            "buttons",
        )
        .await
    }

    /// Sends an interactive list message
    pub async fn send_list_message(
        &self,
        to: String,
        body_text: String,
        button_text: String,
        sections: Vec<ListSection>,
        header_text: &str,
        footer_text: &str,
    ) -> SendResult {
        self.dispatch(
            &OutgoingMessage::list(to, body_text, button_text, sections, header_text, footer_text),
            "list",
        )
        .await
    }

    /// Marks an incoming message as read
    pub async fn mark_as_read(&self, message_id: String) -> SendResult {
        self.dispatch(&MarkAsReadRequest::new(message_id), "mark_read")
            .await
    }

    /// Resolves a media ID to its download URL
    pub async fn get_media_url(&self, media_id: &str) -> MediaUrlResult {
        let endpoint = config::APP_CONFIG.whatsapp_media_endpoint(media_id);

        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.auth_token)
            .send()
            .await;

        match response {
            Ok(response) => {
                let success = response.status().is_success();
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                interpret_media_response(success, status, &body)
            }
            Err(err) => MediaUrlResult {
                success: false,
                url: None,
                mime_type: None,
                file_size: None,
                error: Some(ProviderError::unknown(err.to_string())),
            },
        }
    }

    /// Posts any payload to the message-send endpoint and folds the
    /// response into a [`SendResult`]
    async fn dispatch<T: serde::Serialize>(&self, payload: &T, kind: &str) -> SendResult {
        metric::incr_send_statds(kind);

        let response = self
            .client
            .post(&self.send_endpoint)
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .bearer_auth(&self.auth_token)
            .json(payload)
            .send()
            .await;

        let result = match response {
            Ok(response) => {
                let success = response.status().is_success();
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                interpret_send_response(success, status, &body)
            }
            Err(err) => SendResult::failed(ProviderError::unknown(err.to_string())),
        };

        if let Some(error) = &result.error {
            logfire::error!(
                "WhatsApp API error: {error}",
                error = serde_json::to_string(error).unwrap_or_default()
            );
        }

        result
    }
}

/// Maps a send response to a [`SendResult`].
///
/// On success the message ID comes from the first entry of the provider's
/// `messages` array; its absence is not an error. On failure the
/// provider's structured error is passed through verbatim when present.
fn interpret_send_response(success: bool, status: u16, body: &str) -> SendResult {
    if success {
        let parsed: MessageResponse = serde_json::from_str(body).unwrap_or_default();
        return SendResult::sent(parsed.messages.into_iter().next().and_then(|m| m.id));
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    SendResult::failed(parsed.error.unwrap_or_else(|| {
        ProviderError::unknown(format!("WhatsApp API returned status {status}"))
    }))
}

/// Maps a media lookup response to a [`MediaUrlResult`]
fn interpret_media_response(success: bool, status: u16, body: &str) -> MediaUrlResult {
    if success {
        let parsed: MediaInfoResponse = serde_json::from_str(body).unwrap_or_default();
        return MediaUrlResult {
            success: true,
            url: parsed.url,
            mime_type: parsed.mime_type,
            file_size: parsed.file_size,
            error: None,
        };
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    MediaUrlResult {
        success: false,
        url: None,
        mime_type: None,
        file_size: None,
        error: Some(parsed.error.unwrap_or_else(|| {
            ProviderError::unknown(format!("WhatsApp API returned status {status}"))
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_send_success_extracts_message_id() {
        let body = r#"{
            "messaging_product": "whatsapp",
            "contacts": [{"input": "14155551234", "wa_id": "14155551234"}],
            "messages": [{"id": "wamid.ABC"}]
        }"#;

        let result = interpret_send_response(true, 200, body);
        assert!(result.success);
        assert_eq!(result.message_id.as_deref(), Some("wamid.ABC"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_interpret_send_success_without_messages_array() {
        let result = interpret_send_response(true, 200, r#"{"messaging_product": "whatsapp"}"#);
        assert!(result.success);
        assert!(result.message_id.is_none());

        // an unparseable success body is still a success
        let result = interpret_send_response(true, 200, "not json");
        assert!(result.success);
        assert!(result.message_id.is_none());
    }

    #[test]
    fn test_interpret_send_failure_passes_provider_error_through() {
        let body = r#"{
            "error": {
                "message": "(#131030) Recipient phone number not in allowed list",
                "type": "OAuthException",
                "code": 131030,
                "fbtrace_id": "Az8or2"
            }
        }"#;

        let result = interpret_send_response(false, 400, body);
        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(
            error.message.as_deref(),
            Some("(#131030) Recipient phone number not in allowed list")
        );
        assert_eq!(error.error_type.as_deref(), Some("OAuthException"));
        assert_eq!(error.code, Some(131030));
        assert_eq!(error.details["fbtrace_id"], "Az8or2");
    }

    #[test]
    fn test_interpret_send_failure_without_structured_error() {
        let result = interpret_send_response(false, 502, "<html>Bad Gateway</html>");
        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.error_type.as_deref(), Some("unknown_error"));
        assert_eq!(
            error.message.as_deref(),
            Some("WhatsApp API returned status 502")
        );
    }

    #[test]
    fn test_interpret_media_success() {
        let body = r#"{
            "url": "https://lookaside.fbsbx.com/whatsapp_business/attachments/abc",
            "mime_type": "image/jpeg",
            "sha256": "f00",
            "file_size": 123456,
            "id": "media-1"
        }"#;

        let result = interpret_media_response(true, 200, body);
        assert!(result.success);
        assert_eq!(
            result.url.as_deref(),
            Some("https://lookaside.fbsbx.com/whatsapp_business/attachments/abc")
        );
        assert_eq!(result.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(result.file_size, Some(123456));
    }

    #[test]
    fn test_interpret_media_failure() {
        let body = r#"{"error": {"message": "Unsupported get request", "type": "GraphMethodException", "code": 100}}"#;

        let result = interpret_media_response(false, 404, body);
        assert!(!result.success);
        assert!(result.url.is_none());
        assert_eq!(result.error.unwrap().code, Some(100));
    }
}
