//! # WhatsApp Webhook Handler
//!
//! Business logic applied to normalized webhook events: incoming
//! messages are marked as read and answered with simple command replies,
//! delivery status updates are logged.
//!
//! Send failures are logged and swallowed here; by the time this code
//! runs the webhook has already been acknowledged.

use super::{
    client::WhatsAppClient,
    normalizer::{self, InboundMessage, MessageContent, StatusUpdate, WebhookEvent},
    schemas::incoming::WebhookPayload,
    schemas::outgoing::{ButtonSpec, ListRow, ListSection},
};
use crate::metric;
use chrono::Utc;

/// Main webhook processor.
///
/// Normalizes the payload and dispatches the resulting event. Envelopes
/// without actionable data are logged and dropped.
pub async fn process_webhook(payload: WebhookPayload, client: &WhatsAppClient) {
    let Some(event) = normalizer::normalize(&payload) else {
        logfire::info!("No actionable data in webhook");
        return;
    };

    match event {
        WebhookEvent::Message(message) => {
            metric::incr_webhook_event_statds("message");
            handle_incoming_message(message, client).await;
        }
        WebhookEvent::Status(status) => {
            metric::incr_webhook_event_statds("status");
            handle_status_update(&status);
        }
    }
}

/// Handles one incoming message: read receipt first, then a per-kind
/// reply
async fn handle_incoming_message(message: InboundMessage, client: &WhatsAppClient) {
    logfire::info!(
        "New {kind} message from {from}",
        kind = &message.kind,
        from = &message.from
    );

    if !message.message_id.is_empty() {
        // failures are already logged by the client
        client.mark_as_read(message.message_id.clone()).await;
    }

    let from = message.from.clone();
    match message.content {
        MessageContent::Text { body } => {
            handle_text_message(&from, &body.unwrap_or_default(), client).await;
        }
        MessageContent::Image(media) => {
            reply_media_received(&from, "Thanks for the image!", media.id.as_deref(), client)
                .await;
        }
        MessageContent::Video(media) => {
            reply_media_received(&from, "Video received!", media.id.as_deref(), client).await;
        }
        MessageContent::Document(document) => {
            reply_media_received(&from, "Document received!", document.id.as_deref(), client)
                .await;
        }
        MessageContent::Audio(audio) => {
            reply_media_received(&from, "Audio received!", audio.id.as_deref(), client).await;
        }
        MessageContent::Location {
            latitude,
            longitude,
            ..
        } => {
            let latitude = latitude.map_or_else(|| "?".to_string(), |v| v.to_string());
            let longitude = longitude.map_or_else(|| "?".to_string(), |v| v.to_string());
            client
                .send_text_message(from, format!("Location received: {latitude}, {longitude}"))
                .await;
        }
        MessageContent::ButtonReply { title, .. } => {
            let title = title.unwrap_or_default();
            client
                .send_text_message(from, format!("You clicked: {title}"))
                .await;
        }
        MessageContent::ListReply { title, .. } => {
            let title = title.unwrap_or_default();
            client
                .send_text_message(from, format!("You picked: {title}"))
                .await;
        }
        MessageContent::Button { text, payload } => {
            logfire::info!(
                "Quick reply button pressed: {text} (payload: {payload})",
                text = text.unwrap_or_default(),
                payload = payload.unwrap_or_default()
            );
        }
        MessageContent::Interactive(_) | MessageContent::Raw(_) => {
            logfire::warn!(
                "Unsupported message type received: {kind}",
                kind = &message.kind
            );
        }
    }
}

/// What a text command resolves to
#[derive(Debug, PartialEq)]
enum TextReply {
    Message(String),
    Menu,
    CommandList,
}

/// Maps free text to a reply; anything unrecognized is echoed back
fn classify_text_command(text: &str) -> TextReply {
    let lowered = text.trim().to_lowercase();

    if lowered.contains("hello") || lowered.contains("hi") {
        return TextReply::Message("Hello! How can I help you today?".to_string());
    }
    if lowered.contains("help") {
        return TextReply::Message(
            "Available commands:\n\
             - Send \"hello\" for a greeting\n\
             - Send \"time\" for the current time\n\
             - Send \"menu\" for the interactive menu\n\
             - Send \"list\" for the command list\n\
             - Send anything else for an echo response"
                .to_string(),
        );
    }
    if lowered.contains("time") {
        return TextReply::Message(format!(
            "Current time: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if lowered.contains("menu") {
        return TextReply::Menu;
    }
    if lowered.contains("list") {
        return TextReply::CommandList;
    }

    TextReply::Message(format!(
        "You said: \"{text}\"\n\nType \"help\" to see available commands."
    ))
}

async fn handle_text_message(from: &str, text: &str, client: &WhatsAppClient) {
    match classify_text_command(text) {
        TextReply::Message(reply) => {
            client.send_text_message(from.to_string(), reply).await;
        }
        TextReply::Menu => {
            client
                .send_buttons_message(
                    from.to_string(),
                    "Please choose an option:".to_string(),
                    vec![
                        ButtonSpec { id: Some("option_1".into()), title: "View Stats".into() },
                        ButtonSpec { id: Some("option_2".into()), title: "Get Help".into() },
                        ButtonSpec { id: Some("option_3".into()), title: "Contact Us".into() },
                    ],
                    "Main Menu",
                    "Powered by WhatsApp API",
                )
                .await;
        }
        TextReply::CommandList => {
            let sections = vec![ListSection {
                title: Some("Commands".into()),
                rows: vec![
                    ListRow::new("cmd_hello".into(), "hello".into()),
                    ListRow::new_with_description(
                        "cmd_time".into(),
                        "time".into(),
                        "current UTC time".into(),
                    ),
                    ListRow::new_with_description(
                        "cmd_menu".into(),
                        "menu".into(),
                        "interactive menu".into(),
                    ),
                ],
            }];
            client
                .send_list_message(
                    from.to_string(),
                    "What do you need?".to_string(),
                    "options".to_string(),
                    sections,
                    "",
                    "",
                )
                .await;
        }
    }
}

/// Acknowledges inbound media and resolves its download URL for the logs
async fn reply_media_received(
    from: &str,
    ack_text: &str,
    media_id: Option<&str>,
    client: &WhatsAppClient,
) {
    if let Some(media_id) = media_id {
        let media = client.get_media_url(media_id).await;
        if media.success {
            logfire::info!(
                "Media {media_id} resolved: {url} ({mime_type}, {file_size} bytes)",
                media_id = media_id.to_string(),
                url = media.url.unwrap_or_default(),
                mime_type = media.mime_type.unwrap_or_default(),
                file_size = media.file_size.unwrap_or_default() as i64
            );
        }
    }

    client
        .send_text_message(from.to_string(), ack_text.to_string())
        .await;
}

/// Handles status updates for sent messages.
///
/// Log-only: nothing downstream consumes delivery states.
fn handle_status_update(status: &StatusUpdate) {
    logfire::info!(
        "Message {message_id} status: {status} (recipient: {recipient_id})",
        message_id = &status.message_id,
        recipient_id = &status.recipient_id,
        status = &status.status
    );

    if let Some(errors) = &status.errors {
        logfire::warn!(
            "Delivery reported errors: {errors}",
            errors = serde_json::to_string(errors).unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_greeting_and_echo() {
        assert_eq!(
            classify_text_command("Hello there"),
            TextReply::Message("Hello! How can I help you today?".to_string())
        );
        assert_eq!(
            classify_text_command("what?"),
            TextReply::Message(
                "You said: \"what?\"\n\nType \"help\" to see available commands.".to_string()
            )
        );
    }

    #[test]
    fn test_classify_menu_and_list() {
        assert_eq!(classify_text_command("  MENU "), TextReply::Menu);
        assert_eq!(classify_text_command("list"), TextReply::CommandList);
    }

    #[test]
    fn test_classify_help_beats_menu_hint() {
        // "help" is checked before "menu", matching the reply precedence
        let TextReply::Message(reply) = classify_text_command("help with the menu") else {
            panic!("expected a text reply");
        };
        assert!(reply.starts_with("Available commands:"));
    }

    #[test]
    fn test_classify_time_mentions_current_time() {
        let TextReply::Message(reply) = classify_text_command("time please") else {
            panic!("expected a text reply");
        };
        assert!(reply.starts_with("Current time: "));
        assert!(reply.ends_with("UTC"));
    }
}
