//! WhatsApp webhook endpoint handlers
//!
//! This module handles incoming webhook requests from the WhatsApp
//! Business Cloud API. It implements both the verification endpoint
//! (GET) and the webhook receiver (POST).
//!
//! # Processing
//!
//! The receiver acknowledges with 200 before processing: the provider
//! only needs the acknowledgment, and a processing fault must never turn
//! into a provider-visible delivery failure.

use super::{handler, schemas::incoming::WebhookPayload};
use crate::{
    api::{AppState, errors},
    config,
};
use ntex::{util::Bytes, web};
use serde::Deserialize;
use tracing::{error, info};

/// Query parameters for webhook verification
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode")]
    pub mode: String,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// Webhook verification endpoint (GET)
///
/// Meta sends a GET request to verify the webhook URL. The endpoint
/// validates the verify token and echoes the challenge back.
///
/// # Returns
/// - 200 with the challenge string (plain text) if verification succeeds
/// - 403 with a JSON error body otherwise
#[web::get("")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
) -> Result<impl web::Responder, web::Error> {
    if query.mode != "subscribe" {
        error!("Invalid mode: expected 'subscribe', got '{}'", query.mode);
        return Err(errors::ApiError::VerificationFailed.into());
    }

    if query.verify_token != config::APP_CONFIG.webhook_verify_token {
        error!("Webhook verification failed: token mismatch");
        return Err(errors::ApiError::VerificationFailed.into());
    }

    info!("Webhook verified successfully");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(query.challenge.clone()))
}

/// Webhook receiver endpoint (POST)
///
/// Receives webhook events from the WhatsApp Business Cloud API.
/// Always responds 200: a body that cannot be parsed is logged and
/// dropped, since the provider retries deliveries it considers failed.
#[web::post("")]
pub async fn receive(
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => {
            info!(
                "Received webhook: object={}, entries={}",
                payload.object,
                payload.entry.len()
            );

            // Acknowledge first; process in the background
            let client = app_state.whatsapp_client.clone();
            ntex::rt::spawn(async move {
                handler::process_webhook(payload, &client).await;
            });
        }
        Err(e) => {
            error!("Failed to parse webhook payload: {}", e);
        }
    }

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "received"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_query_deserialization() {
        let json = r#"{"hub.mode":"subscribe","hub.verify_token":"test123","hub.challenge":"challenge123"}"#;
        let query: VerifyQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.mode, "subscribe");
        assert_eq!(query.verify_token, "test123");
        assert_eq!(query.challenge, "challenge123");
    }
}
