//! Outbound send handlers
//!
//! Each endpoint validates the request shape, normalizes the recipient
//! phone number, performs the send, and wraps the outcome in the shared
//! response envelope. Provider failures come back as 500 with the
//! provider's error message; validation failures as 400.

use super::{AppState, errors::ApiError, responses};
use crate::{utils, webhook::whatsapp::client::SendResult};
use crate::webhook::whatsapp::schemas::outgoing::MediaKind;
use ntex::web;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SendTextRequest {
    pub to: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMediaRequest {
    pub to: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTemplateRequest {
    pub to: Option<String>,
    pub template_name: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub components: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SentMessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SentMediaData {
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    to: String,
    media_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SentTemplateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    to: String,
    template_name: String,
}

/// Sends a text message
///
/// `POST /api/whatsapp/send` with `{to, message}`
#[web::post("/send")]
pub async fn send_message(
    app_state: web::types::State<AppState>,
    body: web::types::Json<SendTextRequest>,
) -> Result<impl web::Responder, web::Error> {
    let missing = utils::collect_missing_fields(&[
        ("to", body.to.as_deref()),
        ("message", body.message.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing.join(", ")).into());
    }

    let to = validated_phone(body.to.as_deref().unwrap_or_default())?;
    let message = body.message.clone().unwrap_or_default();

    let result = app_state
        .whatsapp_client
        .send_text_message(to.clone(), message)
        .await;

    if !result.success {
        return Ok(provider_failure(&result));
    }

    Ok(web::HttpResponse::Ok().json(&responses::success_response(
        SentMessageData {
            message_id: result.message_id,
            to,
        },
        "Message sent successfully",
    )))
}

/// Sends a media message from a hosted link
///
/// `POST /api/whatsapp/media` with `{to, mediaUrl, mediaType, caption?, filename?}`
#[web::post("/media")]
pub async fn send_media(
    app_state: web::types::State<AppState>,
    body: web::types::Json<SendMediaRequest>,
) -> Result<impl web::Responder, web::Error> {
    let missing = utils::collect_missing_fields(&[
        ("to", body.to.as_deref()),
        ("mediaUrl", body.media_url.as_deref()),
        ("mediaType", body.media_type.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing.join(", ")).into());
    }

    let media_type = body.media_type.clone().unwrap_or_default();
    let kind = MediaKind::parse(&media_type)
        .ok_or_else(|| ApiError::UnsupportedMediaType(media_type.clone()))?;

    let to = validated_phone(body.to.as_deref().unwrap_or_default())?;

    let result = app_state
        .whatsapp_client
        .send_media_message(
            to.clone(),
            kind,
            body.media_url.clone().unwrap_or_default(),
            body.caption.as_deref().unwrap_or_default(),
            body.filename.as_deref().unwrap_or_default(),
        )
        .await;

    if !result.success {
        return Ok(provider_failure(&result));
    }

    Ok(web::HttpResponse::Ok().json(&responses::success_response(
        SentMediaData {
            message_id: result.message_id,
            to,
            media_type,
        },
        "Media sent successfully",
    )))
}

/// Sends a pre-approved template message
///
/// `POST /api/whatsapp/template` with `{to, templateName, languageCode?, components?}`
#[web::post("/template")]
pub async fn send_template(
    app_state: web::types::State<AppState>,
    body: web::types::Json<SendTemplateRequest>,
) -> Result<impl web::Responder, web::Error> {
    let missing = utils::collect_missing_fields(&[
        ("to", body.to.as_deref()),
        ("templateName", body.template_name.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing.join(", ")).into());
    }

    let to = validated_phone(body.to.as_deref().unwrap_or_default())?;
    let template_name = body.template_name.clone().unwrap_or_default();

    let result = app_state
        .whatsapp_client
        .send_template_message(
            to.clone(),
            template_name.clone(),
            body.language_code.clone(),
            body.components.clone().unwrap_or_default(),
        )
        .await;

    if !result.success {
        return Ok(provider_failure(&result));
    }

    Ok(web::HttpResponse::Ok().json(&responses::success_response(
        SentTemplateData {
            message_id: result.message_id,
            to,
            template_name,
        },
        "Template sent successfully",
    )))
}

/// Normalizes the recipient to digits and enforces the accepted length
fn validated_phone(raw: &str) -> Result<String, web::Error> {
    if !utils::is_valid_phone_number(raw) {
        return Err(ApiError::InvalidPhoneNumber.into());
    }
    Ok(utils::format_phone_number(raw))
}

/// 500 response carrying the provider's error message
fn provider_failure(result: &SendResult) -> web::HttpResponse {
    let reason = result
        .error
        .as_ref()
        .and_then(|error| error.message.clone())
        .unwrap_or_else(|| "Unknown error".to_string());

    web::HttpResponse::InternalServerError().json(&responses::error_response(&reason, 500))
}
