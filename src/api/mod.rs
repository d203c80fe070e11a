//! # API Module
//!
//! JSON endpoints consumed by the application to push messages out
//! through the gateway.
//!
//! ## Modules
//!
//! - [`send`] - Outbound send handlers (text, media, template)
//! - [`routes`] - Route configuration for the send surface
//! - [`responses`] - Success and failure response envelopes
//! - [`errors`] - Typed request errors and their HTTP mapping

pub mod errors;
pub mod responses;
pub mod routes;
pub mod send;

use crate::webhook;

/// Shared application state handed to every request handler
pub struct AppState {
    pub whatsapp_client: webhook::whatsapp::client::WhatsAppClient,
}
