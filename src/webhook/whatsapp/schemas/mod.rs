//! # WhatsApp Message Schemas
//!
//! Data structures for the WhatsApp Business Cloud API.
//!
//! - `incoming`: webhook payloads delivered by the provider
//! - `outgoing`: request bodies for the message-send endpoint

pub mod incoming;
pub mod outgoing;

pub use incoming::*;
pub use outgoing::*;
