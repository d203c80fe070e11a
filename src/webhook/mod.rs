//! Webhook integrations with external messaging providers

pub mod routes;
pub mod whatsapp;
