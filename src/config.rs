//! Application configuration management with security considerations.
//!
//! This module handles all configuration values required by the gateway.
//! Sensitive fields are clearly marked and should never be logged.

use crate::consts;
use envconfig::Envconfig;
use std::sync::LazyLock;

/// Gateway configuration loaded from environment variables.
///
/// # Security Requirements
/// - All `SENSITIVE` fields must be stored securely (encrypted at rest)
/// - Use secret management systems in production
/// - Never log or expose sensitive values
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    /// Example: "0.0.0.0", "localhost"
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    /// Common values: 443 (HTTPS), 8080 (dev)
    pub web_server_port: u64,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// WhatsApp Business phone number ID (SEMI-SENSITIVE)
    /// Security: restrict access, don't log in production
    pub wa_phone_number_id: u64,

    /// 🔒 SENSITIVE: Cloud API bearer token
    /// Security: store in a secure secret management system
    pub cloud_api_access_token: String,

    /// Graph API version segment (NON-SENSITIVE)
    #[envconfig(default = "v21.0")]
    pub cloud_api_version: String,

    /// WhatsApp Business account ID (SEMI-SENSITIVE, optional)
    pub wa_business_account_id: Option<String>,

    /// 🔒 SENSITIVE: Webhook verification token
    /// Must match the value configured in the Meta app dashboard
    pub webhook_verify_token: String,

    /// 🔒 SENSITIVE: Logfire write token for observability export
    pub logfire_token: String,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Graph API base URL for the configured API version
    pub fn graph_api_base_url(&self) -> String {
        format!(
            "{host}/{version}",
            host = consts::GRAPH_API_HOST,
            version = self.cloud_api_version
        )
    }

    /// Endpoint receiving every message send (and mark-as-read)
    pub fn whatsapp_send_msg_endpoint(&self) -> String {
        format!(
            "{base}/{id}/messages",
            base = self.graph_api_base_url(),
            id = self.wa_phone_number_id
        )
    }

    /// Endpoint resolving a media ID to its download URL.
    /// Media lookups live directly under the API version, not under the
    /// phone number ID.
    pub fn whatsapp_media_endpoint(&self, media_id: &str) -> String {
        format!(
            "{base}/{media_id}",
            base = self.graph_api_base_url(),
            media_id = media_id
        )
    }
}

/// Global gateway configuration instance.
///
/// Validated on first access; missing required environment variables
/// abort startup with a descriptive error message.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});
