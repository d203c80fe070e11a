/// Marker the Cloud API requires on every outbound payload
pub const MESSAGING_PRODUCT: &str = "whatsapp";
/// Top-level discriminator of webhook envelopes worth processing
pub const WEBHOOK_OBJECT_TYPE: &str = "whatsapp_business_account";

pub const GRAPH_API_HOST: &str = "https://graph.facebook.com";

pub const DEFAULT_TEMPLATE_LANGUAGE: &str = "en_US";

pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
