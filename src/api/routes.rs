use ntex::web;

/// Configures the outbound send API.
///
/// # Routes
/// - `POST /api/whatsapp/send` - text message
/// - `POST /api/whatsapp/media` - media message from a hosted link
/// - `POST /api/whatsapp/template` - pre-approved template message
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/whatsapp").service((
        super::send::send_message,
        super::send::send_media,
        super::send::send_template,
    )));
}
