//! # WhatsApp Gateway
//!
//! Entry point for the WhatsApp Business Cloud API gateway. Configures
//! logging, the shared API client, middleware, TLS, and route handling.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod metric;
pub mod utils;
pub mod webhook;

use logfire::config::MetricsOptions;
use ntex::web;
use ntex_cors::Cors;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use crate::webhook::whatsapp::client::WhatsAppClient;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Force configuration loading before anything else touches it
    let app_config = &*config::APP_CONFIG;

    // Initialize logging and metrics
    let shutdown_handler = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(logfire::config::SendToLogfire::Yes)
        .with_token(&app_config.logfire_token)
        .finish()?;

    if let Some(business_account_id) = &app_config.wa_business_account_id {
        tracing::info!("Operating against business account {business_account_id}");
    }

    // One client for the whole process, shared through the app state
    let whatsapp_client = WhatsAppClient::new();

    configure_and_run_server(whatsapp_client).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let app_config = &*config::APP_CONFIG;

    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(whatsapp_client: WhatsAppClient) -> api::AppState {
    api::AppState { whatsapp_client }
}

/// Handler for requests matching no configured route
async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(api::errors::ApiError::RouteNotFound.into())
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(whatsapp_client: WhatsAppClient) -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;
    let server_addr = (
        app_config.web_server_host.as_str(),
        u16::try_from(app_config.web_server_port).unwrap_or(443),
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(whatsapp_client.clone()))
            .configure(api::routes::whatsapp)
            .configure(webhook::routes::whatsapp)
            .default_service(web::route().to(serve_not_found))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
