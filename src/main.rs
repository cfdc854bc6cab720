mod config;
mod dto;
mod handler;
mod service;

use tower_http::trace::TraceLayer;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt().init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config");
    tracing::info!("Successfully loaded mail relay config");

    // Setup mailer
    let mailer = service::Mailer::from_config(&cfg).expect("failed to set up SMTP transport");
    let mailer_ptr = Arc::new(mailer);

    // Setup router
    let router = handler::router(mailer_ptr).layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().unwrap();

    tracing::info!("Mail relay starting, listening on {}", addr);
    tracing::info!("Use POST /send-email to send emails");

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
