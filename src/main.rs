use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payhub_proxy::application::gateway::PaymentGateway;
use payhub_proxy::config::ServerConfig;
use payhub_proxy::domain::ports::ProcessorBox;
use payhub_proxy::infrastructure::iyzico::IyzicoClient;
use payhub_proxy::interfaces::http::{AppState, create_router};
use payhub_proxy::observability::init_observability;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_observability(config.log_format);

    let credentials = Arc::new(config.credentials());
    let processor: ProcessorBox = Box::new(
        IyzicoClient::new(credentials.clone(), config.processor_timeout()).into_diagnostic()?,
    );
    let gateway = PaymentGateway::new(processor);
    let app = create_router(AppState::new(gateway));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .into_diagnostic()?;
    info!(%addr, base_url = %credentials.base_url, "payment proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    Ok(())
}

/// Resolves on Ctrl-C; in-flight requests are allowed to finish.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
