use std::sync::Arc;

use tower_http::cors::CorsLayer;

use mailburst::api::campaign_routes;
use mailburst::campaign::CampaignCoordinator;
use mailburst::channel::{Channel, SmtpChannel};
use mailburst::config::ServiceConfig;
use mailburst::store::{JsonFileStore, SnapshotStore};
use mailburst::template::TemplateLibrary;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env();

    eprintln!("📬 mailburst v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api", config.port);
    eprintln!("   Snapshot: {}", config.state_path.display());
    eprintln!("   Templates: {}", config.templates_dir.display());
    eprintln!("   Tick interval: {:?}", config.tick_interval);

    let store: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(&config.state_path));
    let channel: Arc<dyn Channel> = Arc::new(SmtpChannel::new(
        config.smtp_username.clone(),
        config.smtp_password.clone(),
    ));
    eprintln!("   Transport: {}", channel.name());

    let templates = TemplateLibrary::new(&config.templates_dir);
    let coordinator =
        CampaignCoordinator::restore(store, channel, templates, config.tick_interval).await;

    {
        let snapshot = coordinator.snapshot().await;
        eprintln!(
            "   Restored: step={}, campaigns launched={}\n",
            snapshot.step, snapshot.campaigns_launched
        );
    }

    let app = campaign_routes(coordinator).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Campaign API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
