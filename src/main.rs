use market_insight::server::router;
use market_insight::{MarketInsightService, Result, Settings};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional: a missing .env is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_insight=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::from_env()?;
    let service = Arc::new(MarketInsightService::from_settings(&settings)?);
    let app = router(service);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!(
        "market-insight v{} listening on {} (model {})",
        env!("CARGO_PKG_VERSION"),
        addr,
        settings.groq_model
    );

    axum::serve(listener, app).await?;
    Ok(())
}
