use sale_dashboard::{
    config::AppConfig, jobs::sale_stats_poller::start_sale_stats_polling, router, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sale_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    tracing::info!(
        graphql = %config.graphql_upstream_url,
        allocation = %config.allocation_upstream_url,
        "Using upstream endpoints"
    );

    let bind_addr = config.bind_addr.clone();
    let poll_interval = config.poll_interval;
    let state = AppState::new(config)?;

    // Fill the live views before the first request arrives
    state.live.prime().await;
    let _pollers = start_sale_stats_polling(&state.live, poll_interval);

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
