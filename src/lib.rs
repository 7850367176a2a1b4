// src/lib.rs

use axum::{routing::get, Router};
use reqwest::Client;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::AppConfig;
use error::Result;
use jobs::sale_stats_poller::LiveQueries;
use services::{allocation::AllocationService, graphql::GraphQlClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Shared client for the passthrough routes
    pub http: Client,
    pub graphql: GraphQlClient,
    pub allocation: AllocationService,
    pub live: LiveQueries,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;

        let graphql = GraphQlClient::new(http.clone(), config.graphql_upstream_url.clone());
        let allocation = AllocationService::new(
            http.clone(),
            config.allocation_upstream_url.clone(),
            config.allocation_cache_ttl,
        );
        let live = LiveQueries::new(graphql.clone(), config.sale_stats_id.clone());

        Ok(Self {
            config: Arc::new(config),
            http,
            graphql,
            allocation,
            live,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/graphql",
            get(handlers::proxy::forward_graphql_get).post(handlers::proxy::forward_graphql_post),
        )
        .route("/api/allocation", get(handlers::proxy::get_allocation))
        .route("/api/views/overview", get(handlers::views::get_overview))
        .route("/api/views/history", get(handlers::views::get_history))
        .route("/api/views/cancellations", get(handlers::views::get_cancellations))
        .route(
            "/api/views/allocation-checker",
            get(handlers::views::get_allocation_checker),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

pub mod config;
pub mod error;

pub mod services {
    pub mod address;
    pub mod aggregate;
    pub mod allocation;
    pub mod format;
    pub mod graphql;
    pub mod queries;
    pub mod query;
    pub mod view_state;
}

pub mod jobs;
pub mod models;
pub mod handlers;
