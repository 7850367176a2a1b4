#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use sale_dashboard::{config::AppConfig, router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Address with two bids, the newest carrying an over-long entity id
pub const ALLOCATED_ADDRESS: &str = "0xd421ba69d5Cc6f89D95c528217Def05ed440657E";
/// Address whose entity id is unknown to the allocation API
pub const UNKNOWN_ENTITY_ADDRESS: &str = "0x1111111111111111111111111111111111111111";

pub const ENTITY_OK: &str = "entity-0123456789abcdef0123456789a";
pub const ENTITY_MISSING: &str = "entity-missing-0000000000000000000";
pub const ENTITY_NOT_FOUND_STATUS: &str = "entity-gone";

/// Rows in the mock AuctionHistory table
pub const TOTAL_ROWS: usize = 15;

/// What the mock upstream saw
#[derive(Default)]
pub struct UpstreamLog {
    pub graphql_requests: Mutex<Vec<Value>>,
    pub allocation_requests: AtomicUsize,
}

impl UpstreamLog {
    pub fn operations(&self) -> Vec<String> {
        self.graphql_requests
            .lock()
            .iter()
            .filter_map(|r| r["operationName"].as_str().map(String::from))
            .collect()
    }

    pub fn allocation_hits(&self) -> usize {
        self.allocation_requests.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upstream: Arc<UpstreamLog>,
    pub graphql_url: String,
    pub allocation_url: String,
}

fn history_row(i: usize) -> Value {
    let status = match i % 3 {
        0 => "Bidding",
        1 => "Allocated",
        _ => "CancelledAndRefunded",
    };
    json!({
        "id": (TOTAL_ROWS - i).to_string(),
        "addr": format!("0x{:040x}", i),
        "amount": ((i + 1) * 100).to_string(),
        "entityID": null,
        "status": status,
        "txHash": format!("0x{:064x}", i),
        "timestamp": 1_735_689_600 + i as i64
    })
}

fn graphql_data(request: &Value) -> Value {
    let variables = &request["variables"];
    match request["operationName"].as_str().unwrap_or_default() {
        "getAuctionHistory" => {
            let offset = variables["offset"].as_u64().unwrap_or(0) as usize;
            let limit = variables["limit"].as_u64().unwrap_or(TOTAL_ROWS as u64) as usize;
            let rows: Vec<Value> = (offset..TOTAL_ROWS.min(offset + limit))
                .map(history_row)
                .collect();
            json!({ "AuctionHistory": rows })
        }
        "getUserAuctionHistory" => {
            let address = variables["address"].as_str().unwrap_or_default();
            let rows = if address.eq_ignore_ascii_case(ALLOCATED_ADDRESS) {
                json!([
                    {
                        "id": "7",
                        "addr": ALLOCATED_ADDRESS,
                        "amount": "2500",
                        "entityID": format!("{}-suffix-dropped", ENTITY_OK),
                        "status": "Allocated",
                        "lockup": true,
                        "txHash": "0xaaaa",
                        "timestamp": 1_735_689_600_000_i64
                    },
                    {
                        "id": "3",
                        "addr": ALLOCATED_ADDRESS,
                        "amount": "500",
                        "entityID": null,
                        "status": "PartiallyRefunded",
                        "txHash": null,
                        "timestamp": "1735600000"
                    }
                ])
            } else if address.eq_ignore_ascii_case(UNKNOWN_ENTITY_ADDRESS) {
                json!([{
                    "id": "8",
                    "addr": UNKNOWN_ENTITY_ADDRESS,
                    "amount": "100",
                    "entityID": ENTITY_MISSING,
                    "status": "Bidding",
                    "txHash": null,
                    "timestamp": null
                }])
            } else {
                json!([])
            };
            json!({ "AuctionHistory": rows })
        }
        "getRecentCancellations" => json!({
            "AuctionHistory": [{
                "id": "14",
                "addr": "0x2222222222222222222222222222222222222222",
                "amount": "1500",
                "status": "CancelledAndRefunded",
                "txHash": null,
                "timestamp": 1_735_689_600
            }]
        }),
        "getSaleStats" => json!({
            "SaleStats": [{
                "id": variables["id"],
                "totalBids": "1200",
                "totalBidsUSDT": "5000000.5",
                "totalCancellations": 300,
                "totalCancellationsUSDT": 125000,
                "totalFullRefunds": 10,
                "totalFullRefundedUSDT": "1000",
                "totalPartialRefunds": 20,
                "totalPartialRefundedUSDT": "2000",
                "totalRefunds": 30,
                "totalRefundedUSDT": "3000",
                "totalWinners": 800
            }]
        }),
        _ => Value::Null,
    }
}

async fn mock_graphql_post(
    State(log): State<Arc<UpstreamLog>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    log.graphql_requests.lock().push(request.clone());

    if request["operationName"] == "broken" {
        return Json(json!({
            "data": null,
            "errors": [{ "message": "field 'nope' not found" }]
        }));
    }

    Json(json!({ "data": graphql_data(&request) }))
}

async fn mock_graphql_get() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [("content-type", "text/plain")],
        "use POST",
    )
        .into_response()
}

async fn mock_allocation(
    State(log): State<Arc<UpstreamLog>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    log.allocation_requests.fetch_add(1, Ordering::SeqCst);

    match params.get("entityId").map(String::as_str) {
        Some(ENTITY_OK) => Json(json!({
            "clearing_price": "0.0999",
            "token_allocation": "25000",
            "usdt_allocation": 2497.5
        }))
        .into_response(),
        Some(ENTITY_MISSING) => Json(json!({ "error": "not found" })).into_response(),
        _ => (StatusCode::NOT_FOUND, "missing").into_response(),
    }
}

/// Starts the mock indexer and token API on an ephemeral port
pub async fn spawn_upstream() -> (String, String, Arc<UpstreamLog>) {
    let log = Arc::new(UpstreamLog::default());

    let app = Router::new()
        .route("/v1/graphql", get(mock_graphql_get).post(mock_graphql_post))
        .route("/api/allocation", get(mock_allocation))
        .with_state(Arc::clone(&log));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().expect("Mock upstream has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (
        format!("http://{}/v1/graphql", addr),
        format!("http://{}/api/allocation", addr),
        log,
    )
}

/// Dashboard wired to a fresh mock upstream
pub async fn spawn_app() -> TestApp {
    let (graphql_url, allocation_url, upstream) = spawn_upstream().await;
    let config = AppConfig::with_upstreams(&graphql_url, &allocation_url);
    let state = AppState::new(config).expect("Failed to build app state");

    TestApp {
        router: router(state.clone()),
        state,
        upstream,
        graphql_url,
        allocation_url,
    }
}

/// Dashboard whose upstreams refuse connections
pub fn unreachable_app() -> TestApp {
    let graphql_url = "http://127.0.0.1:1/v1/graphql".to_string();
    let allocation_url = "http://127.0.0.1:1/api/allocation".to_string();
    let config = AppConfig::with_upstreams(&graphql_url, &allocation_url);
    let state = AppState::new(config).expect("Failed to build app state");

    TestApp {
        router: router(state.clone()),
        state,
        upstream: Arc::new(UpstreamLog::default()),
        graphql_url,
        allocation_url,
    }
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
