//! Same-origin passthrough for the GraphQL endpoint and the allocation API.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::models::allocation::AllocationQuery;
use crate::models::views::ErrorResponse;
use crate::AppState;

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

/// Rebuilds an upstream response: same status, same body, same content type
/// (JSON when upstream did not say)
async fn relay(upstream: reqwest::Response) -> Response {
    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    match upstream.bytes().await {
        Ok(body) => (status, [(CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to read upstream response body");
            internal_error()
        }
    }
}

async fn forward_graphql(state: &AppState, method: Method, body: Option<Bytes>) -> Response {
    let url = &state.config.graphql_upstream_url;

    let mut request = state
        .http
        .request(method.clone(), url)
        .header(reqwest::header::CONTENT_TYPE, "application/json");
    if let Some(body) = body {
        request = request.body(body);
    }

    match request.send().await {
        Ok(upstream) => relay(upstream).await,
        Err(e) => {
            error!(method = %method, error = %e, "GraphQL proxy error");
            internal_error()
        }
    }
}

/// POST /api/graphql
pub async fn forward_graphql_post(State(state): State<AppState>, body: Bytes) -> Response {
    forward_graphql(&state, Method::POST, Some(body)).await
}

/// GET /api/graphql
pub async fn forward_graphql_get(State(state): State<AppState>) -> Response {
    forward_graphql(&state, Method::GET, None).await
}

/// GET /api/allocation?entityId=<id>
///
/// # Response
/// - 200: upstream JSON unchanged
/// - 400: missing entityId
/// - upstream status: `{"error": "Failed to fetch allocation: <status text>"}`
/// - 500: transport failure
pub async fn get_allocation(
    State(state): State<AppState>,
    Query(query): Query<AllocationQuery>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let entity_id = query
        .entity_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Entity ID is required".to_string(),
                }),
            )
        })?;

    info!(entity_id = %entity_id, "Proxying allocation lookup");

    let upstream = state
        .http
        .get(&state.config.allocation_upstream_url)
        .query(&[("entityId", entity_id)])
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "API proxy error");
            return Ok(internal_error());
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        let status_code = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return Err((
            status_code,
            Json(ErrorResponse {
                error: format!(
                    "Failed to fetch allocation: {}",
                    status.canonical_reason().unwrap_or("Unknown status")
                ),
            }),
        ));
    }

    Ok(relay(upstream).await)
}
