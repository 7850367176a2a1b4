use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::DashboardError,
    models::views::{
        AllocationCheckerQuery, AllocationCheckerView, AllocationView, AuctionRowView,
        CancellationsView, ErrorResponse, HistoryPageView, OverviewView, ALLOCATION_ERROR_NOTICE,
    },
    services::{
        address::{address_from_param, parse_address_input},
        aggregate::derive_aggregates,
        allocation::entity_id_from_records,
        view_state::{ViewParams, ViewState},
    },
    AppState,
};

fn error_response(err: DashboardError) -> (StatusCode, Json<ErrorResponse>) {
    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Handler for GET /api/views/overview
/// Serves the last polled sale stats
pub async fn get_overview(State(state): State<AppState>) -> Json<OverviewView> {
    Json(OverviewView::from_state(&state.live.sale_stats.state()))
}

/// Handler for GET /api/views/history?page=&sort=&sort_by=&search=
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<HistoryPageView>, (StatusCode, Json<ErrorResponse>)> {
    let view = ViewState::from_params(&params);
    let variables = view.query_variables();

    tracing::debug!(
        page = view.current_page(),
        offset = view.offset(),
        search = %view.search_address(),
        "Fetching auction history page"
    );

    let records = state.graphql.auction_history(&variables).await.map_err(|e| {
        tracing::error!("Failed to fetch auction history: {}", e);
        error_response(e)
    })?;

    let now = Utc::now();

    let mut previous = view.clone();
    let previous = previous.previous_page().then(|| previous.to_params());
    let mut next = view.clone();
    let next = next.next_page(records.len()).then(|| next.to_params());

    Ok(Json(HistoryPageView {
        page: view.current_page(),
        items_per_page: view.items_per_page(),
        sort: view.sort_order(),
        search: view.search_address().to_string(),
        rows: records
            .iter()
            .map(|r| AuctionRowView::from_record(r, now))
            .collect(),
        aggregates: derive_aggregates(&records),
        can_go_previous: view.can_go_previous(),
        can_go_next: view.can_go_next(records.len()),
        params: view.to_params(),
        previous,
        next,
    }))
}

/// Handler for GET /api/views/cancellations
pub async fn get_cancellations(State(state): State<AppState>) -> Json<CancellationsView> {
    Json(CancellationsView::from_states(
        &state.live.sale_stats.state(),
        &state.live.recent_cancellations.state(),
        Utc::now(),
    ))
}

/// Handler for GET /api/views/allocation-checker?address=0x... (or ?input=...)
///
/// A missing or malformed address produces an empty view without touching
/// upstream; only a malformed `input` explains why. Lookup failures are
/// reported inside the view, not as an HTTP error.
pub async fn get_allocation_checker(
    State(state): State<AppState>,
    Query(query): Query<AllocationCheckerQuery>,
) -> Json<AllocationCheckerView> {
    let address = match query.input.as_deref() {
        Some(input) => match parse_address_input(input) {
            Ok(address) => address,
            Err(e) => {
                return Json(AllocationCheckerView {
                    input_error: Some(e.to_string()),
                    ..AllocationCheckerView::default()
                });
            }
        },
        None => address_from_param(query.address.as_deref()),
    };
    let Some(address) = address else {
        return Json(AllocationCheckerView::default());
    };

    let mut view = AllocationCheckerView {
        address: Some(address.clone()),
        ..AllocationCheckerView::default()
    };

    let history = state
        .graphql
        .user_history_query(Some(&address))
        .fetch()
        .await;
    if let Some(error) = history.error {
        view.history_error = Some(error);
        return Json(view);
    }
    let records = history.data.unwrap_or_default();

    let now = Utc::now();
    view.history = records
        .iter()
        .map(|r| AuctionRowView::from_record(r, now))
        .collect();
    view.entity_id = entity_id_from_records(&records);

    if let Some(entity_id) = view.entity_id.as_deref() {
        match state.allocation.lookup(Some(entity_id)).await {
            Ok(result) => view.allocation = Some(AllocationView::from_result(&result)),
            Err(e) => {
                tracing::warn!(entity_id = %entity_id, "Allocation lookup failed: {}", e);
                view.allocation_error = Some(e.to_string());
                view.allocation_notice = Some(ALLOCATION_ERROR_NOTICE.to_string());
            }
        }
    }

    Json(view)
}
