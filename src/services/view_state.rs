//! Pagination, sort and search state of the auction history table, and the
//! browser that re-fetches whenever that state changes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::auction::AuctionRecord;
use crate::models::graphql::{AuctionFilter, AuctionHistoryVariables, OrderBy, OrderField};
use crate::services::aggregate::{derive_aggregates, BidAggregates};
use crate::services::graphql::AuctionHistorySource;
use crate::services::query::{Query, QueryState};

pub const ITEMS_PER_PAGE: usize = 10;

/// Highest reachable page: its offset still fits GraphQL's 32-bit `Int`
pub const MAX_PAGE: usize = (i32::MAX as usize / ITEMS_PER_PAGE) + 1;

/// Only key the table can sort on
pub const SORT_KEY_AMOUNT: &str = "amount";

/// Sort over the amount column. Toggling cycles
/// none -> descending -> ascending -> none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    None,
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            SortOrder::None => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::None,
        }
    }

    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            SortOrder::None => None,
            SortOrder::Descending => Some("desc"),
            SortOrder::Ascending => Some("asc"),
        }
    }

    /// Unrecognized values mean "unsorted"
    pub fn from_param(param: &str) -> Self {
        match param.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => SortOrder::Descending,
            "asc" | "ascending" => SortOrder::Ascending,
            _ => SortOrder::None,
        }
    }
}

/// Order for a sort key. Anything other than a sorted amount column falls
/// back to id-descending.
pub fn resolve_order_by(sort_key: &str, order: SortOrder) -> OrderBy {
    if sort_key != SORT_KEY_AMOUNT {
        return OrderBy::default_recency();
    }
    match order {
        SortOrder::Descending => OrderBy::desc(OrderField::Amount),
        SortOrder::Ascending => OrderBy::asc(OrderField::Amount),
        SortOrder::None => OrderBy::default_recency(),
    }
}

/// URL query parameters mirroring a `ViewState`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    current_page: usize,
    sort_order: SortOrder,
    sort_key: String,
    search_address: String,
    items_per_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_page: 1,
            sort_order: SortOrder::None,
            sort_key: SORT_KEY_AMOUNT.to_string(),
            search_address: String::new(),
            items_per_page: ITEMS_PER_PAGE,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn search_address(&self) -> &str {
        &self.search_address
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// A full page suggests another one may exist; there is no total count
    pub fn can_go_next(&self, current_row_count: usize) -> bool {
        current_row_count == self.items_per_page && self.current_page < MAX_PAGE
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Returns whether the page changed
    pub fn next_page(&mut self, current_row_count: usize) -> bool {
        if !self.can_go_next(current_row_count) {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Returns whether the page changed
    pub fn previous_page(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn toggle_sort(&mut self) -> SortOrder {
        self.sort_order = self.sort_order.next();
        self.current_page = 1;
        self.sort_order
    }

    pub fn set_search(&mut self, text: &str) {
        self.search_address = text.to_string();
        self.current_page = 1;
    }

    pub fn offset(&self) -> usize {
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page)
    }

    pub fn order_by(&self) -> OrderBy {
        resolve_order_by(&self.sort_key, self.sort_order)
    }

    /// Case-insensitive substring match on the address column
    pub fn filter(&self) -> Option<AuctionFilter> {
        let term = self.search_address.trim();
        if term.is_empty() {
            None
        } else {
            Some(AuctionFilter::address_contains(term))
        }
    }

    pub fn query_variables(&self) -> AuctionHistoryVariables {
        AuctionHistoryVariables::new(
            Some(self.items_per_page),
            Some(self.offset()),
            Some(self.order_by()),
            self.filter(),
        )
    }

    /// Rebuild state from URL parameters; bad values fall back to defaults
    /// and pages past `MAX_PAGE` are clamped to it
    pub fn from_params(params: &ViewParams) -> Self {
        let current_page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(MAX_PAGE))
            .unwrap_or(1);

        Self {
            current_page,
            sort_order: params
                .sort
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
            sort_key: params
                .sort_by
                .clone()
                .unwrap_or_else(|| SORT_KEY_AMOUNT.to_string()),
            search_address: params.search.clone().unwrap_or_default(),
            items_per_page: ITEMS_PER_PAGE,
        }
    }

    pub fn to_params(&self) -> ViewParams {
        ViewParams {
            page: (self.current_page > 1).then(|| self.current_page.to_string()),
            sort: self.sort_order.as_param().map(String::from),
            sort_by: (self.sort_key != SORT_KEY_AMOUNT).then(|| self.sort_key.clone()),
            search: (!self.search_address.is_empty()).then(|| self.search_address.clone()),
        }
    }
}

/// Auction history table: a `ViewState` driving a re-fetching query.
/// Every accepted transition recomputes the variables and re-fetches.
/// In-flight requests are not cancelled.
pub struct HistoryBrowser {
    view: ViewState,
    variables: Arc<RwLock<AuctionHistoryVariables>>,
    query: Query<Vec<AuctionRecord>>,
}

impl HistoryBrowser {
    pub fn new<S>(source: Arc<S>) -> Self
    where
        S: AuctionHistorySource + 'static,
    {
        Self::with_view(source, ViewState::new())
    }

    pub fn with_view<S>(source: Arc<S>, view: ViewState) -> Self
    where
        S: AuctionHistorySource + 'static,
    {
        let variables = Arc::new(RwLock::new(view.query_variables()));
        let shared = Arc::clone(&variables);

        let query = Query::new("auction_history", move || {
            let source = Arc::clone(&source);
            let variables = shared.read().clone();
            async move { source.fetch_page(&variables).await }
        });

        Self {
            view,
            variables,
            query,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Handle for polling or subscribing; it always uses the latest variables
    pub fn query(&self) -> &Query<Vec<AuctionRecord>> {
        &self.query
    }

    pub fn variables(&self) -> AuctionHistoryVariables {
        self.variables.read().clone()
    }

    pub fn state(&self) -> QueryState<Vec<AuctionRecord>> {
        self.query.state()
    }

    pub fn rows(&self) -> Vec<AuctionRecord> {
        self.query.data().unwrap_or_default()
    }

    pub fn can_go_next(&self) -> bool {
        self.view.can_go_next(self.rows().len())
    }

    pub fn aggregates(&self) -> BidAggregates {
        derive_aggregates(&self.rows())
    }

    pub async fn refresh(&self) -> QueryState<Vec<AuctionRecord>> {
        *self.variables.write() = self.view.query_variables();
        self.query.fetch().await
    }

    pub async fn next_page(&mut self) -> QueryState<Vec<AuctionRecord>> {
        let row_count = self.rows().len();
        if !self.view.next_page(row_count) {
            return self.state();
        }
        self.refresh().await
    }

    pub async fn previous_page(&mut self) -> QueryState<Vec<AuctionRecord>> {
        if !self.view.previous_page() {
            return self.state();
        }
        self.refresh().await
    }

    pub async fn toggle_sort(&mut self) -> QueryState<Vec<AuctionRecord>> {
        self.view.toggle_sort();
        self.refresh().await
    }

    pub async fn set_search(&mut self, text: &str) -> QueryState<Vec<AuctionRecord>> {
        self.view.set_search(text);
        self.refresh().await
    }
}
