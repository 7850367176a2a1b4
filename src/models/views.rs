//! JSON view models returned by the /api/views endpoints. Every value a
//! card or table shows is pre-formatted; raw values ride along for clients
//! that want to format themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::allocation::AllocationResult;
use crate::models::auction::{AuctionRecord, AuctionStatus};
use crate::models::sale_stats::SaleStats;
use crate::models::serde_helpers::parse_decimal;
use crate::services::aggregate::{BidAggregates, SaleRates};
use crate::services::query::QueryState;
use crate::services::format::{
    format_address, format_amount, format_count, format_number, format_percent,
    format_timestamp, format_timestamp_compact, format_tx_hash, format_usdt, status_label,
};
use crate::services::view_state::{SortOrder, ViewParams};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One auction history table row
#[derive(Debug, Clone, Serialize)]
pub struct AuctionRowView {
    pub id: String,
    pub address: String,
    pub address_short: String,
    pub amount: String,
    /// e.g. "2,500 USDT"
    pub amount_display: String,
    pub status: AuctionStatus,
    pub status_label: String,
    pub tx_hash: Option<String>,
    pub tx_hash_short: String,
    /// Relative time, "-" when unknown
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockup: Option<bool>,
}

impl AuctionRowView {
    pub fn from_record(record: &AuctionRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            address: record.addr.clone(),
            address_short: format_address(&record.addr),
            amount: record.amount.clone(),
            amount_display: format!("{} USDT", format_amount(&record.amount)),
            status: record.status,
            status_label: status_label(record.status),
            tx_hash: record.tx_hash.clone(),
            tx_hash_short: format_tx_hash(record.tx_hash.as_deref()),
            time: format_timestamp(record.timestamp.as_ref(), now),
            lockup: record.lockup,
        }
    }
}

/// A count and its USDT value, both formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub count: String,
    pub value: String,
}

/// Sale totals as the overview cards show them
#[derive(Debug, Clone, Serialize)]
pub struct SaleStatsView {
    pub bids: StatCard,
    pub winners: String,
    pub win_rate: String,
    pub cancellations: StatCard,
    pub refunds: StatCard,
    pub partial_refunds: StatCard,
    pub full_refunds: StatCard,
    pub raw: SaleStats,
}

impl SaleStatsView {
    pub fn from_stats(stats: &SaleStats) -> Self {
        let rates = SaleRates::from_stats(stats);
        Self {
            bids: StatCard {
                count: format_count(stats.total_bids),
                value: format_usdt(Some(stats.total_bids_usdt)),
            },
            winners: format_count(stats.total_winners),
            win_rate: format_percent(rates.win_rate),
            cancellations: StatCard {
                count: format_count(stats.total_cancellations),
                value: format_usdt(Some(stats.total_cancellations_usdt)),
            },
            refunds: StatCard {
                count: format_count(stats.total_refunds),
                value: format_usdt(Some(stats.total_refunded_usdt)),
            },
            partial_refunds: StatCard {
                count: format_count(stats.total_partial_refunds),
                value: format_usdt(Some(stats.total_partial_refunded_usdt)),
            },
            full_refunds: StatCard {
                count: format_count(stats.total_full_refunds),
                value: format_usdt(Some(stats.total_full_refunded_usdt)),
            },
            raw: stats.clone(),
        }
    }
}

/// GET /api/views/overview
#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub loading: bool,
    pub error: Option<String>,
    pub stats: Option<SaleStatsView>,
}

impl OverviewView {
    pub fn from_state(state: &QueryState<Option<SaleStats>>) -> Self {
        Self {
            loading: state.loading,
            error: state.error.clone(),
            stats: state
                .data
                .as_ref()
                .and_then(Option::as_ref)
                .map(SaleStatsView::from_stats),
        }
    }
}

/// GET /api/views/history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPageView {
    pub page: usize,
    pub items_per_page: usize,
    pub sort: SortOrder,
    pub search: String,
    pub rows: Vec<AuctionRowView>,
    pub aggregates: BidAggregates,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    /// Parameters reproducing this view
    pub params: ViewParams,
    pub previous: Option<ViewParams>,
    pub next: Option<ViewParams>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentCancellationView {
    pub amount_display: String,
    pub time: String,
}

impl RecentCancellationView {
    pub fn from_record(record: &AuctionRecord, now: DateTime<Utc>) -> Self {
        Self {
            amount_display: format!("{} USDT", format_amount(&record.amount)),
            time: format_timestamp_compact(record.timestamp.as_ref(), now),
        }
    }
}

/// GET /api/views/cancellations
#[derive(Debug, Clone, Serialize)]
pub struct CancellationsView {
    pub loading: bool,
    pub error: Option<String>,
    pub total_cancellations: String,
    pub total_cancellations_usdt: String,
    pub total_bids: String,
    pub cancellation_rate: String,
    pub active_rate: String,
    pub recent: Option<RecentCancellationView>,
    pub recent_error: Option<String>,
}

impl CancellationsView {
    /// Missing stats render as zeroes, like an empty sale
    pub fn from_states(
        stats: &QueryState<Option<SaleStats>>,
        recent: &QueryState<Vec<AuctionRecord>>,
        now: DateTime<Utc>,
    ) -> Self {
        let totals = stats
            .data
            .as_ref()
            .and_then(Option::as_ref)
            .cloned()
            .unwrap_or_default();
        let rates = SaleRates::from_stats(&totals);

        Self {
            loading: stats.loading,
            error: stats.error.clone(),
            total_cancellations: format_count(totals.total_cancellations),
            total_cancellations_usdt: format_usdt(Some(totals.total_cancellations_usdt)),
            total_bids: format_count(totals.total_bids),
            cancellation_rate: format_percent(rates.cancellation_rate),
            active_rate: format_percent(rates.active_rate),
            recent: recent
                .data
                .as_ref()
                .and_then(|rows| rows.first())
                .map(|row| RecentCancellationView::from_record(row, now)),
            recent_error: recent.error.clone(),
        }
    }
}

/// Allocation as the checker cards show it
#[derive(Debug, Clone, Serialize)]
pub struct AllocationView {
    pub token_allocation: String,
    pub usdt_allocation: String,
    pub clearing_price: String,
    pub raw: AllocationResult,
}

impl AllocationView {
    pub fn from_result(result: &AllocationResult) -> Self {
        let number = |raw: &str| format_number(parse_decimal(raw).unwrap_or_default());
        Self {
            token_allocation: format!("{} MEGA", number(&result.token_allocation)),
            usdt_allocation: format!("{} USDT", number(&result.usdt_allocation)),
            clearing_price: result.clearing_price.clone(),
            raw: result.clone(),
        }
    }
}

/// Shown next to any allocation lookup failure
pub const ALLOCATION_ERROR_NOTICE: &str = "You might not get an allocation";

/// Query string of the allocation checker view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationCheckerQuery {
    /// Shared link parameter; malformed values are ignored
    pub address: Option<String>,
    /// Manually typed address; malformed values are reported in `input_error`
    pub input: Option<String>,
}

/// GET /api/views/allocation-checker
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllocationCheckerView {
    /// Validated address, `None` when the parameter was absent or malformed
    pub address: Option<String>,
    pub input_error: Option<String>,
    pub history: Vec<AuctionRowView>,
    pub history_error: Option<String>,
    pub entity_id: Option<String>,
    pub allocation: Option<AllocationView>,
    pub allocation_error: Option<String>,
    pub allocation_notice: Option<String>,
}
