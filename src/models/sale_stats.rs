use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_count, lenient_decimal, string_or_number};

/// Pre-computed sale totals maintained by the indexer. The dashboard never
/// recomputes these, it only derives rates from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleStats {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_bids: i64,
    #[serde(rename = "totalBidsUSDT", default, deserialize_with = "lenient_decimal")]
    pub total_bids_usdt: Decimal,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_cancellations: i64,
    #[serde(rename = "totalCancellationsUSDT", default, deserialize_with = "lenient_decimal")]
    pub total_cancellations_usdt: Decimal,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_full_refunds: i64,
    #[serde(rename = "totalFullRefundedUSDT", default, deserialize_with = "lenient_decimal")]
    pub total_full_refunded_usdt: Decimal,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_partial_refunds: i64,
    #[serde(rename = "totalPartialRefundedUSDT", default, deserialize_with = "lenient_decimal")]
    pub total_partial_refunded_usdt: Decimal,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_refunds: i64,
    #[serde(rename = "totalRefundedUSDT", default, deserialize_with = "lenient_decimal")]
    pub total_refunded_usdt: Decimal,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_winners: i64,
}

/// `data` payload of the getSaleStats query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleStatsData {
    #[serde(rename = "SaleStats", default)]
    pub sale_stats: Vec<SaleStats>,
}

impl SaleStatsData {
    /// The table is keyed by a fixed id, so at most one row matters
    pub fn into_single(self) -> Option<SaleStats> {
        self.sale_stats.into_iter().next()
    }
}
