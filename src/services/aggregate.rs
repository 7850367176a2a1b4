//! Per-page derivations over fetched auction rows and rate helpers over
//! the indexer's sale totals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::models::auction::{AuctionRecord, AuctionStatus};
use crate::models::sale_stats::SaleStats;
use crate::models::serde_helpers::parse_decimal;

/// Count and amount sum of one status partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionTotals {
    pub count: usize,
    pub sum: Decimal,
}

impl PartitionTotals {
    /// Sums saturate at the decimal bounds instead of overflowing
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.sum = self.sum.checked_add(amount).unwrap_or(if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BidAggregates {
    /// Allocated
    pub accepted: PartitionTotals,
    /// CancelledAndRefunded, PartiallyRefunded and Refunded
    pub refunded: PartitionTotals,
    /// Bidding
    pub bidding: PartitionTotals,
    /// Every row, including unknown statuses
    pub total: PartitionTotals,
    /// Last Bidding row in fetched order
    pub last_bid: Option<AuctionRecord>,
}

/// Amount column as a decimal; anything non-numeric counts as zero
pub fn parse_amount(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

pub fn derive_aggregates(records: &[AuctionRecord]) -> BidAggregates {
    let mut aggregates = BidAggregates::default();

    for record in records {
        let amount = parse_amount(&record.amount);
        aggregates.total.add(amount);

        match record.status {
            AuctionStatus::Allocated => aggregates.accepted.add(amount),
            AuctionStatus::Bidding => aggregates.bidding.add(amount),
            status if status.is_refunded() => aggregates.refunded.add(amount),
            _ => {}
        }
    }

    // "Last" follows the fetch order, which is only chronological when the
    // query was ordered by recency.
    aggregates.last_bid = records
        .iter()
        .rev()
        .find(|r| r.status == AuctionStatus::Bidding)
        .cloned();

    aggregates
}

/// `part / total * 100`, 0 when `total` is 0
pub fn percentage(part: i64, total: i64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(total) * dec!(100)
}

pub fn cancellation_rate(cancellations: i64, total_bids: i64) -> Decimal {
    percentage(cancellations, total_bids)
}

pub fn win_rate(winners: i64, total_bids: i64) -> Decimal {
    // Both must be non-zero, otherwise the card shows 0%
    if winners == 0 {
        return Decimal::ZERO;
    }
    percentage(winners, total_bids)
}

/// Share of bids that were not cancelled
pub fn active_rate(cancellations: i64, total_bids: i64) -> Decimal {
    dec!(100) - cancellation_rate(cancellations, total_bids)
}

/// Rates shown next to the sale totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaleRates {
    pub win_rate: Decimal,
    pub cancellation_rate: Decimal,
    pub active_rate: Decimal,
}

impl SaleRates {
    pub fn from_stats(stats: &SaleStats) -> Self {
        Self {
            win_rate: win_rate(stats.total_winners, stats.total_bids),
            cancellation_rate: cancellation_rate(stats.total_cancellations, stats.total_bids),
            active_rate: active_rate(stats.total_cancellations, stats.total_bids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, amount: &str, status: AuctionStatus) -> AuctionRecord {
        AuctionRecord {
            id: id.to_string(),
            addr: format!("0x{:0>40}", id),
            amount: amount.to_string(),
            entity_id: None,
            status,
            tx_hash: None,
            timestamp: None,
            lockup: None,
        }
    }

    #[test]
    fn test_empty_rows_are_all_zero() {
        let aggregates = derive_aggregates(&[]);
        assert_eq!(aggregates.accepted, PartitionTotals::default());
        assert_eq!(aggregates.refunded, PartitionTotals::default());
        assert_eq!(aggregates.bidding, PartitionTotals::default());
        assert_eq!(aggregates.total.sum, Decimal::ZERO);
        assert!(aggregates.last_bid.is_none());
    }

    #[test]
    fn test_non_numeric_amounts_count_as_zero() {
        let rows = vec![
            record("1", "100", AuctionStatus::Bidding),
            record("2", "abc", AuctionStatus::Bidding),
            record("3", "50", AuctionStatus::Bidding),
        ];
        let aggregates = derive_aggregates(&rows);
        assert_eq!(aggregates.bidding.sum, dec!(150));
        assert_eq!(aggregates.bidding.count, 3);
        assert_eq!(aggregates.total.sum, dec!(150));
    }

    #[test]
    fn test_sum_saturates_on_overflow() {
        let max = "79228162514264337593543950335";
        let rows = vec![
            record("1", max, AuctionStatus::Bidding),
            record("2", max, AuctionStatus::Bidding),
            record("3", "10", AuctionStatus::Allocated),
        ];
        let aggregates = derive_aggregates(&rows);
        assert_eq!(aggregates.bidding.count, 2);
        assert_eq!(aggregates.bidding.sum, Decimal::MAX);
        assert_eq!(aggregates.total.sum, Decimal::MAX);
        assert_eq!(aggregates.accepted.sum, dec!(10));
    }

    #[test]
    fn test_partitions_by_status() {
        let rows = vec![
            record("1", "1000", AuctionStatus::Allocated),
            record("2", "250.5", AuctionStatus::CancelledAndRefunded),
            record("3", "100", AuctionStatus::PartiallyRefunded),
            record("4", "49.5", AuctionStatus::Refunded),
            record("5", "10", AuctionStatus::Bidding),
            record("6", "999", AuctionStatus::Unknown),
        ];
        let aggregates = derive_aggregates(&rows);

        assert_eq!(aggregates.accepted, PartitionTotals { count: 1, sum: dec!(1000) });
        assert_eq!(aggregates.refunded, PartitionTotals { count: 3, sum: dec!(400) });
        assert_eq!(aggregates.bidding, PartitionTotals { count: 1, sum: dec!(10) });
        assert_eq!(aggregates.total.count, 6);
        assert_eq!(aggregates.total.sum, dec!(2409));
    }

    #[test]
    fn test_last_bid_is_last_bidding_row_in_fetch_order() {
        let rows = vec![
            record("9", "1", AuctionStatus::Bidding),
            record("8", "2", AuctionStatus::Bidding),
            record("7", "3", AuctionStatus::Allocated),
        ];
        let aggregates = derive_aggregates(&rows);
        assert_eq!(aggregates.last_bid.unwrap().id, "8");
    }

    #[test]
    fn test_rates_guard_division_by_zero() {
        assert_eq!(cancellation_rate(5, 0), Decimal::ZERO);
        assert_eq!(win_rate(0, 10), Decimal::ZERO);
        assert_eq!(active_rate(0, 0), dec!(100));
    }

    #[test]
    fn test_rates() {
        assert_eq!(cancellation_rate(25, 100), dec!(25));
        assert_eq!(win_rate(800, 1200).round_dp(1), dec!(66.7));
        assert_eq!(active_rate(25, 100), dec!(75));
    }

    #[test]
    fn test_sale_rates_from_stats() {
        let stats = SaleStats {
            total_bids: 200,
            total_cancellations: 50,
            total_winners: 100,
            ..SaleStats::default()
        };
        let rates = SaleRates::from_stats(&stats);
        assert_eq!(rates.win_rate, dec!(50));
        assert_eq!(rates.cancellation_rate, dec!(25));
        assert_eq!(rates.active_rate, dec!(75));
    }
}
