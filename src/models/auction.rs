//! Auction history rows as returned by the `AuctionHistory` GraphQL table.

use serde::{Deserialize, Serialize};

use super::serde_helpers::string_or_number;

/// Lifecycle state of a single bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionStatus {
    Bidding,
    CancelledAndRefunded,
    PartiallyRefunded,
    Refunded,
    Allocated,
    /// Anything the indexer adds later; shown with a neutral label
    #[serde(other)]
    Unknown,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Bidding => "Bidding",
            AuctionStatus::CancelledAndRefunded => "CancelledAndRefunded",
            AuctionStatus::PartiallyRefunded => "PartiallyRefunded",
            AuctionStatus::Refunded => "Refunded",
            AuctionStatus::Allocated => "Allocated",
            AuctionStatus::Unknown => "Unknown",
        }
    }

    pub fn is_refunded(&self) -> bool {
        matches!(
            self,
            AuctionStatus::CancelledAndRefunded
                | AuctionStatus::PartiallyRefunded
                | AuctionStatus::Refunded
        )
    }
}

/// Raw timestamp column. The indexer has emitted both epoch numbers
/// (seconds or milliseconds) and strings, so interpretation is deferred
/// to formatting time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub addr: String,
    /// Decimal string in USDT
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(rename = "entityID", default)]
    pub entity_id: Option<String>,
    pub status: AuctionStatus,
    #[serde(rename = "txHash", default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub lockup: Option<bool>,
}

/// `data` payload of every AuctionHistory query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuctionHistoryData {
    #[serde(rename = "AuctionHistory", default)]
    pub auction_history: Vec<AuctionRecord>,
}
