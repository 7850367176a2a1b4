//! GraphQL documents sent to the indexer.

pub const GET_AUCTION_HISTORY_OP: &str = "getAuctionHistory";

/// Paginated, sortable, filterable auction history
pub const GET_AUCTION_HISTORY: &str = r#"
  query getAuctionHistory(
    $limit: Int
    $offset: Int
    $orderBy: [AuctionHistory_order_by!]
    $where: AuctionHistory_bool_exp
  ) {
    AuctionHistory(
      limit: $limit
      offset: $offset
      order_by: $orderBy
      where: $where
    ) {
      id
      addr
      amount
      entityID
      status
      txHash
      timestamp
    }
  }
"#;

pub const GET_USER_AUCTION_HISTORY_OP: &str = "getUserAuctionHistory";

/// Every row of one address, newest first, unpaginated
pub const GET_USER_AUCTION_HISTORY: &str = r#"
  query getUserAuctionHistory($address: String!) {
    AuctionHistory(
      where: { addr: { _ilike: $address } }
      order_by: { timestamp: desc }
    ) {
      id
      addr
      amount
      entityID
      status
      lockup
      txHash
      timestamp
    }
  }
"#;

pub const GET_RECENT_CANCELLATIONS_OP: &str = "getRecentCancellations";

pub const GET_RECENT_CANCELLATIONS: &str = r#"
  query getRecentCancellations(
    $limit: Int
    $offset: Int
    $orderBy: [AuctionHistory_order_by!]
  ) {
    AuctionHistory(
      limit: $limit
      offset: $offset
      order_by: $orderBy
      where: { status: { _eq: "CancelledAndRefunded" } }
    ) {
      id
      addr
      amount
      status
      txHash
      timestamp
    }
  }
"#;

pub const GET_SALE_STATS_OP: &str = "getSaleStats";

pub const GET_SALE_STATS: &str = r#"
  query getSaleStats($id: String!) {
    SaleStats(where: { id: { _eq: $id } }) {
      id
      totalBids
      totalBidsUSDT
      totalCancellations
      totalCancellationsUSDT
      totalFullRefundedUSDT
      totalFullRefunds
      totalWinners
      totalPartialRefundedUSDT
      totalPartialRefunds
      totalRefundedUSDT
      totalRefunds
    }
  }
"#;
