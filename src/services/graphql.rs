use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{DashboardError, Result};
use crate::models::auction::{AuctionHistoryData, AuctionRecord};
use crate::models::graphql::{
    AuctionHistoryVariables, GraphQlRequest, GraphQlResponse, RecentCancellationsVariables,
    SaleStatsVariables, UserAuctionHistoryVariables,
};
use crate::models::sale_stats::{SaleStats, SaleStatsData};
use crate::services::queries;
use crate::services::query::Query;

/// Typed client for the four named operations of the indexer
#[derive(Clone)]
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// POST one operation and unwrap its `data`
    pub async fn execute<V, T>(&self, operation_name: &str, query: &str, variables: &V) -> Result<T>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!(operation = operation_name, "Sending GraphQL request");

        let request = GraphQlRequest {
            query,
            variables,
            operation_name: Some(operation_name),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(operation = operation_name, error = %e, "GraphQL transport failure");
                DashboardError::Transport(e)
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        decode_response(status.as_u16(), status.canonical_reason(), &body)
    }

    pub async fn auction_history(
        &self,
        variables: &AuctionHistoryVariables,
    ) -> Result<Vec<AuctionRecord>> {
        let data: AuctionHistoryData = self
            .execute(
                queries::GET_AUCTION_HISTORY_OP,
                queries::GET_AUCTION_HISTORY,
                variables,
            )
            .await?;
        Ok(data.auction_history)
    }

    /// All rows of one address. A blank address never reaches the network;
    /// callers that want "skipped" semantics use `Query::skipped` instead.
    pub async fn user_auction_history(&self, address: &str) -> Result<Vec<AuctionRecord>> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DashboardError::InvalidAddress(
                "Address is required".to_string(),
            ));
        }

        let variables = UserAuctionHistoryVariables {
            address: address.to_string(),
        };
        let data: AuctionHistoryData = self
            .execute(
                queries::GET_USER_AUCTION_HISTORY_OP,
                queries::GET_USER_AUCTION_HISTORY,
                &variables,
            )
            .await?;
        Ok(data.auction_history)
    }

    /// History of one address as a `Query`. A missing or blank address gives
    /// a skipped query that stays idle and never touches the network.
    pub fn user_history_query(&self, address: Option<&str>) -> Query<Vec<AuctionRecord>> {
        let address = match address.map(str::trim) {
            Some(a) if !a.is_empty() => a.to_string(),
            _ => return Query::skipped("user_auction_history"),
        };

        let client = self.clone();
        Query::new("user_auction_history", move || {
            let client = client.clone();
            let address = address.clone();
            async move { client.user_auction_history(&address).await }
        })
    }

    pub async fn recent_cancellations(
        &self,
        variables: &RecentCancellationsVariables,
    ) -> Result<Vec<AuctionRecord>> {
        let data: AuctionHistoryData = self
            .execute(
                queries::GET_RECENT_CANCELLATIONS_OP,
                queries::GET_RECENT_CANCELLATIONS,
                variables,
            )
            .await?;
        Ok(data.auction_history)
    }

    pub async fn sale_stats(&self, id: &str) -> Result<Option<SaleStats>> {
        let variables = SaleStatsVariables { id: id.to_string() };
        let data: SaleStatsData = self
            .execute(queries::GET_SALE_STATS_OP, queries::GET_SALE_STATS, &variables)
            .await?;
        Ok(data.into_single())
    }
}

/// Source of paginated auction history pages
#[async_trait]
pub trait AuctionHistorySource: Send + Sync {
    async fn fetch_page(&self, variables: &AuctionHistoryVariables) -> Result<Vec<AuctionRecord>>;
}

#[async_trait]
impl AuctionHistorySource for GraphQlClient {
    async fn fetch_page(&self, variables: &AuctionHistoryVariables) -> Result<Vec<AuctionRecord>> {
        self.auction_history(variables).await
    }
}

/// Turns a raw GraphQL HTTP response into `data`, classifying failures:
/// non-2xx status, `errors` array, or a missing `data` member.
pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    status_text: Option<&str>,
    body: &[u8],
) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(DashboardError::HttpStatus {
            status,
            status_text: status_text.unwrap_or("Unknown status").to_string(),
        });
    }

    let envelope: GraphQlResponse<T> = serde_json::from_slice(body)?;

    if !envelope.errors.is_empty() {
        return Err(DashboardError::GraphQl(
            envelope.errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    envelope
        .data
        .ok_or_else(|| DashboardError::Upstream("GraphQL response contained no data".to_string()))
}
