use std::time::Duration;

use crate::models::auction::AuctionRecord;
use crate::models::graphql::RecentCancellationsVariables;
use crate::models::sale_stats::SaleStats;
use crate::services::graphql::GraphQlClient;
use crate::services::query::{PollHandle, Query};

/// Queries kept fresh in the background and read by the view handlers.
/// Views serve the last good result while a poll is in flight.
#[derive(Clone)]
pub struct LiveQueries {
    pub sale_stats: Query<Option<SaleStats>>,
    /// Latest CancelledAndRefunded row
    pub recent_cancellations: Query<Vec<AuctionRecord>>,
}

impl LiveQueries {
    pub fn new(graphql: GraphQlClient, sale_stats_id: String) -> Self {
        let stats_client = graphql.clone();
        let sale_stats = Query::new("sale_stats", move || {
            let client = stats_client.clone();
            let id = sale_stats_id.clone();
            async move { client.sale_stats(&id).await }
        });

        let recent_cancellations = Query::new("recent_cancellations", move || {
            let client = graphql.clone();
            async move {
                client
                    .recent_cancellations(&RecentCancellationsVariables::latest(1))
                    .await
            }
        });

        Self {
            sale_stats,
            recent_cancellations,
        }
    }

    /// Run both fetches once, e.g. before the first poll tick lands
    pub async fn prime(&self) {
        tokio::join!(self.sale_stats.fetch(), self.recent_cancellations.fetch());
    }
}

/// Start polling every live query. Dropping the returned handles stops them.
pub fn start_sale_stats_polling(live: &LiveQueries, period: Duration) -> Vec<PollHandle> {
    tracing::info!(
        period_ms = period.as_millis() as u64,
        "Starting sale stats and cancellation polling"
    );

    vec![
        live.sale_stats.spawn_polling(period),
        live.recent_cancellations.spawn_polling(period),
    ]
}
