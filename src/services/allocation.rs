use moka::future::Cache;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{DashboardError, Result};
use crate::models::allocation::AllocationResult;
use crate::models::auction::AuctionRecord;

/// Entity ids are truncated to this many characters before lookup. This is
/// a contract of the token API and must be preserved exactly.
pub const ENTITY_ID_LEN: usize = 34;

/// Allocation lookups against the token API, cached per entity id
#[derive(Clone)]
pub struct AllocationService {
    client: Client,
    base_url: String,
    cache: Arc<Cache<String, AllocationResult>>,
}

impl AllocationService {
    pub fn new(client: Client, base_url: String, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(ttl)
            .build();

        Self {
            client,
            base_url,
            cache: Arc::new(cache),
        }
    }

    /// Single lookup, no retry. Only successes are cached.
    pub async fn lookup(&self, entity_id: Option<&str>) -> Result<AllocationResult> {
        let entity_id = match entity_id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Err(DashboardError::MissingEntityId),
        };

        if let Some(cached) = self.cache.get(entity_id).await {
            tracing::debug!("Cache hit for allocation {}", entity_id);
            return Ok(cached);
        }

        tracing::info!(entity_id = %entity_id, "Fetching allocation from token API");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("entityId", entity_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown status");
            tracing::warn!(entity_id = %entity_id, status = status.as_u16(), "Allocation lookup failed");
            return Err(DashboardError::Upstream(format!(
                "Failed to fetch allocation: {}",
                status_text
            )));
        }

        let body = response.bytes().await?;
        let allocation = parse_allocation_body(&body)?;

        self.cache
            .insert(entity_id.to_string(), allocation.clone())
            .await;

        Ok(allocation)
    }

    /// Number of cached allocations, after flushing pending cache maintenance
    pub async fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

/// A 2xx body may still carry `{"error": ...}`; that is a failure, not data.
pub fn parse_allocation_body(body: &[u8]) -> Result<AllocationResult> {
    let value: Value = serde_json::from_slice(body)?;

    if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(DashboardError::Upstream(message));
    }

    Ok(serde_json::from_value(value)?)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First record (in fetched order) that carries an entity id, truncated to
/// `ENTITY_ID_LEN` characters.
pub fn entity_id_from_records(records: &[AuctionRecord]) -> Option<String> {
    records
        .iter()
        .filter_map(|r| r.entity_id.as_deref())
        .find(|id| !id.is_empty())
        .map(|id| id.chars().take(ENTITY_ID_LEN).collect())
}
