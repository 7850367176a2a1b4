use serde::{Deserialize, Serialize};

use super::serde_helpers::string_or_number;

/// Allocation payload of the token API, kept as the strings it sends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    #[serde(deserialize_with = "string_or_number")]
    pub clearing_price: String,
    #[serde(deserialize_with = "string_or_number")]
    pub token_allocation: String,
    #[serde(deserialize_with = "string_or_number")]
    pub usdt_allocation: String,
}

/// Query parameters for GET /api/allocation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationQuery {
    #[serde(rename = "entityId")]
    pub entity_id: Option<String>,
}
