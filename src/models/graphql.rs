//! GraphQL wire envelopes and the typed variables of each operation.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use super::auction::AuctionStatus;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: &'a V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Id,
    Amount,
    Timestamp,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Id => "id",
            OrderField::Amount => "amount",
            OrderField::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// One `order_by` entry, serialized the Hasura way: `{ "amount": "desc" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn desc(field: OrderField) -> Self {
        Self { field, direction: OrderDirection::Desc }
    }

    pub fn asc(field: OrderField) -> Self {
        Self { field, direction: OrderDirection::Asc }
    }

    /// Stable recency order used whenever no explicit order is requested
    pub fn default_recency() -> Self {
        Self::desc(OrderField::Id)
    }
}

impl Serialize for OrderBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field.as_str(), self.direction.as_str())?;
        map.end()
    }
}

/// Row filter for AuctionHistory (`AuctionHistory_bool_exp`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionFilter {
    /// Case-insensitive pattern matched with `_ilike`
    pub addr_ilike: Option<String>,
    pub status_eq: Option<AuctionStatus>,
}

impl AuctionFilter {
    /// Substring search: the term is wrapped in `%` wildcards. LIKE
    /// metacharacters inside the term match literally.
    pub fn address_contains(term: &str) -> Self {
        Self {
            addr_ilike: Some(format!("%{}%", escape_like(term))),
            status_eq: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.addr_ilike.is_none() && self.status_eq.is_none()
    }

    pub fn to_value(&self) -> Value {
        let mut clause = serde_json::Map::new();
        if let Some(pattern) = &self.addr_ilike {
            clause.insert("addr".to_string(), json!({ "_ilike": pattern }));
        }
        if let Some(status) = &self.status_eq {
            clause.insert("status".to_string(), json!({ "_eq": status.as_str() }));
        }
        Value::Object(clause)
    }
}

/// Escapes `\`, `%` and `_` with the default LIKE escape character
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl Serialize for AuctionFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Variables of getAuctionHistory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionHistoryVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(rename = "orderBy")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<AuctionFilter>,
}

impl AuctionHistoryVariables {
    /// An unset `order_by` falls back to id-descending
    pub fn new(
        limit: Option<usize>,
        offset: Option<usize>,
        order_by: Option<OrderBy>,
        filter: Option<AuctionFilter>,
    ) -> Self {
        Self {
            limit,
            offset,
            order_by: vec![order_by.unwrap_or_else(OrderBy::default_recency)],
            filter: filter.filter(|f| !f.is_empty()),
        }
    }
}

impl Default for AuctionHistoryVariables {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

/// Variables of getUserAuctionHistory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAuctionHistoryVariables {
    pub address: String,
}

/// Variables of getRecentCancellations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentCancellationsVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(rename = "orderBy")]
    pub order_by: Vec<OrderBy>,
}

impl RecentCancellationsVariables {
    /// Newest cancellations first
    pub fn latest(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
            order_by: vec![OrderBy::desc(OrderField::Timestamp)],
        }
    }
}

/// Variables of getSaleStats
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleStatsVariables {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_serializes_as_single_key_object() {
        let value = serde_json::to_value(OrderBy::asc(OrderField::Amount)).unwrap();
        assert_eq!(value, json!({"amount": "asc"}));
    }

    #[test]
    fn test_unset_order_defaults_to_id_desc() {
        let vars = AuctionHistoryVariables::new(Some(10), Some(0), None, None);
        let value = serde_json::to_value(&vars).unwrap();
        assert_eq!(
            value,
            json!({"limit": 10, "offset": 0, "orderBy": [{"id": "desc"}]})
        );
    }

    #[test]
    fn test_address_filter_wraps_wildcards() {
        let vars = AuctionHistoryVariables::new(
            Some(10),
            Some(20),
            Some(OrderBy::desc(OrderField::Amount)),
            Some(AuctionFilter::address_contains("0xAbC")),
        );
        let value = serde_json::to_value(&vars).unwrap();
        assert_eq!(value["where"], json!({"addr": {"_ilike": "%0xAbC%"}}));
        assert_eq!(value["orderBy"], json!([{"amount": "desc"}]));
        assert_eq!(value["offset"], json!(20));
    }

    #[test]
    fn test_address_filter_escapes_like_metacharacters() {
        let filter = AuctionFilter::address_contains(r"0x_a%b\c");
        assert_eq!(filter.addr_ilike.as_deref(), Some(r"%0x\_a\%b\\c%"));
        assert_eq!(
            filter.to_value(),
            json!({"addr": {"_ilike": r"%0x\_a\%b\\c%"}})
        );
    }

    #[test]
    fn test_empty_filter_is_dropped() {
        let vars = AuctionHistoryVariables::new(None, None, None, Some(AuctionFilter::default()));
        assert!(vars.filter.is_none());
    }

    #[test]
    fn test_status_filter() {
        let filter = AuctionFilter {
            addr_ilike: None,
            status_eq: Some(AuctionStatus::CancelledAndRefunded),
        };
        assert_eq!(
            filter.to_value(),
            json!({"status": {"_eq": "CancelledAndRefunded"}})
        );
    }

    #[test]
    fn test_request_envelope() {
        let vars = SaleStatsVariables { id: "abc".into() };
        let request = GraphQlRequest {
            query: "query getSaleStats { x }",
            variables: &vars,
            operation_name: Some("getSaleStats"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["operationName"], json!("getSaleStats"));
        assert_eq!(value["variables"], json!({"id": "abc"}));
    }

    #[test]
    fn test_response_with_errors() {
        let response: GraphQlResponse<Value> = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "field 'foo' not found", "extensions": {"code": "validation-failed"}}]
        }))
        .unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "field 'foo' not found");
    }
}
