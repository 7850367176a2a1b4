pub mod allocation;
pub mod auction;
pub mod graphql;
pub mod sale_stats;
pub mod serde_helpers;
pub mod views;
