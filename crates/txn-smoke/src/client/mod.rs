//! Thin facade over the hosted database's REST API.

use async_trait::async_trait;

use crate::error::Result;

mod query;
mod rest;

pub use query::{
    parse_content_range_total, CountMode, Filter, FilterOp, QueryResponse, SelectQuery,
};
pub use rest::RestClient;

/// Read-only capabilities the checks rely on.
///
/// Implementations must not retry; each call is a single request.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Run a select against a table or view.
    async fn select(&self, query: &SelectQuery) -> Result<QueryResponse>;

    /// Invoke a named server-side function.
    async fn rpc(&self, function: &str, params: serde_json::Value) -> Result<QueryResponse>;
}
