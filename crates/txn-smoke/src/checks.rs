//! The five connectivity checks.
//!
//! Each check issues exactly one read-only request and validates one literal
//! postcondition. Faults are returned, never retried; the runner records them.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::client::{DatabaseClient, QueryResponse, SelectQuery};
use crate::error::{Error, Result};

/// Table every check targets.
pub const TRANSACTIONS_TABLE: &str = "transactions";
/// Date column used by the ranged filter.
pub const DATE_COLUMN: &str = "transaction_date";

const SAMPLE_LIMIT: usize = 200;

/// One independent smoke test.
#[async_trait]
pub trait Check: Send + Sync {
    /// Stable name used in reports.
    fn name(&self) -> &'static str;

    /// Issue the request and validate the postcondition.
    ///
    /// Returns an optional human-readable detail on success.
    async fn run(&self, client: &dyn DatabaseClient) -> Result<Option<String>>;
}

/// Inclusive date range for the ranged filter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    lower_bound: NaiveDate,
    upper_bound: NaiveDate,
}

impl QueryFilter {
    /// Create a range; `lower_bound` must not be after `upper_bound`.
    pub fn new(lower_bound: NaiveDate, upper_bound: NaiveDate) -> Result<Self> {
        if lower_bound > upper_bound {
            return Err(Error::Config(format!(
                "date range is inverted: {lower_bound} > {upper_bound}"
            )));
        }
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }

    #[must_use]
    pub fn lower_bound(&self) -> NaiveDate {
        self.lower_bound
    }

    #[must_use]
    pub fn upper_bound(&self) -> NaiveDate {
        self.upper_bound
    }
}

impl Default for QueryFilter {
    /// `2023-01-01 ..= 2025-01-01`.
    fn default() -> Self {
        Self {
            lower_bound: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            upper_bound: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
        }
    }
}

fn require_payload<'a>(resp: &'a QueryResponse, what: &str) -> Result<&'a Value> {
    resp.data
        .as_ref()
        .filter(|v| !v.is_null())
        .ok_or_else(|| Error::Assertion(format!("{what} returned no payload")))
}

fn rows_of(value: &Value) -> usize {
    value.as_array().map_or(1, Vec::len)
}

/// Truncate JSON text to a fixed number of characters for report details.
fn excerpt(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > SAMPLE_LIMIT {
        let cut: String = text.chars().take(SAMPLE_LIMIT).collect();
        format!("{cut}...")
    } else {
        text
    }
}

/// Select `id` with limit 1; any payload (including `[]`) passes.
pub struct RowFetch;

#[async_trait]
impl Check for RowFetch {
    fn name(&self) -> &'static str {
        "row_fetch"
    }

    async fn run(&self, client: &dyn DatabaseClient) -> Result<Option<String>> {
        let query = SelectQuery::new(TRANSACTIONS_TABLE).select("id").limit(1);
        let resp = client.select(&query).await?;
        let data = require_payload(&resp, "row fetch")?;
        Ok(Some(format!("fetched {} row(s)", rows_of(data))))
    }
}

/// Call the `version` function; only completion is required.
pub struct VersionProbe;

#[async_trait]
impl Check for VersionProbe {
    fn name(&self) -> &'static str {
        "version_probe"
    }

    async fn run(&self, client: &dyn DatabaseClient) -> Result<Option<String>> {
        let resp = client.rpc("version", serde_json::json!({})).await?;
        let detail = match resp.data.as_ref().filter(|v| !v.is_null()) {
            Some(Value::String(s)) => format!("version: {s}"),
            Some(other) => format!("version: {}", excerpt(other)),
            None => "completed (empty payload)".to_string(),
        };
        Ok(Some(detail))
    }
}

/// Exact-count select with limit 0; count must be a non-negative integer.
pub struct TransactionCount;

/// Parse a server-reported count, rejecting anything that is not a
/// non-negative integer.
pub fn parse_count(raw: Option<&str>) -> Result<u64> {
    let raw = raw.ok_or_else(|| Error::Assertion("no row count returned".to_string()))?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Assertion(format!("row count '{raw}' is not a non-negative integer")))
}

#[async_trait]
impl Check for TransactionCount {
    fn name(&self) -> &'static str {
        "transaction_count"
    }

    async fn run(&self, client: &dyn DatabaseClient) -> Result<Option<String>> {
        let query = SelectQuery::new(TRANSACTIONS_TABLE).exact_count().limit(0);
        let resp = client.select(&query).await?;
        let count = parse_count(resp.count.as_deref())?;
        Ok(Some(format!("found {count} transactions")))
    }
}

/// Column listing from `information_schema`; empty results are tolerated.
pub struct SchemaIntrospection;

#[async_trait]
impl Check for SchemaIntrospection {
    fn name(&self) -> &'static str {
        "schema_introspection"
    }

    async fn run(&self, client: &dyn DatabaseClient) -> Result<Option<String>> {
        let query = SelectQuery::new("information_schema.columns")
            .eq("table_name", TRANSACTIONS_TABLE);
        let resp = client.select(&query).await?;
        let data = require_payload(&resp, "schema introspection")?;
        let detail = match rows_of(data) {
            0 => "no columns visible (may require elevated privilege)".to_string(),
            n => format!("{n} column(s) visible"),
        };
        Ok(Some(detail))
    }
}

/// Select rows whose date falls in an inclusive range.
pub struct RangedFilter {
    filter: QueryFilter,
}

impl RangedFilter {
    #[must_use]
    pub fn new(filter: QueryFilter) -> Self {
        Self { filter }
    }
}

impl Default for RangedFilter {
    fn default() -> Self {
        Self::new(QueryFilter::default())
    }
}

#[async_trait]
impl Check for RangedFilter {
    fn name(&self) -> &'static str {
        "ranged_filter"
    }

    async fn run(&self, client: &dyn DatabaseClient) -> Result<Option<String>> {
        let from = self.filter.lower_bound().format("%Y-%m-%d").to_string();
        let to = self.filter.upper_bound().format("%Y-%m-%d").to_string();
        let query = SelectQuery::new(TRANSACTIONS_TABLE)
            .gte(DATE_COLUMN, from.clone())
            .lte(DATE_COLUMN, to.clone());

        let resp = client.select(&query).await?;
        let data = require_payload(&resp, "ranged filter")?;

        let first = data.as_array().and_then(|rows| rows.first());
        let detail = match first {
            Some(sample) => format!(
                "retrieved {} transaction(s) between {from} and {to}; sample: {}",
                rows_of(data),
                excerpt(sample)
            ),
            None => format!("no transactions found between {from} and {to}"),
        };
        Ok(Some(detail))
    }
}

/// The five checks in their fixed order.
#[must_use]
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(RowFetch),
        Box::new(VersionProbe),
        Box::new(TransactionCount),
        Box::new(SchemaIntrospection),
        Box::new(RangedFilter::default()),
    ]
}
