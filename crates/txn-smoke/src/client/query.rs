//! Request shapes understood by the database client.

use std::fmt;

/// Comparison operator for a column filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `column = value`
    Eq,
    /// `column >= value`
    Gte,
    /// `column <= value`
    Lte,
}

impl FilterOp {
    /// PostgREST operator keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `column <op> value` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// Row-count mode requested alongside a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    /// Server computes a precise total.
    Exact,
}

impl CountMode {
    /// Value for the `Prefer` header.
    #[must_use]
    pub fn prefer_header(self) -> &'static str {
        match self {
            Self::Exact => "count=exact",
        }
    }
}

/// A read-only select against one table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub limit: Option<usize>,
    pub count: Option<CountMode>,
}

impl SelectQuery {
    /// Select all columns from `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            limit: None,
            count: None,
        }
    }

    /// Restrict the returned columns (comma-separated).
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    #[must_use]
    pub fn eq(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    #[must_use]
    pub fn gte(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    #[must_use]
    pub fn lte(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    fn filter(
        mut self,
        column: impl Into<String>,
        op: FilterOp,
        value: impl Into<String>,
    ) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ask the server for a precise total row count.
    #[must_use]
    pub fn exact_count(mut self) -> Self {
        self.count = Some(CountMode::Exact);
        self
    }

    /// Render as PostgREST query-string pairs, in a stable order:
    /// `select`, then filters as added, then `limit`.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        pairs.push(("select".to_string(), self.columns.clone()));
        for f in &self.filters {
            pairs.push((f.column.clone(), format!("{}.{}", f.op, f.value)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Response to a select or RPC call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `None` when the body was empty.
    pub data: Option<serde_json::Value>,
    /// Raw total segment of `Content-Range` (`"0-0/123"` gives `"123"`),
    /// present only when a count was requested and returned.
    pub count: Option<String>,
}

impl QueryResponse {
    /// Number of rows when the payload is a JSON array.
    #[must_use]
    pub fn row_count(&self) -> Option<usize> {
        self.data
            .as_ref()
            .and_then(serde_json::Value::as_array)
            .map(Vec::len)
    }
}

/// Extract the total from a `Content-Range` header value.
///
/// Format: `"0-0/123"`, `"*/123"` or `"*/*"` when the total is unknown.
#[must_use]
pub fn parse_content_range_total(value: &str) -> Option<String> {
    value
        .split('/')
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .map(String::from)
}
