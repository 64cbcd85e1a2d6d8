//! Supabase client over the `PostgREST` HTTP API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::query::{parse_content_range_total, QueryResponse, SelectQuery};
use super::DatabaseClient;
use crate::config::{ClientOptions, Credentials};
use crate::error::{Error, Result};

/// REST client bound to one set of credentials.
pub struct RestClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Build a client from credentials.
    ///
    /// Fails with [`Error::Config`] before any I/O when the credentials are
    /// incomplete. No request is sent here.
    pub fn connect(credentials: &Credentials, options: &ClientOptions) -> Result<Self> {
        credentials.validate()?;

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: credentials.base_url().to_string(),
            api_key: credentials.key.trim().to_string(),
            client,
        })
    }

    /// Endpoint this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Turn a non-success response into [`Error::Api`], keeping the PostgREST
/// error fields when the body is JSON.
async fn api_error(resp: reqwest::Response) -> Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => Error::Api {
            status: status.as_u16(),
            message: parsed
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            code: parsed.code,
            details: parsed.details,
            hint: parsed.hint,
        },
        Err(_) => Error::Api {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                body
            },
            code: None,
            details: None,
            hint: None,
        },
    }
}

/// Decode a response. With `lenient`, a 2xx body that is not JSON is kept
/// as a `Value::String` instead of failing.
async fn into_query_response(resp: reqwest::Response, lenient: bool) -> Result<QueryResponse> {
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }

    let status = resp.status().as_u16();
    let count = resp
        .headers()
        .get(reqwest::header::CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total);

    let body = resp.bytes().await?;
    let data = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => Some(value),
            Err(_) if lenient => Some(serde_json::Value::String(
                String::from_utf8_lossy(&body).into_owned(),
            )),
            Err(e) => return Err(e.into()),
        }
    };

    Ok(QueryResponse {
        status,
        data,
        count,
    })
}

#[async_trait]
impl DatabaseClient for RestClient {
    async fn select(&self, query: &SelectQuery) -> Result<QueryResponse> {
        let pairs = query.to_query_pairs();
        debug!(table = %query.table, ?pairs, "select");

        let mut req = self
            .request(reqwest::Method::GET, &query.table)
            .query(&pairs);
        if let Some(mode) = query.count {
            req = req.header("Prefer", mode.prefer_header());
        }

        let resp = req.send().await?;
        into_query_response(resp, false).await
    }

    async fn rpc(&self, function: &str, params: serde_json::Value) -> Result<QueryResponse> {
        debug!(function, "rpc");

        let resp = self
            .request(reqwest::Method::POST, &format!("rpc/{function}"))
            .json(&params)
            .send()
            .await?;
        into_query_response(resp, true).await
    }
}
