//! # txn-smoke
//!
//! Connectivity smoke checks for a Supabase project: builds one REST client
//! from an endpoint and access key, then runs five read-only checks against
//! the `transactions` table and reports pass/fail for each.
//!
//! ## Example
//!
//! ```rust,no_run
//! use txn_smoke::{run_harness, ClientOptions, Credentials};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let creds = Credentials::from_env()?;
//!     let report = run_harness(&creds, &ClientOptions::default()).await?;
//!     std::process::exit(report.exit_code());
//! }
//! ```

pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use checks::{default_checks, Check, QueryFilter};
pub use client::{DatabaseClient, QueryResponse, RestClient, SelectQuery};
pub use config::{ClientOptions, Credentials};
pub use error::{Error, Result};
pub use report::OutputFormat;
pub use runner::{CheckResult, CheckRunner, RunReport};

/// Build the client and run the default checks.
///
/// Returns [`Error::Config`] without sending any request when the
/// credentials are incomplete; every other fault is recorded in the report.
pub async fn run_harness(credentials: &Credentials, options: &ClientOptions) -> Result<RunReport> {
    let client = RestClient::connect(credentials, options)?;
    tracing::info!("Running smoke checks against {}", client.base_url());
    Ok(CheckRunner::default().run(&client).await)
}
