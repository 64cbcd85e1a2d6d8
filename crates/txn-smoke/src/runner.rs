//! Sequential check runner.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::checks::{default_checks, Check};
use crate::client::DatabaseClient;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    #[must_use]
    pub fn pass(name: &str, detail: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            detail,
        }
    }

    #[must_use]
    pub fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

/// Ordered results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub results: Vec<CheckResult>,
}

impl RunReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Process exit code: `0` if every check passed, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    /// Pass/fail flags in order, ignoring details.
    #[must_use]
    pub fn outcomes(&self) -> Vec<(&str, bool)> {
        self.results
            .iter()
            .map(|r| (r.name.as_str(), r.passed))
            .collect()
    }
}

/// Runs checks one after another against a shared client.
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
    #[must_use]
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check. A failing check never stops the batch; the report
    /// always holds one result per check, in order.
    pub async fn run(&self, client: &dyn DatabaseClient) -> RunReport {
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let name = check.name();
            let started = Instant::now();
            let outcome = check.run(client).await;
            debug!(check = name, elapsed = ?started.elapsed(), "check finished");

            let result = match outcome {
                Ok(detail) => {
                    info!(check = name, "passed");
                    CheckResult::pass(name, detail)
                }
                Err(e) => {
                    warn!(check = name, error = %e, "failed");
                    CheckResult::fail(name, e.to_string())
                }
            };
            results.push(result);
        }

        RunReport { results }
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new(default_checks())
    }
}
