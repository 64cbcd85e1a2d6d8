//! txn-smoke CLI.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use txn_smoke::config::{DEFAULT_TIMEOUT_SECS, KEY_ENV, TIMEOUT_ENV, URL_ENV};
use txn_smoke::{report, run_harness, ClientOptions, Credentials, OutputFormat};

/// Exit code for configuration errors (no check was run).
const CONFIG_ERROR_EXIT: u8 = 2;

/// txn-smoke - connectivity smoke checks for a Supabase transactions table
#[derive(Parser, Debug)]
#[command(name = "txn-smoke")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project URL, e.g. https://xyz.supabase.co
    #[arg(long, env = URL_ENV, default_value = "")]
    url: String,

    /// Access key (anon or service role)
    #[arg(long, env = KEY_ENV, default_value = "", hide_env_values = true)]
    key: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = TIMEOUT_ENV,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr so the report on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let credentials = Credentials::new(args.url, args.key);
    let options = ClientOptions::with_timeout(Duration::from_secs(args.timeout_secs));

    match run(&credentials, &options, args.format).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let fatal = e
                .downcast_ref::<txn_smoke::Error>()
                .is_some_and(txn_smoke::Error::is_fatal);
            if fatal {
                ExitCode::from(CONFIG_ERROR_EXIT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(
    credentials: &Credentials,
    options: &ClientOptions,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let outcome = run_harness(credentials, options).await?;
    let rendered = report::render(format, credentials.base_url(), &outcome)?;
    println!("{rendered}");

    if outcome.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(
            "{} of {} checks failed",
            outcome.results.len() - outcome.passed_count(),
            outcome.results.len()
        );
        Ok(ExitCode::FAILURE)
    }
}
