//! Triage assistant binary entry point.
//!
//! Reads one JSON document from stdin and writes the result to stdout.
//! All logs go to stderr so stdout carries only command output.
//!
//! Coverage is excluded because the main function drives real stdio.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::process::ExitCode;
use std::sync::Arc;

use triage_assist::anthropic::AnthropicClient;
use triage_assist::assistant::DiagnosticAssistant;
use triage_assist::cli::{self, Command, USAGE};
use triage_assist::config::{Config, DEFAULT_LOG_LEVEL};

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            level
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn build_assistant(config: &Config) -> DiagnosticAssistant<Arc<AnthropicClient>> {
    let Some(api_key) = &config.api_key else {
        tracing::info!("ANTHROPIC_API_KEY not set, using local engine only");
        return DiagnosticAssistant::local_only();
    };

    match AnthropicClient::new(api_key.expose(), config.client_config()) {
        Ok(client) => {
            tracing::info!(model = %config.model, "Remote analysis enabled");
            DiagnosticAssistant::new(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build API client, using local engine only");
            DiagnosticAssistant::local_only()
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging(DEFAULT_LOG_LEVEL);
            tracing::error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let input = if command.reads_input() {
        match cli::read_input(tokio::io::stdin()).await {
            Ok(input) => input,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        String::new()
    };

    let assistant = build_assistant(&config);
    let output = match cli::run(command, &assistant, &input).await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let summary = assistant.metrics().summary();
    tracing::debug!(
        remote = summary.remote_invocations,
        local = summary.local_invocations,
        fallbacks = summary.recent_fallbacks.len(),
        "Run complete"
    );

    if let Err(e) = cli::write_output(tokio::io::stdout(), &output).await {
        tracing::error!("Failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
