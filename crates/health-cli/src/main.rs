//! health-cli: run the financial health engine over a JSON request.
//!
//! The input is either a full request (`{"statement": {...}, "industry": ...,
//! "history": [...], "reference": [...], "horizon": N}`) or a bare statement
//! object. The analysis is printed as JSON on stdout; logs go to stderr.
//!
//! Usage:
//!   cargo run -p health-cli -- --input request.json
//!   cat statement.json | cargo run -p health-cli -- --input - --industry retail
//!   cargo run -p health-cli -- --input request.json --horizon 6 --compact

use analysis_core::FinancialStatement;
use anyhow::{bail, Context};
use health_engine::{AnalysisRequest, FinancialHealthEngine};
use std::io::Read;

#[derive(Debug, PartialEq)]
struct CliArgs {
    input: String,
    industry: Option<String>,
    horizon: Option<usize>,
    compact: bool,
}

/// Value following `flag`; another flag in that slot means no value.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .filter(|v| !v.starts_with("--"))
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let Some(input) = flag_value(args, "--input") else {
        bail!("missing --input");
    };

    let horizon = flag_value(args, "--horizon")
        .map(|v| v.parse::<usize>())
        .transpose()
        .context("--horizon must be a positive integer")?;

    Ok(CliArgs {
        input: input.to_string(),
        industry: flag_value(args, "--industry").map(str::to_string),
        horizon,
        compact: args.iter().any(|a| a == "--compact"),
    })
}

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
    }
}

/// Accept a full request or a bare statement.
fn parse_request(raw: &str) -> anyhow::Result<AnalysisRequest> {
    match serde_json::from_str::<AnalysisRequest>(raw) {
        Ok(request) => Ok(request),
        Err(request_err) => serde_json::from_str::<FinancialStatement>(raw)
            .map(AnalysisRequest::new)
            .with_context(|| format!("input is neither a request nor a statement: {}", request_err)),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  health-cli --input PATH             JSON request or statement ('-' for stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --industry TAG     Override the request's industry (default: services)");
    eprintln!("  --horizon N        Forecast periods (default: HEALTH_FORECAST_HORIZON or 12)");
    eprintln!("  --compact          Print single-line JSON");
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "health_cli=info,health_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let mut request = parse_request(&read_input(&cli.input)?)?;
    if let Some(industry) = cli.industry {
        request.industry = Some(industry);
    }
    if let Some(horizon) = cli.horizon {
        request.horizon = Some(horizon);
    }

    let engine = FinancialHealthEngine::from_env().context("invalid engine configuration")?;
    tracing::info!(
        "Analyzing statement with {} fields (history: {}, reference: {})",
        request.statement.len(),
        request.history.as_ref().map_or(0, Vec::len),
        request.reference.as_ref().map_or(0, Vec::len)
    );

    let analysis = engine.analyze(&request).context("analysis failed")?;

    let output = if cli.compact {
        serde_json::to_string(&analysis)?
    } else {
        serde_json::to_string_pretty(&analysis)?
    };
    println!("{}", output);

    Ok(())
}
