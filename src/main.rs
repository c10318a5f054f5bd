use anyhow::{bail, Context, Result};
use clap::Parser;
use resultfetch::{pipeline, Config, ErrorKind, ResultError, ResultFetcher};
use std::{path::PathBuf, process::ExitCode};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Fetch a student's result page and compute the SGPA.
#[derive(Debug, Parser)]
#[command(name = "resultfetch", version, long_about = None)]
struct Cli {
    /// University seat number, e.g. 4JC15CS129. Prompted for when omitted.
    usn: Option<String>,

    /// Result endpoint to post the USN form to.
    #[arg(long)]
    endpoint: Option<Url>,

    /// Give up after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// YAML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,resultfetch=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ─── 2) configuration: defaults → file → env → flags ─────────────
    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    }
    .with_process_env()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(secs) = cli.timeout {
        config.deadline_secs = secs;
    }
    info!(endpoint = %config.endpoint, deadline = ?config.deadline(), "startup");

    // ─── 3) USN from argv or stdin ───────────────────────────────────
    let raw_usn = match cli.usn {
        Some(usn) => usn,
        None => prompt_usn().await?,
    };

    // ─── 4) run the pipeline ─────────────────────────────────────────
    let fetcher = ResultFetcher::new(&config)?;
    let report = pipeline::run_with_timeout(&fetcher, &raw_usn, config.deadline()).await?;

    if cli.json {
        println!("{}", report.to_json().context("serializing report")?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

async fn prompt_usn() -> Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(b"Enter USN: ").await?;
    stderr.flush().await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    match lines.next_line().await.context("reading USN from stdin")? {
        Some(line) => Ok(line),
        None => bail!("no USN given on stdin"),
    }
}

fn report_failure(err: &anyhow::Error) -> ExitCode {
    let Some(err) = err.downcast_ref::<ResultError>() else {
        error!("{:#}", err);
        eprintln!("fatal error: {:#}", err);
        return ExitCode::FAILURE;
    };
    error!(kind = ?err.kind(), "{}", err);
    let message = match err {
        ResultError::InvalidUsn { input } => format!(
            "{:?} is not a valid USN; expected 10 characters starting with 4JC.",
            input.trim()
        ),
        ResultError::Network(detail) => {
            format!("Could not get a response from the results server ({}).", detail)
        }
        ResultError::Parse(detail) => format!(
            "The server replied, but not with a result page. The USN may have no \
             published result, or the site layout changed ({}).",
            detail
        ),
        ResultError::DivisionByZero => {
            "No creditable subjects on the result page; SGPA cannot be computed.".to_string()
        }
    };
    eprintln!("{}", message);
    ExitCode::from(exit_code(err.kind()))
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidUsn => 2,
        ErrorKind::Network => 3,
        ErrorKind::Parse => 4,
        ErrorKind::DivisionByZero => 5,
    }
}
