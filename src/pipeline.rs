// src/pipeline.rs

use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::error::ResultError;
use crate::fetch::ResultFetcher;
use crate::parse::parse_result_page;
use crate::record::StudentRecord;
use crate::report::Report;
use crate::score::score;
use crate::usn::Usn;

/// Validate `raw_usn`, fetch its page and parse it.
///
/// Validation happens before the fetcher is touched, so a malformed USN
/// never reaches the network.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_record(
    fetcher: &ResultFetcher,
    raw_usn: &str,
) -> Result<StudentRecord, ResultError> {
    // 1) validate
    let usn = Usn::parse(raw_usn).map_err(|e| {
        warn!(error = %e, "rejected USN");
        e
    })?;
    info!(usn = %usn, "validated");

    // 2) fetch
    let html = fetcher.fetch_page(&usn).await?;
    info!(bytes = html.len(), "fetched");

    // 3) parse
    let record = parse_result_page(&usn, &html)?;
    info!(name = record.name(), subjects = record.grades().len(), "parsed");
    Ok(record)
}

/// Full run: validate → fetch → parse → score.
pub async fn run(fetcher: &ResultFetcher, raw_usn: &str) -> Result<Report, ResultError> {
    let record = fetch_record(fetcher, raw_usn).await?;

    // 4) score
    let sgpa = score(record.grades()).map_err(|e| {
        warn!(error = %e, "scoring failed");
        e
    })?;
    info!(sgpa = sgpa.value(), "scored");

    Ok(Report::new(record, sgpa))
}

/// [`run`] bounded by `deadline`. Running out of time counts as a
/// network failure since the only thing that can stall is the fetch.
pub async fn run_with_timeout(
    fetcher: &ResultFetcher,
    raw_usn: &str,
    deadline: Duration,
) -> Result<Report, ResultError> {
    match timeout(deadline, run(fetcher, raw_usn)).await {
        Ok(res) => res,
        Err(_) => {
            warn!(?deadline, "deadline elapsed");
            Err(ResultError::Network(format!(
                "no response within {:?}",
                deadline
            )))
        }
    }
}
