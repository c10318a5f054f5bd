// src/fetch.rs

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::ResultError;
use crate::usn::Usn;

/// Posts a USN to the result endpoint and hands back the page body.
///
/// One attempt per call; there is no retry.
#[derive(Debug, Clone)]
pub struct ResultFetcher {
    client: Client,
    endpoint: Url,
    submit_action: String,
}

impl ResultFetcher {
    /// Build a fetcher with its own `reqwest` client from `config`.
    pub fn new(config: &Config) -> Result<Self, ResultError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ResultError::Network(format!("building HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            submit_action: config.submit_action.clone(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `USN=<usn>&Action=<submit action>` and return the body on 200.
    ///
    /// Any other status and every transport failure is a
    /// [`ResultError::Network`].
    #[instrument(level = "info", skip(self, usn), fields(usn = %usn, endpoint = %self.endpoint))]
    pub async fn fetch_page(&self, usn: &Usn) -> Result<String, ResultError> {
        debug!("posting USN form");
        let resp = self
            .client
            .post(self.endpoint.clone())
            .form(&[
                ("USN", usn.as_str()),
                ("Action", self.submit_action.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "request failed");
                ResultError::from(e)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(%status, "non-200 response");
            return Err(ResultError::Network(format!(
                "HTTP {} from {}",
                status, self.endpoint
            )));
        }

        let body = resp.text().await.map_err(|e| {
            warn!(error = %e, "reading body failed");
            ResultError::from(e)
        })?;
        debug!(bytes = body.len(), "received result page");
        Ok(body)
    }
}
