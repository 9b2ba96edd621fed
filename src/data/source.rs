//! Poll retrieval from the configured source URL.

use reqwest::blocking::Client;
use tracing::info;

use crate::data::html::{extract_first_table, RawTable};
use crate::error::PollError;

const POLLS_URL_VAR: &str = "POLLS_URL";

/// Blocking HTTP client for the poll source.
pub struct PollsClient {
    client: Client,
    url: String,
}

impl PollsClient {
    /// Build a client from the `POLLS_URL` environment variable (`.env` supported).
    pub fn from_env() -> Result<Self, PollError> {
        dotenvy::dotenv().ok();
        let url = std::env::var(POLLS_URL_VAR)
            .map_err(|_| PollError::MissingEnv { name: POLLS_URL_VAR })?;
        Ok(Self::new(url))
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the source page and extract its poll table.
    pub fn fetch_raw_table(&self) -> Result<RawTable, PollError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| PollError::Fetch(format!("request to {} failed: {e}", self.url)))?;

        if !resp.status().is_success() {
            return Err(PollError::Fetch(format!(
                "request to {} failed with status {}",
                self.url,
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| PollError::Fetch(format!("failed to read response body: {e}")))?;

        let table = extract_first_table(&body)?;
        info!(
            url = %self.url,
            n_rows = table.rows.len(),
            n_columns = table.headers.len(),
            "retrieved polling data"
        );
        Ok(table)
    }
}
