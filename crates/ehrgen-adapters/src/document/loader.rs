//! Capability statement loader for local files and HTTP(S) URLs.

use std::path::Path;
use std::time::Duration;

use ehrgen_core::{
    application::{ApplicationError, ports::DocumentSource},
    domain::{CancelToken, CapabilityLocation},
    error::EhrGenResult,
};
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};
use url::Url;

/// Default upper bound for a remote fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const FHIR_JSON: &str = "application/fhir+json, application/json;q=0.9";

/// Production [`DocumentSource`]: `std::fs` for paths, blocking `reqwest`
/// for URLs.
#[derive(Debug, Clone)]
pub struct CapabilityDocumentLoader {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl CapabilityDocumentLoader {
    /// Loader whose remote fetches give up after `timeout` (further capped by
    /// the run's [`CancelToken`] deadline).
    pub fn new(timeout: Duration) -> EhrGenResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("ehrgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApplicationError::Fetch {
                location: "<http client>".into(),
                reason: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, timeout })
    }

    fn fetch(&self, url: &Url, token: &CancelToken) -> EhrGenResult<String> {
        let timeout = token.cap(self.timeout);
        if timeout.is_zero() {
            return Err(cancelled(url.as_str()));
        }
        debug!(timeout_ms = timeout.as_millis() as u64, "Fetching capability statement");

        let fetch_error = |e: reqwest::Error| ApplicationError::Fetch {
            location: url.to_string(),
            reason: describe(&e),
        };

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, FHIR_JSON)
            .timeout(timeout)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        response.text().map_err(|e| fetch_error(e).into())
    }

    fn read(&self, path: &Path) -> EhrGenResult<String> {
        if !path.exists() {
            return Err(ApplicationError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        std::fs::read_to_string(path).map_err(|e| {
            ApplicationError::Fetch {
                location: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl DocumentSource for CapabilityDocumentLoader {
    #[instrument(skip_all, fields(location = %location))]
    fn load(&self, location: &CapabilityLocation, token: &CancelToken) -> EhrGenResult<String> {
        if token.is_cancelled() {
            return Err(cancelled(&location.to_string()));
        }
        match location {
            CapabilityLocation::Remote(url) => self.fetch(url, token),
            CapabilityLocation::Local(path) => self.read(path),
        }
    }
}

fn cancelled(location: &str) -> ehrgen_core::error::EhrGenError {
    ApplicationError::Cancelled {
        reason: format!("stopped before reading {location}"),
    }
    .into()
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".into()
    } else if let Some(status) = e.status() {
        format!("server responded with {status}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}
