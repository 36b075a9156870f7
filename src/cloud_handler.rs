// src/cloud_handler.rs
use std::time::Duration;

use log::{info, warn};
use reqwest::Url;
use tokio::task;

use crate::data_types::{SpreadsheetId, TabularPayload};
use crate::error::FetchError;

/// Read-only HTTP client for `GET {base}/spreadsheets/{id}/data`.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct CloudHandler {
    client: reqwest::Client,
    base_url: Url,
    tab_id: Option<u32>,
    timeout: Option<Duration>,
}

impl CloudHandler {
    pub fn new(base_url: Url) -> Self {
        CloudHandler {
            client: reqwest::Client::new(),
            base_url,
            tab_id: None,
            timeout: None,
        }
    }

    /// Swaps in a preconfigured client (proxies, TLS roots, default headers).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tab(mut self, tab_id: Option<u32>) -> Self {
        self.tab_id = tab_id;
        self
    }

    /// Resource URL for one spreadsheet. The id is a single, percent-encoded path segment.
    ///
    /// `.` and `..` would be collapsed out of the path as dot segments, so they are
    /// refused. Anything else, `%2e` included, is escaped and kept in place.
    pub fn data_url(&self, id: &SpreadsheetId) -> Result<Url, FetchError> {
        if is_dot_segment(id.as_str()) {
            return Err(FetchError::InvalidIdentifier(id.to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport {
                url: self.base_url.to_string(),
                message: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["spreadsheets", id.as_str(), "data"]);
        if let Some(tab) = self.tab_id {
            url.query_pairs_mut().append_pair("tab_id", &tab.to_string());
        }
        Ok(url)
    }

    pub async fn fetch_data(&self, id: &SpreadsheetId) -> Result<TabularPayload, FetchError> {
        let url = self.data_url(id)?;
        info!("fetching spreadsheet {} from {}", id, url);

        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.request(&url)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("spreadsheet {} timed out after {:?}", id, limit);
                    Err(FetchError::Timeout {
                        url: url.to_string(),
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
            None => self.request(&url).await,
        }
    }

    async fn request(&self, url: &Url) -> Result<TabularPayload, FetchError> {
        let transport = |err: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} answered {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        self.process_data(url, body.to_vec()).await
    }

    // Large sheets decode off the event loop.
    async fn process_data(&self, url: &Url, body: Vec<u8>) -> Result<TabularPayload, FetchError> {
        let decoded = task::spawn_blocking(move || TabularPayload::from_slice(&body))
            .await
            .map_err(|err| FetchError::Transport {
                url: url.to_string(),
                message: format!("decoder task failed: {}", err),
            })?;

        decoded.map_err(|err| {
            warn!("{} sent a malformed payload: {}", url, err);
            FetchError::Malformed(err)
        })
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(base: &str) -> CloudHandler {
        CloudHandler::new(Url::parse(base).unwrap())
    }

    #[test]
    fn data_url_appends_resource_path() {
        let url = handler("http://localhost:8000").data_url(&"42".into()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/spreadsheets/42/data");
    }

    #[test]
    fn data_url_keeps_base_prefix() {
        let url = handler("https://example.com/api/")
            .data_url(&"sheet1".into())
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/spreadsheets/sheet1/data");
    }

    #[test]
    fn data_url_encodes_the_identifier_as_one_segment() {
        let url = handler("http://localhost:8000")
            .data_url(&"a/b c".into())
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/spreadsheets/a%2Fb%20c/data");
    }

    #[test]
    fn data_url_rejects_dot_segment_identifiers() {
        let handler = handler("http://localhost:8000");
        for id in [".", ".."] {
            assert_eq!(
                handler.data_url(&id.into()),
                Err(FetchError::InvalidIdentifier(id.to_string())),
                "{id}"
            );
        }
    }

    #[test]
    fn data_url_keeps_dotted_identifiers_that_are_not_dot_segments() {
        let handler = handler("http://localhost:8000");
        let url = handler.data_url(&"...".into()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/spreadsheets/.../data");
        let url = handler.data_url(&"v1.2".into()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/spreadsheets/v1.2/data");
        let url = handler.data_url(&"%2e%2e".into()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/spreadsheets/%252e%252e/data");
    }

    #[test]
    fn data_url_carries_tab_filter() {
        let url = handler("http://localhost:8000")
            .with_tab(Some(3))
            .data_url(&"7".into())
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/spreadsheets/7/data?tab_id=3");
    }
}
