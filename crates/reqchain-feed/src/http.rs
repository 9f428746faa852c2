//! HTTP implementation of [`RecordFeed`] for OSLC requirement endpoints.

use async_trait::async_trait;
use reqchain_sync::IncomingRecord;
use tracing::{debug, info};

use crate::error::FeedError;
use crate::rdf::RdfRequirementParser;
use crate::RecordFeed;

/// Fetches an RDF/XML requirement document from a fixed URL.
pub struct OslcHttpFeed {
    client: reqwest::Client,
    url: String,
    parser: RdfRequirementParser,
}

impl OslcHttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        OslcHttpFeed {
            client: reqwest::Client::new(),
            url: url.into(),
            parser: RdfRequirementParser::new(),
        }
    }
}

#[async_trait]
impl RecordFeed for OslcHttpFeed {
    async fn fetch(&self) -> Result<Vec<IncomingRecord>, FeedError> {
        debug!(url = %self.url, "fetching requirement feed");
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/rdf+xml")
            .send()
            .await
            .map_err(|source| FeedError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FeedError::Transport { source })?;
        let records = self.parser.parse(&body)?;
        info!(records = records.len(), "requirement feed fetched");
        Ok(records)
    }
}
