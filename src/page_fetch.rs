use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::http_client::build_http_client;

/// Source of raw HTML documents.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, TransportError>;

    /// HTTP status of a GET on `url`, without reading the body.
    fn probe(&self, url: &str) -> Result<u16, TransportError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_http_client(timeout, user_agent)?,
        })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, TransportError> {
        self.client
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .header(ACCEPT_LANGUAGE, "es-CO,es;q=0.9")
            .send()
            .map_err(|err| TransportError::from_reqwest(url, err))
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let resp = self.get(url)?;
        let status = resp.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "source answered with an error status");
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp
            .text()
            .map_err(|err| TransportError::from_reqwest(url, err))?;
        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }

    fn probe(&self, url: &str) -> Result<u16, TransportError> {
        Ok(self.get(url)?.status().as_u16())
    }
}
