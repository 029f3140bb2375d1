use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

use super::peers::PeerClient;
use super::protocol::{KeyValueBody, QUERY_LOCAL, deleted_body};
use crate::cache::ByteView;
use crate::error::{CacheError, Result};

/// Speaks the peer protocol to one remote node. Every request is marked `local=true`
/// and bounded by `timeout`.
pub struct HttpPeerClient {
    addr: String,
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpPeerClient {
    /// `base_url` is the peer address joined with the protocol base path.
    pub fn new(addr: &str, base_url: String, http_client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            addr: addr.to_string(),
            base_url,
            http_client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| self.unreachable(e))?;
        url.path_segments_mut()
            .map_err(|_| self.unreachable(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair(QUERY_LOCAL, "true");
        Ok(url)
    }

    fn unreachable(&self, reason: impl ToString) -> CacheError {
        CacheError::PeerUnreachable {
            peer: self.addr.clone(),
            reason: reason.to_string(),
        }
    }

    fn decode_error(&self, reason: impl ToString) -> CacheError {
        CacheError::Decode {
            peer: self.addr.clone(),
            reason: reason.to_string(),
        }
    }

    fn check_status(&self, response: &reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(CacheError::PeerStatus {
                peer: self.addr.clone(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    fn addr(&self) -> &str {
        &self.addr
    }

    async fn get(&self, group: &str, key: &str) -> Result<ByteView> {
        let url = self.url(&[group, key])?;
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        self.check_status(&response)?;

        let mut body: KeyValueBody = response.json().await.map_err(|e| self.decode_error(e))?;
        match body.remove(key) {
            Some(value) => Ok(ByteView::from(value)),
            None => Err(CacheError::MissingKey {
                peer: self.addr.clone(),
                key: key.to_string(),
            }),
        }
    }

    async fn delete(&self, group: &str, key: &str) -> Result<bool> {
        let url = self.url(&[group, key])?;
        tracing::debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        self.check_status(&response)?;

        let body = response.text().await.map_err(|e| self.decode_error(e))?;
        Ok(body.trim() == deleted_body(1))
    }

    async fn update(&self, group: &str, payload: &str) -> Result<()> {
        let url = self.url(&[group])?;
        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        self.check_status(&response)
    }
}
