//! Thin HTTP client for the CMS API.
//!
//! Every content endpoint lives under the `/api` prefix and answers with a
//! `{ data, meta }` envelope. This module only moves bytes; shape handling
//! belongs to [`crate::normalize`] and resource semantics to
//! [`crate::content`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::Error;

/// The response envelope every CMS endpoint returns. `data` is a single
/// object for single types, an array for collections, and null/absent when
/// nothing is configured.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl CmsClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        // Unbounded by default: a hung request blocks its cache key until
        // the transport resolves. `request_timeout` is the opt-in cap.
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.cms_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Issue `GET {base}/api{path}` with the given query parameters and
    /// decode the `{ data, meta }` envelope.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse, Error> {
        let url = self.url(path);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }

        debug!(%url, "CMS request");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { status, url });
        }
        Ok(response.json().await?)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}/api{}", self.base_url, path)
        } else {
            format!("{}/api/{}", self.base_url, path)
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CmsClient {
        CmsClient::new(&Config::for_url(base)).unwrap()
    }

    #[test]
    fn url_joins_under_api_prefix() {
        let c = client("http://localhost:1337");
        assert_eq!(c.url("/hero"), "http://localhost:1337/api/hero");
        assert_eq!(c.url("projects"), "http://localhost:1337/api/projects");
    }

    #[test]
    fn trailing_slash_on_base_is_trimmed() {
        let c = client("https://cms.example.com/");
        assert_eq!(c.url("/soft-skills"), "https://cms.example.com/api/soft-skills");
    }
}
