// Async HTTP client for the product REST API.
//
// Base path: `{base_url}/products`. No authentication. Endpoint methods
// live in `products.rs`; this module keeps URL construction, the HTTP
// verbs, and response decoding.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the product API.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ProductClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: 0,
        })
    }

    /// The API root every path is joined onto (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append `segments` (e.g. `["products", "3"]`) to the base URL.
    ///
    /// Each segment is percent-encoded as a unit, so `/` or `..` inside an
    /// id can never leave the collection path. Empty and dot segments
    /// cannot name a resource and are reported as not found.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if segments.iter().any(|s| matches!(*s, "" | "." | "..")) {
            return Err(Error::NotFound {
                path: segments.join("/"),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments)?;
        let path = segments.join("/");
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(|e| self.transport(e))?;
        self.handle_response(&path, resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let path = segments.join("/");
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.handle_response(&path, resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let path = segments.join("/");
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.handle_response(&path, resp).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        let path = segments.join("/");
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        self.handle_empty(&path, resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Decode a success body, mapping an empty or `null` body to
    /// [`Error::NotFound`] (the API's answer for unknown ids).
    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(path, status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport(e))?;
        trace!(path, bytes = body.len(), "response body received");

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(Error::NotFound {
                path: path.to_owned(),
            });
        }

        serde_json::from_str(trimmed).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn handle_empty(&self, path: &str, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(path, status, resp).await)
        }
    }

    async fn parse_error(path: &str, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::NOT_FOUND {
            return Error::NotFound {
                path: path.to_owned(),
            };
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = if raw.trim().is_empty() {
            status
                .canonical_reason()
                .map_or_else(|| status.to_string(), str::to_owned)
        } else {
            raw.chars().take(200).collect()
        };

        Error::Http {
            status: status.as_u16(),
            message,
        }
    }

    fn transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() && self.timeout_secs > 0 {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}
