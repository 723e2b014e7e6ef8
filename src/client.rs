//! Blocking HTTP client for the screenshot service.
//!
//! A capture is a single GET; there are no retries. Any status outside
//! 200-299 becomes [`Error::Api`] carrying the status code and the best
//! message the response offers.

use crate::options::CaptureOptions;
use crate::request::{build_capture_url, endpoint, parse_base_url, screenshot_endpoint, unix_timestamp};
use crate::{ClientConfig, Error, Result};
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Header used to pass the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Cache outcome reported by the service in `X-Cache`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Disabled,
}

/// Payload and metadata of a successful capture
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// HTTP status (always in 200-299)
    pub status: u16,
    /// Response headers, lower-cased names
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes, passed through unchanged
    pub bytes: Vec<u8>,
}

impl CaptureResult {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    pub fn cache_status(&self) -> Option<CacheStatus> {
        match self.headers.get("x-cache")?.to_ascii_uppercase().as_str() {
            "HIT" => Some(CacheStatus::Hit),
            "MISS" => Some(CacheStatus::Miss),
            "DISABLED" => Some(CacheStatus::Disabled),
            _ => None,
        }
    }

    /// File extension implied by the content type
    pub fn extension(&self) -> Option<&'static str> {
        let mime = self.content_type()?.split(';').next()?.trim();
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some("png"),
            "image/jpeg" => Some("jpg"),
            "application/pdf" => Some("pdf"),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// One entry of the service's endpoint listing
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `GET /`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub docs: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Client bound to one service base URL
pub struct ShotClient {
    http: Client,
    base: Url,
    api_key: Option<String>,
}

impl ShotClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = parse_base_url(&config.api_url)?;

        // captures may legitimately outlast reqwest's 30s blocking default
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout_ms.map(Duration::from_millis))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base,
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Validate `options` and build the capture URL with a fresh timestamp.
    pub fn prepare(&self, options: &CaptureOptions) -> Result<Url> {
        options.validate()?;
        Ok(build_capture_url(
            &screenshot_endpoint(&self.base),
            options,
            unix_timestamp(),
        ))
    }

    /// GET a prepared capture URL and return the payload on 2xx.
    pub fn fetch(&self, url: &Url) -> Result<CaptureResult> {
        info!("Requesting: {}", url);
        let resp = self.request(Method::GET, url.clone()).send()?;
        let resp = check_status(resp)?;

        let status = resp.status().as_u16();
        let headers = collect_headers(resp.headers());
        debug!("Response headers: {:?}", headers);

        let bytes = resp.bytes()?.to_vec();
        debug!("Received {} bytes from {}", bytes.len(), url.path());
        Ok(CaptureResult {
            status,
            headers,
            bytes,
        })
    }

    /// Validate, build, and fetch in one step.
    pub fn capture(&self, options: &CaptureOptions) -> Result<CaptureResult> {
        let url = self.prepare(options)?;
        self.fetch(&url)
    }

    /// `GET /health`
    pub fn health(&self) -> Result<HealthStatus> {
        self.json(Method::GET, endpoint(&self.base, "health"))
    }

    /// `GET /`
    pub fn info(&self) -> Result<ApiInfo> {
        self.json(Method::GET, endpoint(&self.base, ""))
    }

    /// `POST /clear-cache`; the service always requires a key here.
    pub fn clear_cache(&self) -> Result<String> {
        if self.api_key.is_none() {
            return Err(Error::Config(
                "clearing the cache requires an API key".into(),
            ));
        }
        let body: MessageBody = self.json(Method::POST, endpoint(&self.base, "clear-cache"))?;
        info!("{}", body.message);
        Ok(body.message)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key.as_str()),
            None => builder,
        }
    }

    fn json<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T> {
        debug!("{} {}", method, url);
        let resp = check_status(self.request(method, url).send()?)?;
        let body = resp.bytes()?;
        serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().map(|b| b.to_vec()).unwrap_or_default();
    Err(api_error(status, &body))
}

/// Build the error for a non-success response.
///
/// Uses `error.message` from a JSON envelope when present, otherwise the
/// status's canonical reason phrase.
pub fn api_error(status: StatusCode, body: &[u8]) -> Error {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string()
    });
    Error::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extract `error.message` from a JSON error body.
///
/// Non-null scalars are rendered as text. Malformed and message-less bodies
/// both yield `None`; the difference is only logged.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            debug!("Error body is not JSON ({} bytes): {}", body.len(), e);
            return None;
        }
    };
    let message = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| match m {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        });
    if message.is_none() {
        debug!("Error body has no error.message field: {}", value);
    }
    message
}

fn collect_headers(map: &HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}
