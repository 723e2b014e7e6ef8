//! Request URL construction.
//!
//! Building a capture URL never fails: the base URL is checked once by
//! [`parse_base_url`] and options are validated before they get here.

use crate::options::{CaptureOptions, TIMESTAMP_PARAM};
use crate::{Error, Result};
use log::warn;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Parse and check the service base URL.
///
/// The URL must be `http` or `https` and able to carry path segments so
/// endpoint names can be joined onto it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: "cannot carry a path".into(),
        });
    }
    Ok(url)
}

/// Join an endpoint name onto the base URL path, keeping any path prefix
/// and query string already present.
pub fn endpoint(base: &Url, name: &str) -> Url {
    let mut url = base.clone();
    if name.is_empty() {
        return url;
    }
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(name);
    }
    url
}

/// `<base>/screenshot`
pub fn screenshot_endpoint(base: &Url) -> Url {
    endpoint(base, "screenshot")
}

/// Build the full capture URL with `_t` appended last.
///
/// Values are form-encoded; `?` or `&` is chosen depending on whether the
/// endpoint already carries a query.
pub fn build_capture_url(endpoint: &Url, options: &CaptureOptions, timestamp: u64) -> Url {
    let mut url = endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in options.query_pairs() {
            query.append_pair(&key, &value);
        }
        query.append_pair(TIMESTAMP_PARAM, &timestamp.to_string());
    }
    url
}

/// Current Unix time in whole seconds
pub fn unix_timestamp() -> u64 {
    seconds_since_epoch(SystemTime::now())
}

fn seconds_since_epoch(now: SystemTime) -> u64 {
    match now.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs(),
        Err(e) => {
            warn!(
                "System clock is {:?} before the Unix epoch; sending {}=0 will not bust caches",
                e.duration(),
                TIMESTAMP_PARAM
            );
            0
        }
    }
}
