//! Typed capture options sent to the `/screenshot` endpoint.
//!
//! Every parameter the service understands has its own field so it can be
//! validated before a request goes out. Parameters this crate does not know
//! about yet can still be forwarded through [`CaptureOptions::extra`].

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Name of the cache-busting parameter appended to every capture request.
pub const TIMESTAMP_PARAM: &str = "_t";

const MAX_DIMENSION: u32 = 5000;
const MAX_MIN_LOAD_TIME_MS: u32 = 30_000;
const MAX_LOAD_TIME_RANGE_MS: (u32, u32) = (1_000, 60_000);

/// Query keys that map onto typed fields.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "url",
    "width",
    "height",
    "format",
    "quality",
    "fullPage",
    "pdfFormat",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "printBackground",
    "userAgent",
    "darkMode",
    "transparent",
    "blockAds",
    "selector",
    "waitForSelector",
    "waitUntil",
    "minLoadTime",
    "maxLoadTime",
    "cacheTime",
    "headers",
];

/// Output format produced by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Pdf => "pdf",
        }
    }

    /// File extension conventionally used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "pdf" => Ok(ImageFormat::Pdf),
            other => Err(Error::invalid_option(
                "format",
                format!("'{}' is not one of png, jpeg, jpg, pdf", other),
            )),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paper size used for PDF output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFormat {
    Letter,
    Legal,
    Tabloid,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
}

impl PdfFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfFormat::Letter => "Letter",
            PdfFormat::Legal => "Legal",
            PdfFormat::Tabloid => "Tabloid",
            PdfFormat::A0 => "A0",
            PdfFormat::A1 => "A1",
            PdfFormat::A2 => "A2",
            PdfFormat::A3 => "A3",
            PdfFormat::A4 => "A4",
            PdfFormat::A5 => "A5",
        }
    }
}

impl FromStr for PdfFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Letter" => Ok(PdfFormat::Letter),
            "Legal" => Ok(PdfFormat::Legal),
            "Tabloid" => Ok(PdfFormat::Tabloid),
            "A0" => Ok(PdfFormat::A0),
            "A1" => Ok(PdfFormat::A1),
            "A2" => Ok(PdfFormat::A2),
            "A3" => Ok(PdfFormat::A3),
            "A4" => Ok(PdfFormat::A4),
            "A5" => Ok(PdfFormat::A5),
            other => Err(Error::invalid_option(
                "pdfFormat",
                format!("unsupported paper size '{}'", other),
            )),
        }
    }
}

/// Page lifecycle event the service waits for before capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    Load,
    DomContentLoaded,
    NetworkIdle0,
    NetworkIdle2,
}

impl WaitUntil {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle0 => "networkidle0",
            WaitUntil::NetworkIdle2 => "networkidle2",
        }
    }
}

impl FromStr for WaitUntil {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "load" => Ok(WaitUntil::Load),
            "domcontentloaded" => Ok(WaitUntil::DomContentLoaded),
            "networkidle0" => Ok(WaitUntil::NetworkIdle0),
            "networkidle2" => Ok(WaitUntil::NetworkIdle2),
            other => Err(Error::invalid_option(
                "waitUntil",
                format!("unknown lifecycle event '{}'", other),
            )),
        }
    }
}

/// Options describing a single capture
///
/// Fields left as `None` are omitted from the request so the service
/// applies its own defaults.
///
/// # Examples
///
/// ```
/// use shotapi_client::{CaptureOptions, ImageFormat};
///
/// let opts = CaptureOptions {
///     format: Some(ImageFormat::Jpeg),
///     quality: Some(90),
///     full_page: Some(true),
///     ..CaptureOptions::new("https://example.com")
/// };
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureOptions {
    /// Page to capture (absolute URI)
    pub url: String,
    /// Viewport width in pixels
    pub width: Option<u32>,
    /// Viewport height in pixels
    pub height: Option<u32>,
    pub format: Option<ImageFormat>,
    /// JPEG quality (1-100)
    pub quality: Option<u8>,
    /// Capture the whole scrollable page instead of the viewport
    pub full_page: Option<bool>,
    pub pdf_format: Option<PdfFormat>,
    /// CSS length such as `10mm`
    pub margin_top: Option<String>,
    pub margin_right: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
    pub print_background: Option<bool>,
    pub user_agent: Option<String>,
    pub dark_mode: Option<bool>,
    pub transparent: Option<bool>,
    pub block_ads: Option<bool>,
    /// Clip the capture to the first element matching this selector
    pub selector: Option<String>,
    pub wait_for_selector: Option<String>,
    pub wait_until: Option<WaitUntil>,
    /// Extra delay after load, in milliseconds
    pub min_load_time: Option<u32>,
    /// Navigation timeout on the service side, in milliseconds
    pub max_load_time: Option<u32>,
    /// Server-side cache lifetime in seconds (0 disables caching)
    pub cache_time: Option<u64>,
    /// Extra request headers for the target page, as a JSON string
    pub headers: Option<String>,
    /// Unrecognized parameters forwarded verbatim, in insertion order
    pub extra: Vec<(String, String)>,
}

impl CaptureOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the viewport size
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Forward a parameter this crate does not model
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Extension matching the requested output format (`png` by default)
    pub fn extension(&self) -> &'static str {
        self.format.unwrap_or(ImageFormat::Png).extension()
    }

    /// Assign a parameter from its query-string form.
    ///
    /// Recognized keys are parsed into their typed field; anything else is
    /// stored in [`CaptureOptions::extra`], replacing an earlier value for
    /// the same key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => self.url = value.to_string(),
            "width" => self.width = Some(parse_number(key, value)?),
            "height" => self.height = Some(parse_number(key, value)?),
            "format" => self.format = Some(value.parse()?),
            "quality" => self.quality = Some(parse_number(key, value)?),
            "fullPage" => self.full_page = Some(parse_flag(key, value)?),
            "pdfFormat" => self.pdf_format = Some(value.parse()?),
            "marginTop" => self.margin_top = Some(value.to_string()),
            "marginRight" => self.margin_right = Some(value.to_string()),
            "marginBottom" => self.margin_bottom = Some(value.to_string()),
            "marginLeft" => self.margin_left = Some(value.to_string()),
            "printBackground" => self.print_background = Some(parse_flag(key, value)?),
            "userAgent" => self.user_agent = Some(value.to_string()),
            "darkMode" => self.dark_mode = Some(parse_flag(key, value)?),
            "transparent" => self.transparent = Some(parse_flag(key, value)?),
            "blockAds" => self.block_ads = Some(parse_flag(key, value)?),
            "selector" => self.selector = Some(value.to_string()),
            "waitForSelector" => self.wait_for_selector = Some(value.to_string()),
            "waitUntil" => self.wait_until = Some(value.parse()?),
            "minLoadTime" => self.min_load_time = Some(parse_number(key, value)?),
            "maxLoadTime" => self.max_load_time = Some(parse_number(key, value)?),
            "cacheTime" => self.cache_time = Some(parse_number(key, value)?),
            "headers" => self.headers = Some(value.to_string()),
            TIMESTAMP_PARAM => {
                return Err(Error::invalid_option(key, "reserved for cache busting"));
            }
            "" => return Err(Error::invalid_option(key, "parameter name is empty")),
            other => {
                if let Some(slot) = self.extra.iter_mut().find(|(k, _)| k == other) {
                    slot.1 = value.to_string();
                } else {
                    self.extra.push((other.to_string(), value.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Check every field against the ranges the service accepts.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::invalid_option("url", "is required"));
        }
        url::Url::parse(&self.url)
            .map_err(|e| Error::invalid_option("url", format!("not an absolute URI ({})", e)))?;

        check_range("width", self.width, 1, MAX_DIMENSION)?;
        check_range("height", self.height, 1, MAX_DIMENSION)?;
        check_range("quality", self.quality, 1, 100)?;
        check_range("minLoadTime", self.min_load_time, 0, MAX_MIN_LOAD_TIME_MS)?;
        let (lo, hi) = MAX_LOAD_TIME_RANGE_MS;
        check_range("maxLoadTime", self.max_load_time, lo, hi)?;

        if let Some(headers) = &self.headers {
            serde_json::from_str::<serde_json::Value>(headers)
                .map_err(|e| Error::invalid_option("headers", format!("not valid JSON ({})", e)))?;
        }

        for (i, (key, _)) in self.extra.iter().enumerate() {
            if key.is_empty() {
                return Err(Error::invalid_option(key, "parameter name is empty"));
            }
            if key == TIMESTAMP_PARAM {
                return Err(Error::invalid_option(key, "reserved for cache busting"));
            }
            if RECOGNIZED_KEYS.contains(&key.as_str()) {
                return Err(Error::invalid_option(
                    key,
                    "has a typed field; set it there instead of as an extra",
                ));
            }
            if self.extra[..i].iter().any(|(k, _)| k == key) {
                return Err(Error::invalid_option(key, "given more than once"));
            }
        }
        Ok(())
    }

    /// Query parameters in the order they are sent, without `_t`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                pairs.push((key.to_string(), v));
            }
        };

        push("url", Some(self.url.clone()));
        push("width", self.width.map(|v| v.to_string()));
        push("height", self.height.map(|v| v.to_string()));
        push("format", self.format.map(|f| f.as_str().to_string()));
        push("quality", self.quality.map(|v| v.to_string()));
        push("fullPage", self.full_page.map(flag));
        push("pdfFormat", self.pdf_format.map(|p| p.as_str().to_string()));
        push("marginTop", self.margin_top.clone());
        push("marginRight", self.margin_right.clone());
        push("marginBottom", self.margin_bottom.clone());
        push("marginLeft", self.margin_left.clone());
        push("printBackground", self.print_background.map(flag));
        push("userAgent", self.user_agent.clone());
        push("darkMode", self.dark_mode.map(flag));
        push("transparent", self.transparent.map(flag));
        push("blockAds", self.block_ads.map(flag));
        push("selector", self.selector.clone());
        push("waitForSelector", self.wait_for_selector.clone());
        push("waitUntil", self.wait_until.map(|w| w.as_str().to_string()));
        push("minLoadTime", self.min_load_time.map(|v| v.to_string()));
        push("maxLoadTime", self.max_load_time.map(|v| v.to_string()));
        push("cacheTime", self.cache_time.map(|v| v.to_string()));
        push("headers", self.headers.clone());

        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}

fn flag(value: bool) -> String {
    value.to_string()
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::invalid_option(
            key,
            format!("expected 'true' or 'false', got '{}'", other),
        )),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::invalid_option(key, format!("expected an integer, got '{}'", value)))
}

fn check_range<T>(key: &str, value: Option<T>, min: T, max: T) -> Result<()>
where
    T: PartialOrd + fmt::Display + Copy,
{
    match value {
        Some(v) if v < min || v > max => Err(Error::invalid_option(
            key,
            format!("{} is outside {}..={}", v, min, max),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_only_send_url() {
        let opts = CaptureOptions::new("https://example.com");
        assert_eq!(
            opts.query_pairs(),
            vec![("url".to_string(), "https://example.com".to_string())]
        );
        assert_eq!(opts.extension(), "png");
    }

    #[test]
    fn set_parses_typed_fields() {
        let mut opts = CaptureOptions::new("https://example.com");
        opts.set("width", "375").unwrap();
        opts.set("fullPage", "true").unwrap();
        opts.set("format", "jpg").unwrap();
        opts.set("pdfFormat", "A4").unwrap();
        opts.set("waitUntil", "networkidle2").unwrap();
        assert_eq!(opts.width, Some(375));
        assert_eq!(opts.full_page, Some(true));
        assert_eq!(opts.format, Some(ImageFormat::Jpeg));
        assert_eq!(opts.pdf_format, Some(PdfFormat::A4));
        assert_eq!(opts.wait_until, Some(WaitUntil::NetworkIdle2));
        assert_eq!(opts.extension(), "jpg");
    }

    #[test]
    fn set_rejects_malformed_values() {
        let mut opts = CaptureOptions::new("https://example.com");
        assert!(opts.set("width", "wide").is_err());
        assert!(opts.set("darkMode", "yes").is_err());
        assert!(opts.set("format", "gif").is_err());
        assert!(opts.set("_t", "1").is_err());
    }

    #[test]
    fn unknown_keys_pass_through_and_replace() {
        let mut opts = CaptureOptions::new("https://example.com");
        opts.set("deviceScaleFactor", "2").unwrap();
        opts.set("deviceScaleFactor", "3").unwrap();
        assert_eq!(
            opts.extra,
            vec![("deviceScaleFactor".to_string(), "3".to_string())]
        );
        let pairs = opts.query_pairs();
        assert_eq!(pairs.last().unwrap().0, "deviceScaleFactor");
    }

    #[test]
    fn validate_enforces_service_ranges() {
        let base = CaptureOptions::new("https://example.com");
        assert!(base.clone().viewport(5000, 1).validate().is_ok());
        assert!(base.clone().viewport(0, 800).validate().is_err());
        assert!(base.clone().viewport(1280, 5001).validate().is_err());

        let q = CaptureOptions {
            quality: Some(0),
            ..base.clone()
        };
        assert!(q.validate().is_err());

        let slow = CaptureOptions {
            max_load_time: Some(500),
            ..base.clone()
        };
        let err = slow.validate().unwrap_err();
        assert!(err.to_string().contains("maxLoadTime"));
    }

    #[test]
    fn validate_requires_absolute_url() {
        assert!(CaptureOptions::new("").validate().is_err());
        assert!(CaptureOptions::new("example.com/page").validate().is_err());
    }

    #[test]
    fn validate_rejects_shadowing_extras() {
        let dup = CaptureOptions::new("https://example.com").with_extra("width", "10");
        assert!(dup.validate().is_err());

        let twice = CaptureOptions::new("https://example.com")
            .with_extra("foo", "1")
            .with_extra("foo", "2");
        assert!(twice.validate().is_err());

        let reserved = CaptureOptions::new("https://example.com").with_extra("_t", "0");
        assert!(reserved.validate().is_err());
    }

    #[test]
    fn headers_must_be_json() {
        let bad = CaptureOptions {
            headers: Some("X-Test: 1".into()),
            ..CaptureOptions::new("https://example.com")
        };
        assert!(bad.validate().is_err());

        let good = CaptureOptions {
            headers: Some(r#"{"X-Test":"1"}"#.into()),
            ..CaptureOptions::new("https://example.com")
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn every_recognized_key_round_trips_through_set() {
        let samples = [
            ("width", "10"),
            ("height", "10"),
            ("format", "pdf"),
            ("quality", "50"),
            ("fullPage", "false"),
            ("pdfFormat", "Letter"),
            ("marginTop", "1cm"),
            ("marginRight", "1cm"),
            ("marginBottom", "1cm"),
            ("marginLeft", "1cm"),
            ("printBackground", "true"),
            ("userAgent", "ua"),
            ("darkMode", "true"),
            ("transparent", "false"),
            ("blockAds", "true"),
            ("selector", "#main"),
            ("waitForSelector", ".ready"),
            ("waitUntil", "load"),
            ("minLoadTime", "0"),
            ("maxLoadTime", "1000"),
            ("cacheTime", "0"),
            ("headers", "{}"),
        ];
        let mut opts = CaptureOptions::new("https://example.com");
        for (k, v) in samples {
            opts.set(k, v).unwrap();
        }
        assert!(opts.extra.is_empty());
        assert!(opts.validate().is_ok());

        let pairs = opts.query_pairs();
        assert_eq!(pairs.len(), RECOGNIZED_KEYS.len());
        for (k, v) in samples {
            assert!(pairs.contains(&(k.to_string(), v.to_string())), "{}", k);
        }
    }
}
