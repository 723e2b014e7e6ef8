//! ShotAPI client
//!
//! A blocking client for the ShotAPI screenshot service. It turns typed
//! capture options into `GET /screenshot` requests, checks the response
//! status, and writes the returned PNG/JPEG/PDF bytes to disk.
//!
//! # Example
//!
//! ```no_run
//! use shotapi_client::{CaptureOptions, ClientConfig, OutputDir, ShotClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ShotClient::new(ClientConfig::default())?;
//! let shot = client.capture(&CaptureOptions::new("https://example.com").viewport(1280, 800))?;
//!
//! let saved = OutputDir::new("output").save("basic.png", &shot.bytes)?;
//! println!("Saved to: {}", saved.path.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod client;
pub mod options;
pub mod persist;
pub mod request;
pub mod scenarios;

pub use client::{ApiInfo, CacheStatus, CaptureResult, HealthStatus, ShotClient};
pub use options::{CaptureOptions, ImageFormat, PdfFormat, WaitUntil};
pub use persist::{OutputDir, SavedFile};
pub use scenarios::{demo_scenarios, run_scenarios, RunReport, Scenario};

/// Base URL used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Name of the directory captures are written to
pub const OUTPUT_DIR_NAME: &str = "output";

/// Configuration for [`ShotClient`]
///
/// # Examples
///
/// ```
/// let cfg = shotapi_client::ClientConfig::default();
/// assert_eq!(cfg.api_url, "http://localhost:3000");
/// assert!(cfg.api_key.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL; endpoints are joined onto its path
    pub api_url: String,
    /// Sent as `x-api-key` when set
    pub api_key: Option<String>,
    /// User agent of the client itself (not the emulated browser)
    pub user_agent: String,
    /// Request timeout in milliseconds; `None` waits as long as the service takes
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            user_agent: concat!("shotapi-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: None,
        }
    }
}

/// `output/` next to the running executable, or under the working
/// directory when the executable path is unavailable.
pub fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(OUTPUT_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(OUTPUT_DIR_NAME))
}
