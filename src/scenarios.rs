//! Demonstration scenarios and the sequential runner that executes them.

use crate::client::ShotClient;
use crate::options::{CaptureOptions, ImageFormat, PdfFormat};
use crate::persist::{OutputDir, SavedFile};
use crate::{Error, Result};
use log::{error, info, warn};
use std::io::Write;

/// Page captured by the demo scenarios unless overridden
pub const DEFAULT_TARGET: &str = "https://example.com";

/// User agent used for the mobile emulation scenario
pub const IPHONE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";

/// One capture and the file it is saved to
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub filename: String,
    pub options: CaptureOptions,
}

impl Scenario {
    pub fn new(name: &str, filename: &str, options: CaptureOptions) -> Self {
        Self {
            name: name.to_string(),
            filename: filename.to_string(),
            options,
        }
    }
}

/// The five demo captures, in the order they run.
pub fn demo_scenarios(target: &str) -> Vec<Scenario> {
    let page = || CaptureOptions::new(target);
    vec![
        Scenario::new("basic", "basic.png", page().viewport(1280, 800)),
        Scenario::new(
            "full page",
            "full-page.jpg",
            CaptureOptions {
                format: Some(ImageFormat::Jpeg),
                quality: Some(90),
                full_page: Some(true),
                ..page()
            },
        ),
        Scenario::new(
            "pdf document",
            "document.pdf",
            CaptureOptions {
                format: Some(ImageFormat::Pdf),
                pdf_format: Some(PdfFormat::A4),
                margin_top: Some("10mm".to_string()),
                ..page()
            },
        ),
        Scenario::new(
            "mobile",
            "mobile.png",
            CaptureOptions {
                user_agent: Some(IPHONE_USER_AGENT.to_string()),
                ..page().viewport(375, 812)
            },
        ),
        Scenario::new(
            "dark mode",
            "dark-mode.png",
            CaptureOptions {
                dark_mode: Some(true),
                ..page()
            },
        ),
    ]
}

/// The scenario that stopped a run
#[derive(Debug)]
pub struct ScenarioFailure {
    pub scenario: String,
    pub error: Error,
}

/// Outcome of [`run_scenarios`]
#[derive(Debug, Default)]
pub struct RunReport {
    pub saved: Vec<SavedFile>,
    pub failure: Option<ScenarioFailure>,
    /// Scenarios never attempted because an earlier one failed
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// `0` when every scenario succeeded, `1` otherwise
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn into_result(self) -> Result<Vec<SavedFile>> {
        match self.failure {
            Some(f) => Err(f.error),
            None => Ok(self.saved),
        }
    }
}

/// Run `scenarios` in order, stopping at the first failure.
///
/// Progress lines (`Requesting: ...`, `Saved to: ...`) go to `out`.
pub fn run_scenarios<W: Write>(
    client: &ShotClient,
    output: &OutputDir,
    scenarios: &[Scenario],
    out: &mut W,
) -> RunReport {
    let mut report = RunReport::default();

    for (i, scenario) in scenarios.iter().enumerate() {
        info!("Scenario {}/{}: {}", i + 1, scenarios.len(), scenario.name);
        match run_one(client, output, scenario, out) {
            Ok(saved) => report.saved.push(saved),
            Err(e) => {
                error!("Scenario '{}' failed: {}", scenario.name, e);
                report.skipped = scenarios[i + 1..].iter().map(|s| s.name.clone()).collect();
                if !report.skipped.is_empty() {
                    warn!("Skipping {} remaining scenario(s)", report.skipped.len());
                }
                report.failure = Some(ScenarioFailure {
                    scenario: scenario.name.clone(),
                    error: e,
                });
                break;
            }
        }
    }
    report
}

fn run_one<W: Write>(
    client: &ShotClient,
    output: &OutputDir,
    scenario: &Scenario,
    out: &mut W,
) -> Result<SavedFile> {
    let url = client.prepare(&scenario.options)?;
    writeln!(out, "Requesting: {}", url)?;

    let result = client.fetch(&url)?;
    if let Some(ct) = result.content_type() {
        writeln!(out, "Received {} bytes ({})", result.len(), ct)?;
    }

    let saved = output.save(&scenario.filename, &result.bytes)?;
    writeln!(out, "Saved to: {}", saved.path.display())?;
    Ok(saved)
}
