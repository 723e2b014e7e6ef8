use clap::{Parser, Subcommand};
use shotapi_client::scenarios::DEFAULT_TARGET;
use shotapi_client::{
    default_output_dir, demo_scenarios, run_scenarios, CaptureOptions, ClientConfig, Error,
    OutputDir, Result, ShotClient, DEFAULT_API_URL,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Example client for the ShotAPI screenshot service
#[derive(Parser, Debug)]
#[command(name = "shotapi", version, about)]
struct Cli {
    /// Service base URL
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Where captures are written (default: `output/` next to the binary)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// API key sent as `x-api-key`
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Page the demo captures target
    #[arg(long, global = true, default_value = DEFAULT_TARGET)]
    target: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the five demo captures (the default)
    Run,
    /// Capture once with explicit parameters
    Capture {
        /// File name inside the output directory
        filename: String,
        /// Capture parameters, e.g. `url=https://example.com width=800`
        #[arg(value_name = "KEY=VALUE", required = true)]
        params: Vec<String>,
    },
    /// Check `GET /health`
    Health,
    /// Show the service description from `GET /`
    Info,
    /// Clear the server-side screenshot cache (needs --api-key)
    ClearCache,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn parse_params(params: &[String]) -> Result<CaptureOptions> {
    let mut options = CaptureOptions::default();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("expected KEY=VALUE, got '{}'", param)))?;
        options.set(key, value)?;
    }
    Ok(options)
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let client = ShotClient::new(ClientConfig {
        api_url: cli.api_url,
        api_key: cli.api_key,
        timeout_ms: cli.timeout_ms,
        ..Default::default()
    })?;
    let output = OutputDir::new(cli.output_dir.unwrap_or_else(default_output_dir));

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let scenarios = demo_scenarios(&cli.target);
            run_scenarios(&client, &output, &scenarios, out).into_result()?;
            writeln!(out, "All examples completed successfully!")?;
        }
        Command::Capture { filename, params } => {
            let options = parse_params(&params)?;
            let url = client.prepare(&options)?;
            writeln!(out, "Requesting: {}", url)?;
            let result = client.fetch(&url)?;
            let saved = output.save(&filename, &result.bytes)?;
            writeln!(
                out,
                "Saved to: {} ({} bytes, sha256 {})",
                saved.path.display(),
                saved.bytes_written,
                saved.sha256
            )?;
        }
        Command::Health => {
            let health = client.health()?;
            writeln!(out, "status: {}", health.status)?;
            if !health.is_ok() {
                return Err(Error::Decode(format!(
                    "service reported status '{}'",
                    health.status
                )));
            }
        }
        Command::Info => {
            let info = client.info()?;
            writeln!(out, "{} {}", info.name, info.version)?;
            if let Some(desc) = &info.description {
                writeln!(out, "{}", desc)?;
            }
            for ep in &info.endpoints {
                writeln!(out, "  {:<6} {:<12} {}", ep.method, ep.path, ep.description)?;
            }
        }
        Command::ClearCache => {
            let message = client.clear_cache()?;
            writeln!(out, "{}", message)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(out, "Error: {}", e);
            ExitCode::from(1)
        }
    }
}
