//! Query a running ShotAPI service for its health and endpoint listing.
//!
//! cargo run --example service_status -- http://localhost:3000

use shotapi_client::{ClientConfig, ShotClient, DEFAULT_API_URL};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let api_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let client = ShotClient::new(ClientConfig {
        api_url,
        timeout_ms: Some(5_000),
        ..Default::default()
    })?;

    match client.health() {
        Ok(h) => println!("health: {}", h.status),
        Err(e) => {
            eprintln!("service unavailable: {}", e);
            return Ok(());
        }
    }

    let info = client.info()?;
    println!("{} {}", info.name, info.version);
    for ep in info.endpoints {
        println!("  {} {} - {}", ep.method, ep.path, ep.description);
    }
    Ok(())
}
