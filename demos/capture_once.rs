//! Capture a single page against a local mock service and save it.
//!
//! cargo run --example capture_once

use shotapi_client::{CaptureOptions, ClientConfig, ImageFormat, OutputDir, ShotClient};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Serve one fake PNG so the example runs without a real ShotAPI instance
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(req) = server.recv() {
            let png = b"\x89PNG\r\n\x1a\nexample".to_vec();
            let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"image/png"[..]).unwrap();
            let _ = req.respond(tiny_http::Response::from_data(png).with_header(header));
        }
    });

    let client = ShotClient::new(ClientConfig {
        api_url: format!("http://{}", addr),
        ..Default::default()
    })?;

    let options = CaptureOptions {
        format: Some(ImageFormat::Png),
        dark_mode: Some(true),
        ..CaptureOptions::new("https://example.com").viewport(1024, 768)
    };
    let url = client.prepare(&options)?;
    println!("Requesting: {}", url);

    let shot = client.fetch(&url)?;
    println!(
        "Got {} bytes, content-type {:?}, cache {:?}",
        shot.len(),
        shot.content_type(),
        shot.cache_status()
    );

    let out = OutputDir::new(std::env::temp_dir().join("shotapi-demo"));
    let saved = out.save(&format!("once.{}", options.extension()), &shot.bytes)?;
    println!("Saved to: {} (sha256 {})", saved.path.display(), saved.sha256);
    Ok(())
}
