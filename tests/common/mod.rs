//! Mock screenshot service shared by the integration tests

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Response, Server};

pub type MockResponse = Response<Cursor<Vec<u8>>>;

/// A request as the mock server saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query pairs, in order
    pub fn query(&self) -> Vec<(String, String)> {
        let full = format!("http://mock{}", self.url);
        url::Url::parse(&full)
            .expect("recorded url")
            .query_pairs()
            .into_owned()
            .collect()
    }
}

pub struct MockServer {
    pub base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a server on an ephemeral port. `respond` gets the zero-based
/// request index and the recorded request.
pub fn start<F>(respond: F) -> MockServer
where
    F: Fn(usize, &Recorded) -> MockResponse + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);

    std::thread::spawn(move || {
        for (i, request) in server.incoming_requests().enumerate() {
            let recorded = Recorded {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
            };
            let response = respond(i, &recorded);
            log.lock().unwrap().push(recorded);
            let _ = request.respond(response);
        }
    });

    MockServer {
        base: format!("http://{}", addr),
        requests,
    }
}

pub fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap()
}

/// 200 with a payload whose type follows the `format` query parameter
pub fn capture_ok(req: &Recorded) -> MockResponse {
    let format = req
        .query()
        .into_iter()
        .find(|(k, _)| k == "format")
        .map(|(_, v)| v)
        .unwrap_or_else(|| "png".to_string());
    let (content_type, body): (&str, &[u8]) = match format.as_str() {
        "jpeg" | "jpg" => ("image/jpeg", b"\xFF\xD8\xFF\xE0fake-jpeg"),
        "pdf" => ("application/pdf", b"%PDF-1.4 fake"),
        _ => ("image/png", b"\x89PNG\r\n\x1a\nfake-png"),
    };
    Response::from_data(body.to_vec())
        .with_header(header("Content-Type", content_type))
        .with_header(header("X-Cache", "MISS"))
}

/// JSON error envelope the service uses for failures
pub fn api_error(status: u16, message: &str) -> MockResponse {
    let body = serde_json::json!({ "error": { "message": message, "status": status } });
    Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header("Content-Type", "application/json"))
}
