//! Test helper utilities

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use ripcord::discord::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use serde_json::json;

/// Transport that replays a fixed list of responses and records requests.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<Vec<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new(mut responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        responses.reverse();
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "[]")))
    }
}

/// One wire message; `hour` sets the timestamp on 2024-03-01.
pub fn message(id: u64, hour: u32, username: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id.to_string(),
        "channel_id": "500",
        "content": content,
        "timestamp": format!("2024-03-01T{:02}:00:00.000000+00:00", hour),
        "author": {"id": format!("u-{}", username), "username": username, "bot": false},
        "type": 0
    })
}

pub fn page(messages: Vec<serde_json::Value>) -> HttpResponse {
    HttpResponse::new(200, serde_json::Value::Array(messages).to_string())
}

/// Minimal HTTP/1.1 server answering each connection with the next scripted
/// `(status, body)` pair, then `200 []` once the script is exhausted.
pub struct MockServer {
    pub base_url: String,
    request_lines: Arc<Mutex<Vec<String>>>,
    _handle: JoinHandle<()>,
}

impl MockServer {
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().unwrap();
        let request_lines = Arc::new(Mutex::new(Vec::new()));
        let lines = Arc::clone(&request_lines);
        let expected = responses.len() + 1;

        let handle = thread::spawn(move || {
            let mut script = responses.into_iter();
            for stream in listener.incoming().take(expected) {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    break;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }
                lines.lock().unwrap().push(request_line.trim().to_string());

                let (status, body) = script.next().unwrap_or((200, "[]".to_string()));
                let reason = match status {
                    200 => "OK",
                    429 => "Too Many Requests",
                    401 => "Unauthorized",
                    _ => "Status",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{}/api/v10", addr),
            request_lines,
            _handle: handle,
        }
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

/// ripcord binary with a clean environment rooted at `home`.
pub fn ripcord(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ripcord"));
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("DISCORD_TOKEN")
        .env_remove("DISCORD_AUTH_TOKEN")
        .env_remove("RIPCORD_LOG");
    for proxy in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    cmd
}
