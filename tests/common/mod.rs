#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};

use parrilla_bot::config::AppConfig;
use parrilla_bot::error::{DeliveryError, TransportError};
use parrilla_bot::page_fetch::PageFetcher;
use parrilla_bot::telegram::{MessageSink, ParseMode};

pub const SOURCE_URL: &str = "https://parrilla.example/futbol";

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn config(extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("PARRILLA_SOURCE_URL".into(), SOURCE_URL.into());
    vars.insert("PARRILLA_PART_PAUSE_MS".into(), "0".into());
    vars.insert("PARRILLA_SCOPE_PAUSE_MS".into(), "0".into());
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    AppConfig::from_vars(|k| vars.get(k).cloned()).expect("test config should be valid")
}

pub fn bogota(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(5 * 3600)
        .expect("valid offset")
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid local time")
}

/// Serves the same body on every call, except for the 1-based call numbers
/// listed in `fail_on`, which answer 503.
pub struct ScriptedFetcher {
    body: String,
    fail_on: Vec<usize>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedFetcher {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            fail_on: Vec::new(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.fail_on = calls.to_vec();
        self
    }

    /// Shared call counter, still readable after the fetcher is boxed.
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if self.fail_on.contains(&n) {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        Ok(self.body.clone())
    }

    fn probe(&self, url: &str) -> Result<u16, TransportError> {
        if self.fail_on.is_empty() {
            Ok(200)
        } else {
            Err(TransportError::Timeout {
                url: url.to_string(),
            })
        }
    }
}

/// Records every send; answers with scripted results, then Ok.
pub struct RecordingSink {
    pub sent: RefCell<Vec<(String, String, ParseMode)>>,
    script: RefCell<Vec<Result<(), DeliveryError>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            script: RefCell::new(Vec::new()),
        }
    }

    pub fn with_script(script: Vec<Result<(), DeliveryError>>) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            script: RefCell::new(script),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(_, t, _)| t.clone()).collect()
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, destination: &str, text: &str, mode: ParseMode) -> Result<(), DeliveryError> {
        self.sent
            .borrow_mut()
            .push((destination.to_string(), text.to_string(), mode));
        let mut script = self.script.borrow_mut();
        if script.is_empty() {
            return Ok(());
        }
        script.remove(0)
    }
}

/// One-shot HTTP server on localhost. Waits `delay` after reading the request,
/// then writes `response` verbatim. The handle yields the raw request.
pub fn serve_once(response: String, delay: Duration) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind localhost");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return String::new();
        };
        let request = read_request(&mut stream);
        thread::sleep(delay);
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
        request
    });
    (format!("http://{addr}"), handle)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let Ok(n) = stream.read(&mut chunk) else {
            break;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..head_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}
