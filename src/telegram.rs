use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DeliveryConfig;
use crate::error::DeliveryError;
use crate::fixture::Scope;
use crate::format::{LengthPolicy, split_message};
use crate::http_client::build_http_client;
use crate::pipeline::Pipeline;

const SEND_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    Plain,
}

/// Somewhere rendered text can be posted.
pub trait MessageSink {
    fn send(&self, destination: &str, text: &str, mode: ParseMode) -> Result<(), DeliveryError>;
}

pub struct TelegramBot {
    client: Client,
    api_base: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(cfg: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let client = build_http_client(Duration::from_secs(SEND_TIMEOUT_SECS), "parrilla_bot")?;
        Ok(Self {
            client,
            api_base: cfg.api_base.clone(),
            token: cfg.bot_token.clone(),
        })
    }
}

impl MessageSink for TelegramBot {
    fn send(&self, destination: &str, text: &str, mode: ParseMode) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = SendMessageBody {
            chat_id: destination,
            text,
            parse_mode: match mode {
                ParseMode::Markdown => Some("Markdown"),
                ParseMode::Plain => None,
            },
            disable_web_page_preview: true,
        };
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(DeliveryError::Transport)?;
        let status = resp.status().as_u16();
        let raw = resp.text().map_err(DeliveryError::Transport)?;
        let parsed: ApiResponse = serde_json::from_str(raw.trim())
            .map_err(|err| DeliveryError::Decode(format!("http {status}: {err}")))?;
        if parsed.ok {
            return Ok(());
        }
        Err(DeliveryError::Rejected {
            code: parsed.error_code.unwrap_or(status),
            description: parsed.description.unwrap_or_default(),
        })
    }
}

/// Sends `text` to `destination` under `policy`, in order, pausing between
/// parts. A part Telegram cannot parse as Markdown is resent once as plain
/// text; a part it reports as too long is split in half and resent.
pub fn deliver(
    sink: &dyn MessageSink,
    destination: &str,
    text: &str,
    policy: &LengthPolicy,
    pause: Duration,
) -> Result<usize, DeliveryError> {
    let parts = policy.apply(text);
    let total = parts.len();
    let mut sent = 0usize;
    for (idx, part) in parts.iter().enumerate() {
        sent += send_part(sink, destination, part, policy.limit)?;
        if idx + 1 < total && !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    info!(destination, messages = sent, "delivered");
    Ok(sent)
}

fn send_part(
    sink: &dyn MessageSink,
    destination: &str,
    part: &str,
    limit: usize,
) -> Result<usize, DeliveryError> {
    match send_markdown_or_plain(sink, destination, part) {
        Ok(()) => Ok(1),
        Err(err) if err.is_too_long() && limit / 2 >= 200 => {
            warn!(destination, error = %err, "message too long, splitting again");
            let mut sent = 0usize;
            for piece in split_message(part, limit / 2) {
                send_markdown_or_plain(sink, destination, &piece)?;
                sent += 1;
            }
            Ok(sent)
        }
        Err(err) => Err(err),
    }
}

fn send_markdown_or_plain(
    sink: &dyn MessageSink,
    destination: &str,
    text: &str,
) -> Result<(), DeliveryError> {
    match sink.send(destination, text, ParseMode::Markdown) {
        Err(err) if err.is_markdown_rejection() => {
            warn!(destination, error = %err, "markdown rejected, resending as plain text");
            sink.send(destination, text, ParseMode::Plain)
        }
        other => other,
    }
}

#[derive(Debug)]
pub struct ScopeDelivery {
    pub scope: Scope,
    pub result: Result<usize, DeliveryError>,
}

/// Renders and sends each scope in the given order, pausing between scopes.
/// A failed scope is reported and the rest still go out.
pub fn deliver_scopes(
    pipeline: &Pipeline,
    sink: &dyn MessageSink,
    destination: &str,
    scopes: &[Scope],
) -> Vec<ScopeDelivery> {
    let cfg = pipeline.config();
    let mut out = Vec::with_capacity(scopes.len());
    for (idx, scope) in scopes.iter().enumerate() {
        info!(%scope, destination, "sending fixtures");
        let text = pipeline.run(*scope);
        let result = deliver(sink, destination, &text, &cfg.length, cfg.part_pause);
        if let Err(err) = &result {
            warn!(%scope, error = %err, "delivery failed");
        }
        out.push(ScopeDelivery {
            scope: *scope,
            result,
        });
        if idx + 1 < scopes.len() && !cfg.scope_pause.is_zero() {
            thread::sleep(cfg.scope_pause);
        }
    }
    out
}
