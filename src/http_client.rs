use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::TransportError;

/// Blocking client shared by the page fetcher and the Telegram sender. Every
/// request made through it is bounded by `timeout`.
pub fn build_http_client(timeout: Duration, user_agent: &str) -> Result<Client, TransportError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(TransportError::Client)
}
