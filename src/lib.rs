pub mod config;
pub mod date_label;
pub mod error;
pub mod extract;
pub mod fixture;
pub mod format;
pub mod grouped_extract;
pub mod http_client;
pub mod normalize;
pub mod page_fetch;
pub mod pipeline;
pub mod tabular_extract;
pub mod telegram;
