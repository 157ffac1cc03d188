use std::time::Duration;

use anyhow::{Context, Result};

use parrilla_bot::config::{AppConfig, DEFAULT_USER_AGENT};
use parrilla_bot::date_label::{localize, today_in};
use parrilla_bot::extract::{ExtractionStrategy, SourceKind, describe_document};
use parrilla_bot::page_fetch::{HttpFetcher, PageFetcher};
use parrilla_bot::tabular_extract::caption_matches;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename("config/.env");

    let sample = std::env::var("DEBUG_PAGE_ROWS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(3)
        .clamp(1, 20);

    // An explicit url wins; otherwise use the configured source.
    let (url, kind, offset, timeout, user_agent) = match std::env::args().nth(1) {
        Some(url) => (
            url,
            None,
            chrono::FixedOffset::west_opt(5 * 3600).context("fixed offset")?,
            Duration::from_secs(15),
            DEFAULT_USER_AGENT.to_string(),
        ),
        None => {
            let cfg = AppConfig::from_env().context("invalid configuration")?;
            (
                cfg.source_url,
                Some(cfg.source_kind),
                cfg.utc_offset,
                cfg.timeout,
                cfg.user_agent,
            )
        }
    };

    let fetcher = HttpFetcher::new(timeout, &user_agent).context("build http client")?;
    let body = fetcher
        .fetch(&url)
        .with_context(|| format!("fetch {url}"))?;
    let outline = describe_document(&body, sample).context("outline document")?;
    let today = localize(today_in(offset));

    println!("URL: {url}");
    println!("Looking for: {today}");
    println!("Tables: {}", outline.tables.len());
    for (idx, table) in outline.tables.iter().enumerate() {
        let mark = if caption_matches(&table.caption, &today) {
            "*"
        } else {
            " "
        };
        println!(
            "{mark} table {}: {} rows, caption {:?}",
            idx + 1,
            table.rows,
            table.caption
        );
        for row in &table.sample_rows {
            println!("     {}", row.join(" | "));
        }
    }
    println!("League groups: {}", outline.groups.len());
    for group in &outline.groups {
        println!("  {} ({} entries)", group.name, group.entries);
    }

    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![SourceKind::Tabular, SourceKind::GroupedList],
    };
    for kind in kinds {
        match kind.strategy().extract(&body, &today, &today) {
            Ok(rows) => println!("{kind:?} strategy: {} candidate rows for {today}", rows.len()),
            Err(err) => println!("{kind:?} strategy: {err}"),
        }
    }

    Ok(())
}
