use chrono::{FixedOffset, NaiveDate, TimeZone};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use parrilla_bot::date_label::{DateLabel, localize};
use parrilla_bot::extract::{ExtractionStrategy, RawFieldRow};
use parrilla_bot::fixture::MatchRecord;
use parrilla_bot::format::{format_day, split_message};
use parrilla_bot::grouped_extract::GroupedListStrategy;
use parrilla_bot::normalize::normalize;
use parrilla_bot::tabular_extract::TabularStrategy;

fn label(y: i32, m: u32, d: u32) -> DateLabel {
    localize(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

fn bench_tabular_extract(c: &mut Criterion) {
    let target = label(2025, 5, 10);
    c.bench_function("tabular_extract", |b| {
        b.iter(|| {
            let rows = TabularStrategy
                .extract(black_box(TABULAR_HTML), &target, &target)
                .unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_grouped_extract(c: &mut Criterion) {
    let target = label(2026, 2, 5);
    c.bench_function("grouped_extract", |b| {
        b.iter(|| {
            let rows = GroupedListStrategy
                .extract(black_box(GROUPED_HTML), &target, &target)
                .unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let rows: Vec<RawFieldRow> = (0..500)
        .map(|i| RawFieldRow {
            teams: format!("Equipo {} vs Rival {}", i % 400, i % 400),
            league: "Liga BetPlay".to_string(),
            time: "19:00".to_string(),
            channel: if i % 17 == 0 { String::new() } else { "Win Sports+".to_string() },
            date: None,
        })
        .collect();
    c.bench_function("normalize_500_rows", |b| {
        b.iter(|| {
            let report = normalize(black_box(&rows));
            black_box(report.records.len());
        })
    });
}

fn bench_format_and_split(c: &mut Criterion) {
    let records: Vec<MatchRecord> = (0..300)
        .map(|i| {
            MatchRecord::new(
                &format!("Equipo {i} vs Rival {i}"),
                "Premier League",
                "14:30",
                "ESPN",
                None,
            )
            .unwrap()
        })
        .collect();
    let target = label(2025, 5, 10);
    let now = FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 5, 10, 8, 0, 0)
        .unwrap();
    c.bench_function("format_and_split_300", |b| {
        b.iter(|| {
            let text = format_day(black_box(&records), &target, None, &now);
            let parts = split_message(&text, 4000);
            black_box(parts.len());
        })
    });
}

criterion_group!(
    perf,
    bench_tabular_extract,
    bench_grouped_extract,
    bench_normalize,
    bench_format_and_split
);
criterion_main!(perf);

static TABULAR_HTML: &str = include_str!("../tests/fixtures/futbolred_parrilla.html");
static GROUPED_HTML: &str = include_str!("../tests/fixtures/partidos_de_hoy.html");
