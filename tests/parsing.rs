mod common;

use chrono::NaiveDate;

use parrilla_bot::date_label::localize;
use parrilla_bot::error::{ExtractError, Field, SkipReason};
use parrilla_bot::extract::{ExtractionStrategy, SourceKind};
use parrilla_bot::fixture::{CategoryTag, UNCONFIRMED};
use parrilla_bot::grouped_extract::GroupedListStrategy;
use parrilla_bot::normalize::normalize;
use parrilla_bot::tabular_extract::TabularStrategy;

use common::read_fixture;

fn label(y: i32, m: u32, d: u32) -> parrilla_bot::date_label::DateLabel {
    localize(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

#[test]
fn tabular_unions_every_block_for_the_date() {
    let raw = read_fixture("futbolred_parrilla.html");
    let rows = TabularStrategy
        .extract(&raw, &label(2025, 5, 10), &label(2025, 5, 10))
        .expect("fixture has tables");
    let teams: Vec<&str> = rows.iter().map(|r| r.teams.as_str()).collect();
    assert_eq!(
        teams,
        [
            "Team A vs Team B",
            "Millonarios vs Nacional",
            "Junior vs Once Caldas",
            "Real Madrid vs Barcelona",
            "Team A vs Team B",
        ]
    );
    assert_eq!(rows[1].league, "Liga BetPlay Dimayor");
    assert_eq!(rows[1].time, "20:30");
    assert_eq!(rows[1].channel, "Win Sports+");
}

#[test]
fn tabular_rows_normalize_to_valid_unique_records() {
    let raw = read_fixture("futbolred_parrilla.html");
    let rows = TabularStrategy
        .extract(&raw, &label(2025, 5, 10), &label(2025, 5, 10))
        .expect("fixture has tables");
    let report = normalize(&rows);

    let teams: Vec<&str> = report.records.iter().map(|r| r.teams()).collect();
    assert_eq!(
        teams,
        [
            "Team A vs Team B",
            "Millonarios vs Nacional",
            "Real Madrid vs Barcelona"
        ]
    );
    assert_eq!(report.records[0].category(), CategoryTag::Colombia);
    assert_eq!(report.records[2].category(), CategoryTag::Spain);
    assert_eq!(report.records[0].date(), Some("10 de mayo"));

    let reasons: Vec<&SkipReason> = report.skipped.iter().map(|s| &s.reason).collect();
    assert_eq!(
        reasons,
        [&SkipReason::EmptyField(Field::Channel), &SkipReason::Duplicate]
    );
}

#[test]
fn tabular_other_days_do_not_leak() {
    let raw = read_fixture("futbolred_parrilla.html");
    let rows = TabularStrategy
        .extract(&raw, &label(2025, 5, 11), &label(2025, 5, 11))
        .expect("fixture has tables");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].teams, "Arsenal vs Liverpool");
}

#[test]
fn tabular_without_matching_date_is_empty_not_an_error() {
    let raw = read_fixture("futbolred_parrilla.html");
    let rows = TabularStrategy
        .extract(&raw, &label(2025, 6, 1), &label(2025, 6, 1))
        .expect("no matching block is not an error");
    assert!(rows.is_empty());
}

#[test]
fn tabular_page_without_tables_is_a_structural_mismatch() {
    let raw = read_fixture("partidos_de_hoy.html");
    let err = TabularStrategy
        .extract(&raw, &label(2026, 2, 5), &label(2026, 2, 5))
        .unwrap_err();
    assert!(matches!(err, ExtractError::StructuralMismatch { .. }));
}

#[test]
fn grouped_reads_leagues_teams_times_and_channels() {
    let raw = read_fixture("partidos_de_hoy.html");
    let rows = GroupedListStrategy
        .extract(&raw, &label(2026, 2, 5), &label(2026, 2, 5))
        .expect("fixture has groups");
    assert_eq!(rows.len(), 4);

    assert_eq!(rows[0].teams, "Millonarios VS Deportivo Pereira");
    assert_eq!(rows[0].league, "Liga BetPlay");
    assert_eq!(rows[0].time, "20:00");
    assert_eq!(rows[0].channel, "Win Sports+");
    assert_eq!(rows[0].date.as_deref(), Some("5 de febrero"));

    // Missing away team, time and channel fall back to the sentinel.
    assert_eq!(rows[1].teams, format!("Deportes Tolima VS {UNCONFIRMED}"));
    assert_eq!(rows[1].time, UNCONFIRMED);
    assert_eq!(rows[1].channel, UNCONFIRMED);

    // Group without a heading, entry without a date.
    assert_eq!(rows[2].league, "Fútbol");
    assert_eq!(rows[2].teams, "Selección A VS Selección B");
    assert_eq!(rows[2].time, "18:30");
    assert_eq!(rows[2].date, None);

    assert_eq!(rows[3].teams, "Arsenal VS Chelsea");
    assert_eq!(rows[3].channel, "ESPN");
}

#[test]
fn grouped_records_keep_sentinels_and_tag_leagues() {
    let raw = read_fixture("partidos_de_hoy.html");
    let rows = GroupedListStrategy
        .extract(&raw, &label(2026, 2, 5), &label(2026, 2, 5))
        .expect("fixture has groups");
    let report = normalize(&rows);
    assert_eq!(report.records.len(), 4);
    assert!(report.skipped.is_empty());
    assert_eq!(report.records[0].category(), CategoryTag::Colombia);
    assert_eq!(report.records[2].category(), CategoryTag::Other);
    assert_eq!(report.records[3].category(), CategoryTag::England);
}

#[test]
fn grouped_skips_entries_dated_for_another_day() {
    let raw = read_fixture("partidos_de_hoy.html");
    let rows = GroupedListStrategy
        .extract(&raw, &label(2026, 2, 6), &label(2026, 2, 5))
        .expect("fixture has groups");
    let teams: Vec<&str> = rows.iter().map(|r| r.teams.as_str()).collect();
    assert_eq!(teams, ["Atlético Nacional VS Junior"]);
}

#[test]
fn grouped_undated_entries_follow_the_page_day() {
    let raw = read_fixture("partidos_de_hoy.html");
    let rows = GroupedListStrategy
        .extract(&raw, &label(2026, 2, 6), &label(2026, 2, 6))
        .expect("fixture has groups");
    let teams: Vec<&str> = rows.iter().map(|r| r.teams.as_str()).collect();
    assert_eq!(
        teams,
        ["Atlético Nacional VS Junior", "Selección A VS Selección B"]
    );
}

#[test]
fn grouped_page_without_groups_is_a_structural_mismatch() {
    let raw = read_fixture("futbolred_parrilla.html");
    let err = SourceKind::GroupedList
        .strategy()
        .extract(&raw, &label(2025, 5, 10), &label(2025, 5, 10))
        .unwrap_err();
    assert!(matches!(err, ExtractError::StructuralMismatch { .. }));
}
