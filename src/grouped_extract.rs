use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::date_label::{DateLabel, parse_month_word};
use crate::error::ExtractError;
use crate::extract::{ExtractionStrategy, RawFieldRow, element_text, normalize_ws, selector};
use crate::fixture::UNCONFIRMED;

pub(crate) const GROUP_SELECTOR: &str = ".scf-league-group";
pub(crate) const ENTRY_SELECTOR: &str = ".scf-match-list li a.scf-match-item";
const LEAGUE_SELECTOR: &str = "h2";
const HOME_SELECTOR: &str = ".team-row.home .team-name";
const AWAY_SELECTOR: &str = ".team-row.away .team-name";
const CHANNEL_IMG_SELECTOR: &str = ".scf-match-canal img";

const FALLBACK_LEAGUE: &str = "Fútbol";
const SEPARATOR: &str = "vs";

/// Pages that group matches under league headings, one link per match:
///
/// ```text
/// .scf-league-group
///   h2                          league name
///   .scf-match-list li a.scf-match-item
///     "No iniciado 5 Feb 2026, 20:00 Millonarios VS Pereira"
///     .team-row.home .team-name / .team-row.away .team-name
///     .scf-match-canal img[alt]  channel
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupedListStrategy;

struct GroupSelectors {
    group: Selector,
    league: Selector,
    entry: Selector,
    home: Selector,
    away: Selector,
    channel_img: Selector,
}

impl GroupSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            group: selector(GROUP_SELECTOR)?,
            league: selector(LEAGUE_SELECTOR)?,
            entry: selector(ENTRY_SELECTOR)?,
            home: selector(HOME_SELECTOR)?,
            away: selector(AWAY_SELECTOR)?,
            channel_img: selector(CHANNEL_IMG_SELECTOR)?,
        })
    }
}

impl ExtractionStrategy for GroupedListStrategy {
    fn name(&self) -> &'static str {
        "grouped-list"
    }

    fn extract(
        &self,
        document: &str,
        target: &DateLabel,
        page_day: &DateLabel,
    ) -> Result<Vec<RawFieldRow>, ExtractError> {
        let html = Html::parse_document(document);
        let sel = GroupSelectors::new()?;

        let mut groups = 0usize;
        let mut other_day = 0usize;
        let mut out = Vec::new();
        for group in html.select(&sel.group) {
            groups += 1;
            let league = group
                .select(&sel.league)
                .next()
                .map(|h| element_text(&h))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| FALLBACK_LEAGUE.to_string());

            for entry in group.select(&sel.entry) {
                let text = element_text(&entry);
                if !has_separator(&text) {
                    continue;
                }
                let date = match entry_date(&text) {
                    Some((day, month)) if day != target.day() || month != target.month() => {
                        other_day += 1;
                        continue;
                    }
                    Some(_) => Some(target.to_string()),
                    // Undated entries belong to the day the page lists.
                    None if target != page_day => {
                        other_day += 1;
                        continue;
                    }
                    None => None,
                };
                out.push(read_entry(&entry, &sel, &league, &text, date));
            }
        }

        if groups == 0 {
            return Err(ExtractError::StructuralMismatch {
                expected: "league groups (.scf-league-group)",
            });
        }
        debug!(groups, other_day, rows = out.len(), "grouped extraction done");
        Ok(out)
    }
}

fn read_entry(
    entry: &ElementRef<'_>,
    sel: &GroupSelectors,
    league: &str,
    text: &str,
    date: Option<String>,
) -> RawFieldRow {
    let team = |s: &Selector| {
        entry
            .select(s)
            .next()
            .map(|el| element_text(&el))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNCONFIRMED.to_string())
    };
    let home = team(&sel.home);
    let away = team(&sel.away);

    let channel = entry
        .select(&sel.channel_img)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .map(normalize_ws)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNCONFIRMED.to_string());

    RawFieldRow {
        teams: format!("{home} VS {away}"),
        league: league.to_string(),
        time: find_time_token(text).unwrap_or_else(|| UNCONFIRMED.to_string()),
        channel,
        date,
    }
}

fn has_separator(text: &str) -> bool {
    text.split_whitespace()
        .any(|tok| trim_punct(tok).eq_ignore_ascii_case(SEPARATOR))
}

fn trim_punct(tok: &str) -> &str {
    tok.trim_matches(|c: char| !c.is_alphanumeric())
}

/// First `H:MM` / `HH:MM` token, with surrounding punctuation and an
/// hour suffix ("20:00h", "20:00hs") dropped.
pub fn find_time_token(text: &str) -> Option<String> {
    text.split_whitespace().find_map(|tok| {
        let tok = strip_hour_suffix(trim_punct(tok));
        let (h, m) = tok.split_once(':')?;
        let valid = (1..=2).contains(&h.len())
            && m.len() == 2
            && h.chars().all(|c| c.is_ascii_digit())
            && m.chars().all(|c| c.is_ascii_digit());
        valid.then(|| tok.to_string())
    })
}

fn strip_hour_suffix(tok: &str) -> &str {
    for suffix in ["hs", "h"] {
        let Some(at) = tok.len().checked_sub(suffix.len()).filter(|at| *at > 0) else {
            continue;
        };
        if tok.get(at..).is_some_and(|end| end.eq_ignore_ascii_case(suffix)) {
            return &tok[..at];
        }
    }
    tok
}

/// Day and month of a calendar date written in the entry text, e.g.
/// "5 Feb 2026" or "5 de febrero".
pub fn entry_date(text: &str) -> Option<(u32, u32)> {
    let tokens: Vec<&str> = text.split_whitespace().map(trim_punct).collect();
    for (idx, tok) in tokens.iter().enumerate() {
        if tok.is_empty() || tok.len() > 2 || !tok.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let Ok(day) = tok.parse::<u32>() else {
            continue;
        };
        if !(1..=31).contains(&day) {
            continue;
        }
        let mut next = idx + 1;
        if tokens.get(next).is_some_and(|t| t.eq_ignore_ascii_case("de")) {
            next += 1;
        }
        if let Some(month) = tokens.get(next).and_then(|t| parse_month_word(t)) {
            return Some((day, month));
        }
    }
    None
}
