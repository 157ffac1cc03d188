use scraper::{ElementRef, Html};
use tracing::debug;

use crate::date_label::DateLabel;
use crate::error::ExtractError;
use crate::extract::{ExtractionStrategy, RawFieldRow, element_text, selector};

const MIN_CELLS: usize = 4;

/// Pages that list each day as a `<table>` whose first row is the date
/// caption and whose remaining rows are teams | league | time | channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularStrategy;

impl ExtractionStrategy for TabularStrategy {
    fn name(&self) -> &'static str {
        "tabular"
    }

    fn extract(
        &self,
        document: &str,
        target: &DateLabel,
        _page_day: &DateLabel,
    ) -> Result<Vec<RawFieldRow>, ExtractError> {
        let html = Html::parse_document(document);
        let table_sel = selector("table")?;
        let row_sel = selector("tr")?;
        let cell_sel = selector("td")?;

        let mut tables = 0usize;
        let mut matched = 0usize;
        let mut out = Vec::new();
        for (idx, table) in html.select(&table_sel).enumerate() {
            tables += 1;
            let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
            let Some((header, data)) = rows.split_first() else {
                continue;
            };
            let caption = element_text(header).to_lowercase();
            if caption.is_empty() || !caption_matches(&caption, target) {
                continue;
            }
            matched += 1;
            debug!(table = idx + 1, caption = %caption, "date block matched");

            for row in data {
                let cells: Vec<String> = row.select(&cell_sel).map(|c| element_text(&c)).collect();
                if cells.len() < MIN_CELLS {
                    continue;
                }
                out.push(RawFieldRow {
                    teams: cells[0].clone(),
                    league: cells[1].clone(),
                    time: cells[2].clone(),
                    channel: cells[3].clone(),
                    date: Some(target.to_string()),
                });
            }
        }

        if tables == 0 {
            return Err(ExtractError::StructuralMismatch {
                expected: "at least one <table> date block",
            });
        }
        debug!(tables, matched, rows = out.len(), "tabular extraction done");
        Ok(out)
    }
}

/// Caption match: the whole label ("10 de mayo") not glued to a preceding
/// digit or, failing that, the day as a standalone number plus the month
/// name anywhere in the caption ("mayo 10", "sábado 10 - mayo").
pub fn caption_matches(caption: &str, target: &DateLabel) -> bool {
    let caption = caption.to_lowercase();
    let label = target.to_string();
    let whole_label = caption.match_indices(&label).any(|(at, _)| {
        !caption[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit())
    });
    if whole_label {
        return true;
    }
    let day = target.day();
    let has_day = caption
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .any(|s| s.parse::<u32>().ok() == Some(day));
    has_day && caption.contains(target.month_name())
}
