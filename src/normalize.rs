use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::SkipReason;
use crate::extract::RawFieldRow;
use crate::fixture::MatchRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSkip {
    /// Position of the row in the extractor output.
    pub index: usize,
    pub teams: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub records: Vec<MatchRecord>,
    pub skipped: Vec<RowSkip>,
}

impl NormalizeReport {
    pub fn skipped_empty(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::EmptyField(_)))
            .count()
    }

    pub fn skipped_duplicates(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::Duplicate)
            .count()
    }
}

pub fn validate_row(row: &RawFieldRow) -> Result<MatchRecord, SkipReason> {
    MatchRecord::new(
        &row.teams,
        &row.league,
        &row.time,
        &row.channel,
        row.date.clone(),
    )
}

/// Validates every row on its own; a bad row only drops itself. A row whose
/// (teams, time) pair was already accepted is dropped as a duplicate, since
/// a day split across several blocks on the page can repeat fixtures.
pub fn normalize(rows: &[RawFieldRow]) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let outcome = validate_row(row).and_then(|record| {
            let key = (record.teams().to_lowercase(), record.time().to_lowercase());
            if seen.insert(key) {
                Ok(record)
            } else {
                Err(SkipReason::Duplicate)
            }
        });
        match outcome {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                debug!(row = index, teams = %row.teams, %reason, "row skipped");
                report.skipped.push(RowSkip {
                    index,
                    teams: row.teams.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        accepted = report.records.len(),
        empty = report.skipped_empty(),
        duplicates = report.skipped_duplicates(),
        "rows normalized"
    );
    report
}
