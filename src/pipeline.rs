use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::date_label::{DateLabel, localize, now_in};
use crate::error::TransportError;
use crate::extract::ExtractionStrategy;
use crate::fixture::{FixtureQuery, MatchRecord, QuerySpan, Scope, WEEK_DAYS};
use crate::format::{WeekDay, format_day, format_status, format_transport_error, format_week};
use crate::normalize::{RowSkip, normalize};
use crate::page_fetch::PageFetcher;

/// Fixtures collected for one date.
#[derive(Debug, Clone)]
pub struct DayFixtures {
    pub date: NaiveDate,
    pub label: DateLabel,
    pub records: Vec<MatchRecord>,
    pub skipped: Vec<RowSkip>,
}

/// Everything a run needs, built once at startup and only read afterwards.
pub struct Pipeline {
    config: AppConfig,
    fetcher: Box<dyn PageFetcher>,
    strategy: Box<dyn ExtractionStrategy + Send + Sync>,
}

impl Pipeline {
    pub fn new(config: AppConfig, fetcher: Box<dyn PageFetcher>) -> Self {
        let strategy = config.source_kind.strategy();
        Self {
            config,
            fetcher,
            strategy,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        now_in(self.config.utc_offset)
    }

    /// Fetch, extract and validate fixtures for `date`, reading undated
    /// entries as belonging to `today`. Markup the strategy does not
    /// recognize counts as an empty day; only transport failures are
    /// returned as errors.
    pub fn collect_day(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<DayFixtures, TransportError> {
        let label = localize(date);
        info!(%label, source = %self.config.source_url, strategy = self.strategy.name(), "collecting fixtures");

        let document = self.fetcher.fetch(&self.config.source_url)?;
        let rows = match self.strategy.extract(&document, &label, &localize(today)) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(%label, error = %err, "page structure not recognized, treating as no matches");
                Vec::new()
            }
        };
        let report = normalize(&rows);
        info!(%label, matches = report.records.len(), skipped = report.skipped.len(), "day collected");
        Ok(DayFixtures {
            date,
            label,
            records: report.records,
            skipped: report.skipped,
        })
    }

    /// Seven consecutive days from `today`. A day that fails is logged and
    /// left empty; only when every day fails is the last error returned.
    pub fn collect_week(&self, today: NaiveDate) -> Result<Vec<WeekDay>, TransportError> {
        let mut days = Vec::with_capacity(WEEK_DAYS as usize);
        let mut failed = 0u32;
        let mut last_err = None;
        for offset in 0..WEEK_DAYS {
            let date = today + ChronoDuration::days(i64::from(offset));
            let records = match self.collect_day(date, today) {
                Ok(day) => day.records,
                Err(err) => {
                    warn!(%date, error = %err, "day failed, counting it as no matches");
                    failed += 1;
                    last_err = Some(err);
                    Vec::new()
                }
            };
            days.push(WeekDay {
                offset,
                date,
                records,
            });
        }
        match last_err {
            Some(err) if failed == WEEK_DAYS => Err(err),
            _ => Ok(days),
        }
    }

    pub fn run(&self, scope: Scope) -> String {
        self.run_at(scope, self.now())
    }

    /// Renders `scope` as seen at `now`. Always yields text: the fixture
    /// list, a "no matches" message or a connection-problem message.
    pub fn run_at(&self, scope: Scope, now: DateTime<FixedOffset>) -> String {
        let FixtureQuery { date, span } = scope.query(now.date_naive());
        match span {
            QuerySpan::SevenDays => match self.collect_week(date) {
                Ok(days) => format_week(&days, &now),
                Err(err) => {
                    warn!(%scope, error = %err, "every day of the week failed");
                    format_transport_error()
                }
            },
            QuerySpan::SingleDay => match self.collect_day(date, now.date_naive()) {
                Ok(day) => {
                    let title = title_for(scope, &day.label);
                    format_day(&day.records, &day.label, title.as_deref(), &now)
                }
                Err(err) => {
                    warn!(%scope, error = %err, "could not reach the source");
                    format_transport_error()
                }
            },
        }
    }

    pub fn status_report(&self) -> String {
        let now = self.now();
        let probe = self
            .fetcher
            .probe(&self.config.source_url)
            .map_err(|err| err.to_string());
        format_status(probe, &now)
    }
}

fn title_for(scope: Scope, label: &DateLabel) -> Option<String> {
    match scope {
        Scope::Today => Some(format!("📺 *Partidos de Hoy ({label})*")),
        Scope::Tomorrow => Some(format!("📺 *Partidos de Mañana ({label})*")),
        Scope::Week | Scope::On(_) => None,
    }
}
