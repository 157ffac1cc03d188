use scraper::{ElementRef, Html, Selector};

use crate::date_label::DateLabel;
use crate::error::ExtractError;
use crate::grouped_extract::GroupedListStrategy;
use crate::tabular_extract::TabularStrategy;

/// Candidate match as read from the page, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldRow {
    pub teams: String,
    pub league: String,
    pub time: String,
    pub channel: String,
    pub date: Option<String>,
}

/// One way of reading fixtures out of a source document.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;

    /// Rows for `target`. `page_day` is the day the page itself lists when
    /// an entry carries no date of its own. An empty vector means "nothing
    /// scheduled"; an error means the page did not look like anything this
    /// strategy understands.
    fn extract(
        &self,
        document: &str,
        target: &DateLabel,
        page_day: &DateLabel,
    ) -> Result<Vec<RawFieldRow>, ExtractError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Tabular,
    GroupedList,
}

impl SourceKind {
    pub fn strategy(self) -> Box<dyn ExtractionStrategy + Send + Sync> {
        match self {
            SourceKind::Tabular => Box::new(TabularStrategy),
            SourceKind::GroupedList => Box::new(GroupedListStrategy),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tabular" | "table" | "tables" => Some(SourceKind::Tabular),
            "grouped" | "grouped-list" | "groups" => Some(SourceKind::GroupedList),
            _ => None,
        }
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|err| ExtractError::Selector(format!("{css}: {err}")))
}

/// Text content with every run of whitespace collapsed to one space.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shape of a fetched page, for diagnosing markup drift.
#[derive(Debug, Clone, Default)]
pub struct DocumentOutline {
    pub tables: Vec<TableOutline>,
    pub groups: Vec<GroupOutline>,
}

#[derive(Debug, Clone)]
pub struct TableOutline {
    pub caption: String,
    pub rows: usize,
    pub sample_rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct GroupOutline {
    pub name: String,
    pub entries: usize,
}

pub fn describe_document(document: &str, sample: usize) -> Result<DocumentOutline, ExtractError> {
    let html = Html::parse_document(document);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td, th")?;
    let group_sel = selector(crate::grouped_extract::GROUP_SELECTOR)?;
    let group_name_sel = selector("h2")?;
    let entry_sel = selector(crate::grouped_extract::ENTRY_SELECTOR)?;

    let mut outline = DocumentOutline::default();
    for table in html.select(&table_sel) {
        let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
        let caption = rows.first().map(element_text).unwrap_or_default();
        let sample_rows = rows
            .iter()
            .skip(1)
            .take(sample)
            .map(|row| row.select(&cell_sel).map(|c| element_text(&c)).collect())
            .collect();
        outline.tables.push(TableOutline {
            caption,
            rows: rows.len(),
            sample_rows,
        });
    }
    for group in html.select(&group_sel) {
        let name = group
            .select(&group_name_sel)
            .next()
            .map(|h| element_text(&h))
            .unwrap_or_default();
        outline.groups.push(GroupOutline {
            name,
            entries: group.select(&entry_sel).count(),
        });
    }
    Ok(outline)
}
