use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::date_label::{DateLabel, day_heading, localize};
use crate::fixture::MatchRecord;

pub const NO_MATCHES_DAY: &str = "❌ No se encontraron partidos para esta fecha.";
pub const NO_MATCHES_WEEK: &str = "❌ No se encontraron partidos para esta semana.";
pub const WEEK_TITLE: &str = "📅 *Partidos de la Semana*";
pub const TRUNCATED_MARKER: &str = "\n\n... (lista truncada)";

/// Platform ceiling for a single Telegram message.
pub const PLATFORM_LIMIT: usize = 4096;
pub const DEFAULT_LIMIT: usize = 4000;

/// Escapes the characters legacy Telegram Markdown treats as markup, so
/// scraped names such as "Deportes_Tolima" do not break a message.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Text placed inside a `*bold*` entity. Legacy Markdown has no escapes
/// inside an entity, so markup characters are dropped or spaced out.
pub fn bold_text(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != '*')
        .map(|c| if c == '_' { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn default_title(label: &DateLabel) -> String {
    format!("📅 *Partidos del {label}*")
}

fn updated_footer(updated_at: &DateTime<FixedOffset>) -> String {
    format!("🔄 _Actualizado: {}h_", updated_at.format("%H:%M"))
}

fn total_line(n: usize) -> String {
    format!("📊 Total: {n} partidos encontrados")
}

pub fn record_block(record: &MatchRecord) -> String {
    format!(
        "{} *{}*\n   🏆 {}\n   🕐 {}\n   📺 {}\n",
        record.category().emoji(),
        bold_text(record.teams()),
        escape_markdown(record.league()),
        escape_markdown(record.time()),
        escape_markdown(record.channel()),
    )
}

pub fn format_day(
    records: &[MatchRecord],
    label: &DateLabel,
    title: Option<&str>,
    updated_at: &DateTime<FixedOffset>,
) -> String {
    let header = title
        .map(str::to_string)
        .unwrap_or_else(|| default_title(label));

    if records.is_empty() {
        return format!(
            "{header}\n\n{NO_MATCHES_DAY}\n\n{}",
            updated_footer(updated_at)
        );
    }

    let mut msg = format!("{header}\n\n");
    for record in records {
        msg.push_str(&record_block(record));
        msg.push('\n');
    }
    msg.push_str(&total_line(records.len()));
    msg
}

/// One day of a weekly sweep; `offset` counts days from the first one.
#[derive(Debug, Clone)]
pub struct WeekDay {
    pub offset: u32,
    pub date: NaiveDate,
    pub records: Vec<MatchRecord>,
}

pub fn format_week(days: &[WeekDay], updated_at: &DateTime<FixedOffset>) -> String {
    let mut msg = format!("{WEEK_TITLE}\n\n");
    let mut sections = 0usize;
    for day in days.iter().filter(|d| !d.records.is_empty()) {
        sections += 1;
        msg.push_str(&format!(
            "📆 *{}* ({})\n",
            day_heading(day.offset, day.date),
            localize(day.date)
        ));
        for record in &day.records {
            msg.push_str(&record_block(record));
            msg.push('\n');
        }
        msg.push_str(&total_line(day.records.len()));
        msg.push_str("\n\n");
    }

    if sections == 0 {
        return format!(
            "{WEEK_TITLE}\n\n{NO_MATCHES_WEEK}\n\n{}",
            updated_footer(updated_at)
        );
    }
    msg.trim_end().to_string()
}

pub fn format_transport_error() -> String {
    "❌ *Error de conexión*\n\nNo se pudo acceder a la página de partidos. \
     Intenta nuevamente en unos minutos."
        .to_string()
}

pub fn format_status(web_status: Result<u16, String>, now: &DateTime<FixedOffset>) -> String {
    let web = match web_status {
        Ok(200) => "🟢 Conectado".to_string(),
        Ok(code) => format!("🟡 Problemas de conexión (http {code})"),
        Err(_) => "🔴 Sin conexión".to_string(),
    };
    format!(
        "📊 *Estado del Bot:*\n\n🤖 Bot: 🟢 Funcionando\n🌐 Web: {web}\n🕐 Hora: {}\n📅 Fecha: {}",
        now.format("%H:%M:%S"),
        now.format("%d/%m/%Y"),
    )
}

/// Length as Telegram counts it.
pub fn message_len(s: &str) -> usize {
    s.encode_utf16().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Split,
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPolicy {
    pub limit: usize,
    pub overflow: Overflow,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            overflow: Overflow::Split,
        }
    }
}

impl LengthPolicy {
    pub fn apply(&self, text: &str) -> Vec<String> {
        match self.overflow {
            Overflow::Split => split_message(text, self.limit),
            Overflow::Truncate => vec![truncate_message(text, self.limit)],
        }
    }
}

fn part_suffix(i: usize, n: usize) -> String {
    format!("\n\n📄 _Parte {i}/{n}_")
}

/// Splits `text` into ordered parts of at most `limit` UTF-16 units each,
/// including the "Parte i/n" suffix. Cuts fall on line breaks where possible.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if message_len(text) <= limit {
        return vec![text.to_string()];
    }

    // Part count only changes the suffix width by a digit or two; reserve
    // room for up to 999/999.
    let reserve = message_len(&part_suffix(999, 999));
    let budget = limit.saturating_sub(reserve).max(1);
    let chunks = chunk_lines(text, budget);
    let n = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| format!("{chunk}{}", part_suffix(i + 1, n)))
        .collect()
}

fn chunk_lines(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = message_len(line);
        let sep = usize::from(!current.is_empty());
        if current_len + sep + line_len <= budget {
            if sep == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += sep + line_len;
            continue;
        }
        if !current.trim().is_empty() {
            chunks.push(current.trim_end().to_string());
        }
        current.clear();
        current_len = 0;

        if line_len <= budget {
            current.push_str(line);
            current_len = line_len;
            continue;
        }
        // Single line longer than the budget: cut on char boundaries.
        for ch in line.chars() {
            let w = ch.len_utf16();
            if current_len + w > budget {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(ch);
            current_len += w;
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

/// Keeps the longest line-aligned prefix that fits in `limit` together with
/// the truncation marker.
pub fn truncate_message(text: &str, limit: usize) -> String {
    if message_len(text) <= limit {
        return text.to_string();
    }
    let budget = limit.saturating_sub(message_len(TRUNCATED_MARKER));
    let mut kept = String::new();
    let mut kept_len = 0usize;
    for line in text.split('\n') {
        let sep = usize::from(!kept.is_empty());
        let line_len = message_len(line);
        if kept_len + sep + line_len > budget {
            if kept.is_empty() {
                for ch in line.chars() {
                    if kept_len + ch.len_utf16() > budget {
                        break;
                    }
                    kept.push(ch);
                    kept_len += ch.len_utf16();
                }
            }
            break;
        }
        if sep == 1 {
            kept.push('\n');
        }
        kept.push_str(line);
        kept_len += sep + line_len;
    }
    format!("{}{TRUNCATED_MARKER}", kept.trim_end())
}
