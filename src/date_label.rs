use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Day-of-month plus month, rendered the way the source pages caption a day
/// ("10 de mayo"). Only used as a matching key against page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateLabel {
    day: u32,
    month: u32,
}

impl DateLabel {
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn month_name(&self) -> &'static str {
        month_name_es(self.month)
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} de {}", self.day, self.month_name())
    }
}

pub fn localize(date: NaiveDate) -> DateLabel {
    DateLabel {
        day: date.day(),
        month: date.month(),
    }
}

fn month_name_es(month: u32) -> &'static str {
    // chrono months are 1..=12
    MONTHS_ES[(month.clamp(1, 12) - 1) as usize]
}

pub fn now_in(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

pub fn today_in(offset: FixedOffset) -> NaiveDate {
    now_in(offset).date_naive()
}

/// Heading for the n-th day of a weekly summary starting today.
pub fn day_heading(offset_days: u32, date: NaiveDate) -> &'static str {
    match offset_days {
        0 => "Hoy",
        1 => "Mañana",
        2 => "Pasado mañana",
        _ => weekday_es(date.weekday()),
    }
}

pub fn weekday_es(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// Month number for a Spanish or English month word or its three-letter
/// abbreviation ("feb", "Febrero", "sept.", "August").
pub fn parse_month_word(word: &str) -> Option<u32> {
    let w: String = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if w.chars().count() < 3 {
        return None;
    }
    for table in [&MONTHS_ES, &MONTHS_EN] {
        for (idx, name) in table.iter().enumerate() {
            if *name == w || (w.len() <= 4 && name.starts_with(w.as_str())) {
                return Some(idx as u32 + 1);
            }
        }
    }
    // Spanish abbreviations that are not prefixes of the full name.
    match w.as_str() {
        "sep" | "sept" | "set" => Some(9),
        _ => None,
    }
}
