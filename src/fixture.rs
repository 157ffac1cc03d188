use std::fmt;
use std::str::FromStr;

use chrono::{Duration as ChronoDuration, NaiveDate};

use crate::error::{Field, SkipReason};

pub const UNCONFIRMED: &str = "Por confirmar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryTag {
    Colombia,
    England,
    Spain,
    Italy,
    Germany,
    France,
    ChampionsLeague,
    EuropaLeague,
    Libertadores,
    Sudamericana,
    Qualifiers,
    WorldCup,
    CopaAmerica,
    Eurocopa,
    Argentina,
    Brazil,
    Friendly,
    Other,
}

// Order matters: a fragment must come before any shorter fragment it contains
// or that would shadow it in a longer league name.
const CATEGORY_FRAGMENTS: &[(&str, CategoryTag)] = &[
    ("liga betplay", CategoryTag::Colombia),
    ("betplay", CategoryTag::Colombia),
    ("colombia", CategoryTag::Colombia),
    ("premier league", CategoryTag::England),
    ("premier", CategoryTag::England),
    ("la liga", CategoryTag::Spain),
    ("laliga", CategoryTag::Spain),
    ("españa", CategoryTag::Spain),
    ("serie a", CategoryTag::Italy),
    ("italia", CategoryTag::Italy),
    ("bundesliga", CategoryTag::Germany),
    ("alemania", CategoryTag::Germany),
    ("ligue 1", CategoryTag::France),
    ("ligue", CategoryTag::France),
    ("francia", CategoryTag::France),
    ("europa league", CategoryTag::EuropaLeague),
    ("champions", CategoryTag::ChampionsLeague),
    ("libertadores", CategoryTag::Libertadores),
    ("eliminatorias", CategoryTag::Qualifiers),
    ("sudamericana", CategoryTag::Sudamericana),
    ("mundial", CategoryTag::WorldCup),
    ("copa america", CategoryTag::CopaAmerica),
    ("copa américa", CategoryTag::CopaAmerica),
    ("eurocopa", CategoryTag::Eurocopa),
    ("argentina", CategoryTag::Argentina),
    ("brasil", CategoryTag::Brazil),
    ("brazil", CategoryTag::Brazil),
    ("amistoso", CategoryTag::Friendly),
];

impl CategoryTag {
    pub fn for_league(league: &str) -> Self {
        let lower = league.to_lowercase();
        CATEGORY_FRAGMENTS
            .iter()
            .find(|(fragment, _)| lower.contains(fragment))
            .map(|(_, tag)| *tag)
            .unwrap_or(CategoryTag::Other)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            CategoryTag::Colombia => "🇨🇴",
            CategoryTag::England => "\u{1F3F4}\u{E0067}\u{E0062}\u{E0065}\u{E006E}\u{E0067}\u{E007F}",
            CategoryTag::Spain => "🇪🇸",
            CategoryTag::Italy => "🇮🇹",
            CategoryTag::Germany => "🇩🇪",
            CategoryTag::France => "🇫🇷",
            CategoryTag::ChampionsLeague
            | CategoryTag::Libertadores
            | CategoryTag::CopaAmerica
            | CategoryTag::Eurocopa => "🏆",
            CategoryTag::EuropaLeague => "🥈",
            CategoryTag::Sudamericana => "🥉",
            CategoryTag::Qualifiers => "🌎",
            CategoryTag::WorldCup => "🌍",
            CategoryTag::Argentina => "🇦🇷",
            CategoryTag::Brazil => "🇧🇷",
            CategoryTag::Friendly => "🤝",
            CategoryTag::Other => "⚽",
        }
    }
}

/// A validated fixture. Only built through [`MatchRecord::new`], which
/// rejects empty fields, so every accessor returns non-empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    teams: String,
    league: String,
    time: String,
    channel: String,
    category: CategoryTag,
    date: Option<String>,
}

impl MatchRecord {
    pub fn new(
        teams: &str,
        league: &str,
        time: &str,
        channel: &str,
        date: Option<String>,
    ) -> Result<Self, SkipReason> {
        let teams = required(teams, Field::Teams)?;
        let league = required(league, Field::League)?;
        let time = required(time, Field::Time)?;
        let channel = required(channel, Field::Channel)?;
        let category = CategoryTag::for_league(&league);
        Ok(Self {
            teams,
            league,
            time,
            channel,
            category,
            date,
        })
    }

    pub fn teams(&self) -> &str {
        &self.teams
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn category(&self) -> CategoryTag {
        self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

fn required(value: &str, field: Field) -> Result<String, SkipReason> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SkipReason::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// What the caller asked for. Closed set, so every dispatch is an exhaustive
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Today,
    Tomorrow,
    Week,
    On(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySpan {
    SingleDay,
    SevenDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureQuery {
    pub date: NaiveDate,
    pub span: QuerySpan,
}

pub const WEEK_DAYS: u32 = 7;

impl Scope {
    pub fn query(self, today: NaiveDate) -> FixtureQuery {
        match self {
            Scope::Today => FixtureQuery {
                date: today,
                span: QuerySpan::SingleDay,
            },
            Scope::Tomorrow => FixtureQuery {
                date: today + ChronoDuration::days(1),
                span: QuerySpan::SingleDay,
            },
            Scope::Week => FixtureQuery {
                date: today,
                span: QuerySpan::SevenDays,
            },
            Scope::On(date) => FixtureQuery {
                date,
                span: QuerySpan::SingleDay,
            },
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Today => f.write_str("today"),
            Scope::Tomorrow => f.write_str("tomorrow"),
            Scope::Week => f.write_str("week"),
            Scope::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope {0:?} (use today, tomorrow, week or YYYY-MM-DD)")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let word = raw.trim().to_lowercase();
        match word.as_str() {
            "today" | "hoy" => Ok(Scope::Today),
            "tomorrow" | "manana" | "mañana" => Ok(Scope::Tomorrow),
            "week" | "semana" => Ok(Scope::Week),
            _ => NaiveDate::parse_from_str(&word, "%Y-%m-%d")
                .map(Scope::On)
                .map_err(|_| UnknownScope(raw.to_string())),
        }
    }
}
