use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::time;
use time::{Date, Month, OffsetDateTime, UtcOffset};

use crate::error::IdeaDropError;

/// An idea as consumed by ranking. Built only through [`IdeaRow`] validation
/// or [`IdeaRecord::new`], so every field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: String,
    pub text: String,
    pub likes_count: u32,
    pub author_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_seed: bool,
}

impl IdeaRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, likes_count: u32, created_at: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            likes_count,
            author_id: None,
            created_at,
            is_seed: false,
        }
    }

    pub fn seeded(mut self) -> Self {
        self.is_seed = true;
        self
    }
}

/// Row shape returned by the `ideas` table. Every field is optional here;
/// conversion into [`IdeaRecord`] rejects rows with missing required fields.
#[derive(Debug, Clone, Deserialize)]
pub struct IdeaRow {
    pub id: Option<serde_json::Value>,
    #[serde(alias = "content")]
    pub text: Option<String>,
    pub likes_count: Option<i64>,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
    pub is_seed: Option<bool>,
}

impl TryFrom<IdeaRow> for IdeaRecord {
    type Error = IdeaDropError;

    fn try_from(row: IdeaRow) -> Result<Self, Self::Error> {
        let id = match row.id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(IdeaDropError::InvalidRecord("missing id".to_string())),
        };

        let likes_count = match row.likes_count {
            Some(n) => u32::try_from(n).map_err(|_| {
                IdeaDropError::InvalidRecord(format!("idea {}: likes_count {} out of range", id, n))
            })?,
            None => {
                return Err(IdeaDropError::InvalidRecord(format!(
                    "idea {}: missing likes_count",
                    id
                )))
            }
        };

        let created_raw = row.created_at.ok_or_else(|| {
            IdeaDropError::InvalidRecord(format!("idea {}: missing created_at", id))
        })?;
        let created_at = OffsetDateTime::parse(&created_raw, &Rfc3339).map_err(|e| {
            IdeaDropError::InvalidRecord(format!(
                "idea {}: bad created_at {:?}: {}",
                id, created_raw, e
            ))
        })?;

        Ok(IdeaRecord {
            id,
            text: row.text.unwrap_or_default(),
            likes_count,
            author_id: row.user_id,
            created_at,
            is_seed: row.is_seed.unwrap_or(false),
        })
    }
}

/// Authenticated caller identity, handed in explicitly by whoever holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.access_token.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = IdeaDropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Language::Ko),
            "en" | "english" => Ok(Language::En),
            other => Err(IdeaDropError::InvalidRecord(format!("unknown language {:?}", other))),
        }
    }
}

/// A calendar month, used as the ranking period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first_day: Date,
    last_day: Date,
}

impl CalendarMonth {
    pub fn new(year: i32, month: Month) -> Result<Self, IdeaDropError> {
        let first_day = Date::from_calendar_date(year, month, 1)
            .map_err(|e| IdeaDropError::InvalidRecord(format!("bad month {}-{}: {}", year, month, e)))?;
        let days = month.length(year);
        let last_day = Date::from_calendar_date(year, month, days)
            .map_err(|e| IdeaDropError::InvalidRecord(format!("bad month {}-{}: {}", year, month, e)))?;
        Ok(Self { first_day, last_day })
    }

    /// The month that contains `instant` when viewed at `offset`.
    pub fn containing(instant: OffsetDateTime, offset: UtcOffset) -> Result<Self, IdeaDropError> {
        let local = instant.to_offset(offset);
        Self::new(local.year(), local.month())
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    pub fn first_day(&self) -> Date {
        self.first_day
    }

    pub fn last_day(&self) -> Date {
        self.last_day
    }

    pub fn previous(&self) -> Result<Self, IdeaDropError> {
        let year = if self.month() == Month::January {
            self.year() - 1
        } else {
            self.year()
        };
        Self::new(year, self.month().previous())
    }

    /// Inclusive bounds `[first day 00:00:00, last day 23:59:59]` at `offset`.
    pub fn window(&self, offset: UtcOffset) -> (OffsetDateTime, OffsetDateTime) {
        let start = self.first_day.midnight().assume_offset(offset);
        let end = self.last_day.with_time(time!(23:59:59)).assume_offset(offset);
        (start, end)
    }

    pub fn contains(&self, instant: OffsetDateTime, offset: UtcOffset) -> bool {
        let (start, end) = self.window(offset);
        start <= instant && instant <= end
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}

impl FromStr for CalendarMonth {
    type Err = IdeaDropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || IdeaDropError::InvalidRecord(format!("expected YYYY-MM, got {:?}", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u8 = month.parse().map_err(|_| bad())?;
        let month = Month::try_from(month).map_err(|_| bad())?;
        Self::new(year, month)
    }
}
