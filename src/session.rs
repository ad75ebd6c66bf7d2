//! Date navigation cursor
//!
//! The date the daily log shows. Set to today when a session starts and
//! changed only by explicit navigation. Never persisted.

use std::str::FromStr;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Navigation requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Navigation {
    Previous,
    Next,
    Today,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown navigation {0:?}, expected previous, next or today")]
pub struct UnknownNavigation(pub String);

impl FromStr for Navigation {
    type Err = UnknownNavigation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "previous" | "prev" | "back" => Ok(Navigation::Previous),
            "next" | "forward" => Ok(Navigation::Next),
            "today" => Ok(Navigation::Today),
            _ => Err(UnknownNavigation(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateCursor {
    today: NaiveDate,
    current: NaiveDate,
}

impl DateCursor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            current: today,
        }
    }

    /// Cursor for a session starting now, in local time
    pub fn starting_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_today(&self) -> bool {
        self.current == self.today
    }

    pub fn previous_day(&mut self) -> NaiveDate {
        self.current = self.current.checked_sub_days(Days::new(1)).unwrap_or(self.current);
        self.current
    }

    pub fn next_day(&mut self) -> NaiveDate {
        self.current = self.current.checked_add_days(Days::new(1)).unwrap_or(self.current);
        self.current
    }

    pub fn return_to_today(&mut self) -> NaiveDate {
        self.current = self.today;
        self.current
    }

    pub fn set(&mut self, date: NaiveDate) -> NaiveDate {
        self.current = date;
        self.current
    }

    pub fn navigate(&mut self, navigation: Navigation) -> NaiveDate {
        match navigation {
            Navigation::Previous => self.previous_day(),
            Navigation::Next => self.next_day(),
            Navigation::Today => self.return_to_today(),
        }
    }

    /// Heading for the daily log of `date` relative to this cursor's today
    pub fn heading_for(&self, date: NaiveDate) -> String {
        let formatted = date.format("%A, %B %d, %Y");
        if date == self.today {
            format!("Today's Food Log ({})", formatted)
        } else {
            format!("Food Log for {}", formatted)
        }
    }
}
