use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTES_PER_DAY: i64 = 24 * 60;
const NOON: i64 = 12 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("invalid clock time '{0}': expected H:MM AM|PM")]
    Malformed(String),
    #[error("invalid hour {0}: must be 1-12")]
    Hour(u32),
    #[error("invalid minute {0}: must be 0-59")]
    Minute(u32),
}

/// A wall-clock time on a 12-hour dial, stored as minutes since midnight.
///
/// There is no date component: arithmetic that leaves the day wraps around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub fn from_minutes(total: i64) -> Self {
        Self {
            minutes: total.rem_euclid(MINUTES_PER_DAY) as u16,
        }
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        self.minutes as i64
    }

    pub fn add_minutes(self, delta: i64) -> Self {
        Self::from_minutes(self.minutes_since_midnight() + delta)
    }

    pub fn hour(&self) -> u32 {
        match (self.minutes / 60) % 12 {
            0 => 12,
            h => h as u32,
        }
    }

    pub fn minute(&self) -> u32 {
        (self.minutes % 60) as u32
    }

    pub fn is_pm(&self) -> bool {
        self.minutes_since_midnight() >= NOON
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockError::Malformed(s.to_string());

        let (clock, period) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let (hour, minute) = clock.split_once(':').ok_or_else(malformed)?;
        if minute.len() != 2 {
            return Err(malformed());
        }
        let hour: u32 = hour.parse().map_err(|_| malformed())?;
        let minute: u32 = minute.parse().map_err(|_| malformed())?;

        if !(1..=12).contains(&hour) {
            return Err(ClockError::Hour(hour));
        }
        if minute > 59 {
            return Err(ClockError::Minute(minute));
        }

        // 12 AM is the start of the day and 12 PM is already past noon
        let base = if hour == 12 { 0 } else { hour as i64 * 60 };
        let total = match period.trim().to_uppercase().as_str() {
            "AM" => base + minute as i64,
            "PM" => base + minute as i64 + NOON,
            _ => return Err(malformed()),
        };

        Ok(Self::from_minutes(total))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = if self.is_pm() { "PM" } else { "AM" };
        write!(f, "{}:{:02} {}", self.hour(), self.minute(), period)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
