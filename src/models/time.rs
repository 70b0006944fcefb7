use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlanError, Result};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute resolution, stored as minutes since midnight.
///
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Build a time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(PlanError::InvalidInput(format!(
                "{} minutes is past the end of the day",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    /// Build a time from an hour and minute.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if minute >= 60 {
            return Err(PlanError::InvalidInput(format!("invalid minute {}", minute)));
        }
        let minutes = hour
            .checked_mul(60)
            .and_then(|m| m.checked_add(minute))
            .ok_or_else(|| PlanError::InvalidInput(format!("invalid hour {}", hour)))?;
        Self::from_minutes(minutes)
    }

    /// Minutes since midnight. Placement arithmetic happens in this unit.
    #[inline]
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Caller guarantees `minutes < MINUTES_PER_DAY`.
    #[inline]
    pub(crate) fn at(minutes: u32) -> Self {
        debug_assert!(minutes < MINUTES_PER_DAY);
        Self(minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|e| PlanError::InvalidInput(format!("invalid time '{}': {}", s, e)))?;
        Ok(Self(parsed.hour() * 60 + parsed.minute()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t: ClockTime = "07:05".parse().unwrap();
        assert_eq!(t.minutes(), 425);
        assert_eq!(t.to_string(), "07:05");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("25:00".parse::<ClockTime>().is_err());
        assert!("seven".parse::<ClockTime>().is_err());
        assert!(ClockTime::from_minutes(MINUTES_PER_DAY).is_err());
        assert!(ClockTime::from_hm(7, 60).is_err());
        assert!(ClockTime::from_hm(24, 0).is_err());
        assert!(ClockTime::from_hm(u32::MAX, 0).is_err());
        assert!(ClockTime::from_hm(u32::MAX / 60, 59).is_err());
        assert_eq!(ClockTime::from_hm(23, 59).unwrap().minutes(), 1439);
    }

    #[test]
    fn test_serde_uses_hh_mm() {
        let t = ClockTime::from_hm(22, 30).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"22:30\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
