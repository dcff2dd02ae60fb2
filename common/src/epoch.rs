use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::Error;

/// Unix timestamp in seconds, always positive and representable as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EpochTime(u64);

impl EpochTime {
    pub fn new(seconds: u64) -> crate::Result<Self> {
        if seconds == 0 {
            return Err(Error::InvalidEpoch(seconds.to_string()));
        }
        let epoch = Self(seconds);
        epoch.to_datetime()?;
        Ok(epoch)
    }

    pub fn seconds(&self) -> u64 {
        self.0
    }

    pub fn to_datetime(&self) -> crate::Result<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(Error::EpochOutOfRange(self.0))
    }

    /// ISO-8601 in UTC with millisecond precision, e.g. `2021-08-26T17:46:40.000Z`.
    pub fn to_iso8601(&self) -> String {
        // range is checked in the constructor
        self.to_datetime()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default()
    }
}

impl FromStr for EpochTime {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let seconds = s
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::InvalidEpoch(s.to_string()))?;
        Self::new(seconds)
    }
}

impl Display for EpochTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso8601() {
        let epoch = EpochTime::new(1630000000).unwrap();
        assert_eq!(epoch.to_iso8601(), "2021-08-26T17:46:40.000Z");
    }

    #[test]
    fn test_rejects_non_positive_and_garbage() {
        assert!(EpochTime::new(0).is_err());
        assert!("0".parse::<EpochTime>().is_err());
        assert!("-5".parse::<EpochTime>().is_err());
        assert!("invalid".parse::<EpochTime>().is_err());
        assert!("".parse::<EpochTime>().is_err());
        assert!(EpochTime::new(u64::MAX).is_err());
    }

    #[test]
    fn test_parse_trims_input() {
        let epoch: EpochTime = " 1630000000\n".parse().unwrap();
        assert_eq!(epoch.seconds(), 1630000000);
    }
}
