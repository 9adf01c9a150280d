// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Transaction validity intervals

use crate::error::InvariantError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Interval in which a transaction may be notarised.
///
/// At least one bound is present. `from_time` is inclusive, `until_time` is
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    from_time: Option<SystemTime>,
    until_time: Option<SystemTime>,
}

impl TimeWindow {
    pub fn between(from_time: SystemTime, until_time: SystemTime) -> Result<Self, InvariantError> {
        Self::checked(Some(from_time), Some(until_time))
    }

    pub fn from_only(from_time: SystemTime) -> Self {
        Self {
            from_time: Some(from_time),
            until_time: None,
        }
    }

    pub fn until_only(until_time: SystemTime) -> Self {
        Self {
            from_time: None,
            until_time: Some(until_time),
        }
    }

    /// Window of `tolerance` either side of `time`
    pub fn with_tolerance(time: SystemTime, tolerance: Duration) -> Result<Self, InvariantError> {
        let from_time = time
            .checked_sub(tolerance)
            .ok_or_else(|| InvariantError::InvalidTimeWindow("lower bound precedes the clock origin".to_string()))?;
        let until_time = time.checked_add(tolerance).ok_or_else(|| InvariantError::InvalidTimeWindow("upper bound overflows".to_string()))?;
        Self::between(from_time, until_time)
    }

    fn checked(from_time: Option<SystemTime>, until_time: Option<SystemTime>) -> Result<Self, InvariantError> {
        let window = Self { from_time, until_time };
        window.validate()?;
        Ok(window)
    }

    /// Re-checks the bounds, e.g. after decoding
    pub fn validate(&self) -> Result<(), InvariantError> {
        match (self.from_time, self.until_time) {
            (None, None) => Err(InvariantError::InvalidTimeWindow("at least one bound is required".to_string())),
            (Some(from), Some(until)) if from >= until => Err(InvariantError::InvalidTimeWindow("from time must precede until time".to_string())),
            _ => Ok(()),
        }
    }

    pub fn from_time(&self) -> Option<SystemTime> {
        self.from_time
    }

    pub fn until_time(&self) -> Option<SystemTime> {
        self.until_time
    }

    pub fn length(&self) -> Option<Duration> {
        let (from, until) = (self.from_time?, self.until_time?);
        until.duration_since(from).ok()
    }

    pub fn contains(&self, instant: SystemTime) -> bool {
        self.from_time.is_none_or(|from| instant >= from) && self.until_time.is_none_or(|until| instant < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_between_bounds() {
        let window = TimeWindow::between(at(100), at(200)).unwrap();
        assert!(window.contains(at(100)));
        assert!(window.contains(at(199)));
        assert!(!window.contains(at(200)));
        assert!(!window.contains(at(99)));
        assert_eq!(window.length(), Some(Duration::from_secs(100)));
    }

    #[test]
    fn test_open_ended() {
        assert!(TimeWindow::from_only(at(10)).contains(at(1_000_000)));
        assert!(!TimeWindow::until_only(at(10)).contains(at(10)));
        assert_eq!(TimeWindow::from_only(at(10)).length(), None);
    }

    #[test]
    fn test_inverted_window_rejected() {
        assert!(TimeWindow::between(at(200), at(100)).is_err());
        assert!(TimeWindow::between(at(100), at(100)).is_err());
    }

    #[test]
    fn test_with_tolerance() {
        let window = TimeWindow::with_tolerance(at(1000), Duration::from_secs(30)).unwrap();
        assert_eq!(window.from_time(), Some(at(970)));
        assert_eq!(window.until_time(), Some(at(1030)));
        assert!(TimeWindow::with_tolerance(at(1000), Duration::ZERO).is_err());
    }
}
