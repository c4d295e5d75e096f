//! Simulation time
//!
//! The core operates on a single integer unit: whole minutes since the start
//! of the simulation. Wall-clock strings (`HH:MM` or `HH:MM:SS`) exist only
//! at the boundary and are converted before anything else sees them.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Minutes since simulation start.
///
/// Signed so that "before anything happened" can be expressed naturally in
/// comparisons; authored timestamps are expected to be non-negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimMinutes(i64);

impl SimMinutes {
    pub const ZERO: SimMinutes = SimMinutes(0);

    pub const fn new(minutes: i64) -> Self {
        Self(minutes)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parse a wall-clock string (`HH:MM` or `HH:MM:SS`) into minutes since
    /// simulation start. Seconds are truncated to whole minutes.
    pub fn parse_clock(s: &str) -> Result<Self, DomainError> {
        let time = NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map_err(|_| DomainError::parse(format!("invalid clock time: {s:?}")))?;
        Ok(Self(i64::from(time.hour()) * 60 + i64::from(time.minute())))
    }
}

impl Add for SimMinutes {
    type Output = SimMinutes;

    fn add(self, rhs: SimMinutes) -> SimMinutes {
        SimMinutes(self.0 + rhs.0)
    }
}

impl Sub for SimMinutes {
    type Output = SimMinutes;

    fn sub(self, rhs: SimMinutes) -> SimMinutes {
        SimMinutes(self.0 - rhs.0)
    }
}

impl From<i64> for SimMinutes {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SimMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            return write!(f, "{}m", self.0);
        }
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
