//! # Temporal Types: Circuit Dates
//!
//! The disclosure and full-proof circuits compare the document's expiry and
//! birth dates against a verifier-side "current date" signal. That signal is
//! three integers `[YY, MM, DD]`, taken from the UTC wall clock at generation
//! time.
//!
//! ## Invariant
//!
//! Dates are always UTC. A local offset would shift the date across midnight
//! and make the same request produce different signals depending on where
//! it ran.
//!
//! The clock is injected through [`Clock`] so tests pin the date with
//! [`FixedClock`].

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar date as the circuit sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CircuitDate(NaiveDate);

impl CircuitDate {
    /// Build from a UTC instant, dropping the time of day.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.date_naive())
    }

    /// Build from a calendar date. Returns `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_naive(&self) -> &NaiveDate {
        &self.0
    }

    /// `[YY, MM, DD]`, year reduced modulo 100.
    pub fn to_signal(&self) -> [u64; 3] {
        [
            self.0.year().rem_euclid(100) as u64,
            u64::from(self.0.month()),
            u64::from(self.0.day()),
        ]
    }
}

impl std::fmt::Display for CircuitDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Source of the current date.
pub trait Clock: Send + Sync {
    fn today(&self) -> CircuitDate;
}

/// The UTC system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CircuitDate {
        CircuitDate::from_utc(Utc::now())
    }
}

/// A clock frozen at one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CircuitDate);

impl Clock for FixedClock {
    fn today(&self) -> CircuitDate {
        self.0
    }
}
