//! Time source abstraction.
//!
//! Stores never read the wall clock directly; they are handed a [`Clock`] at
//! construction so timestamps and the staleness rule can be driven from tests.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// A source of "now".
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// The UTC calendar date of [`Clock::now`].
  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
  pub fn new(now: DateTime<Utc>) -> Self { Self { now: Mutex::new(now) } }

  /// Frozen at midnight UTC of `date`.
  pub fn at_date(date: NaiveDate) -> Self {
    Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
  }

  pub fn set(&self, now: DateTime<Utc>) {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
  }

  pub fn advance(&self, by: Duration) {
    let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
    *guard += by;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fixed_clock_advances() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let clock = FixedClock::at_date(day);
    assert_eq!(clock.today(), day);

    clock.advance(Duration::days(2));
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
  }
}
