//! [`Period`] — a (month, year) pair identifying one payroll cycle.

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result};

/// One calendar month, validated at construction.
///
/// Stored as the first day of the month so date arithmetic never needs to
/// re-validate the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(NaiveDate);

impl Period {
  pub fn new(month: u32, year: i32) -> Result<Self> {
    NaiveDate::from_ymd_opt(year, month, 1)
      .map(Self)
      .ok_or(Error::InvalidMonth(month))
  }

  pub fn month(&self) -> u32 {
    self.0.month()
  }

  pub fn year(&self) -> i32 {
    self.0.year()
  }

  pub fn first_day(&self) -> NaiveDate {
    self.0
  }

  pub fn last_day(&self) -> NaiveDate {
    let next = if self.month() == 12 {
      NaiveDate::from_ymd_opt(self.year() + 1, 1, 1)
    } else {
      NaiveDate::from_ymd_opt(self.year(), self.month() + 1, 1)
    };
    match next.and_then(|d| d.pred_opt()) {
      Some(d) => d,
      // Unreachable for any period that passed `new`.
      None => self.0,
    }
  }

  /// True calendar length of the month (28–31).
  pub fn days_in_month(&self) -> u32 {
    self.last_day().day()
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    date >= self.first_day() && date <= self.last_day()
  }
}

impl std::fmt::Display for Period {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.month(), self.year())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_invalid_months() {
    assert!(Period::new(0, 2024).is_err());
    assert!(Period::new(13, 2024).is_err());
    assert!(Period::new(12, 2024).is_ok());
  }

  #[test]
  fn days_in_month_uses_real_calendar_length() {
    assert_eq!(Period::new(2, 2024).unwrap().days_in_month(), 29);
    assert_eq!(Period::new(2, 2023).unwrap().days_in_month(), 28);
    assert_eq!(Period::new(4, 2024).unwrap().days_in_month(), 30);
    assert_eq!(Period::new(12, 2024).unwrap().days_in_month(), 31);
  }

  #[test]
  fn contains_is_inclusive_of_both_ends() {
    let p = Period::new(3, 2024).unwrap();
    assert!(p.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    assert!(p.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
    assert!(!p.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
  }
}
