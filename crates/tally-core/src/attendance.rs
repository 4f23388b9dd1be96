//! Attendance ledger types — daily check-in/check-out and derived summaries.
//!
//! One record per (employee, date), created by check-in and mutated exactly
//! once by check-out. Hours are wall-clock elapsed time with no break
//! deduction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{period::Period, round2};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub employee_id: Uuid,
  pub date:        NaiveDate,
  pub check_in:    DateTime<Utc>,
  pub check_out:   Option<DateTime<Utc>>,
  /// Set exactly once, at check-out.
  pub total_hours: Option<Decimal>,
}

/// Wall-clock hours between two instants, rounded to 2 dp.
pub fn elapsed_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Decimal {
  let seconds = (check_out - check_in).num_seconds();
  round2(Decimal::from(seconds) / Decimal::from(3600))
}

// ─── Daily status ────────────────────────────────────────────────────────────

/// Today's state for one employee. Absence of a record is a valid state,
/// not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStatus {
  pub checked_in:  bool,
  pub checked_out: bool,
  pub check_in:    Option<DateTime<Utc>>,
  pub check_out:   Option<DateTime<Utc>>,
  pub total_hours: Option<Decimal>,
}

impl AttendanceStatus {
  pub fn absent() -> Self {
    Self {
      checked_in:  false,
      checked_out: false,
      check_in:    None,
      check_out:   None,
      total_hours: None,
    }
  }

  pub fn from_record(record: &AttendanceRecord) -> Self {
    Self {
      checked_in:  true,
      checked_out: record.check_out.is_some(),
      check_in:    Some(record.check_in),
      check_out:   record.check_out,
      total_hours: record.total_hours,
    }
  }
}

// ─── Monthly summary ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
  pub employee_id:           Uuid,
  pub month:                 u32,
  pub year:                  i32,
  pub working_days:          u32,
  pub absent_days:           u32,
  pub total_hours:           Decimal,
  pub average_hours:         Decimal,
  pub max_hours:             Decimal,
  pub min_hours:             Decimal,
  pub missing_checkout_days: u32,
}

impl MonthlySummary {
  /// Aggregate one month of records. Records missing a check-out count as
  /// zero hours; `absent_days` uses the true calendar length of the month.
  pub fn from_records(
    employee_id: Uuid,
    period: Period,
    records: &[AttendanceRecord],
  ) -> Self {
    let working_days = records.len() as u32;
    let hours: Vec<Decimal> = records
      .iter()
      .map(|r| r.total_hours.unwrap_or(Decimal::ZERO))
      .collect();

    let total: Decimal = hours.iter().copied().sum();
    let average = if working_days == 0 {
      Decimal::ZERO
    } else {
      total / Decimal::from(working_days)
    };
    let max = hours.iter().copied().max().unwrap_or(Decimal::ZERO);
    let min = hours.iter().copied().min().unwrap_or(Decimal::ZERO);

    let missing_checkout_days =
      records.iter().filter(|r| r.check_out.is_none()).count() as u32;

    Self {
      employee_id,
      month: period.month(),
      year: period.year(),
      working_days,
      absent_days: period.days_in_month() - working_days.min(period.days_in_month()),
      total_hours: round2(total),
      average_hours: round2(average),
      max_hours: round2(max),
      min_hours: round2(min),
      missing_checkout_days,
    }
  }
}
