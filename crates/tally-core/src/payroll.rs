//! Payroll engine types and the pay computation itself.
//!
//! The engine derives pay from worked hours and unpaid approved leave, using
//! a fixed 26-working-day month and 8-hour day. These constants are a
//! deliberate simplification of the rate model, not placeholders for a
//! derived calendar.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::round2;

pub const WORKING_DAYS_PER_MONTH: u32 = 26;
pub const HOURS_PER_WORKING_DAY: u32 = 8;

/// One immutable ledger entry per (employee, month, year). Never mutated;
/// regeneration for an existing period is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecord {
  pub payroll_id:    Uuid,
  pub employee_id:   Uuid,
  pub month:         u32,
  pub year:          i32,
  pub base_salary:   Decimal,
  pub total_hours:   Decimal,
  pub per_hour_rate: Decimal,
  pub earnings:      Decimal,
  pub deductions:    Decimal,
  pub net_salary:    Decimal,
  pub generated_at:  DateTime<Utc>,
}

/// Derived pay figures for one period, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollBreakdown {
  pub total_hours:   Decimal,
  /// Rounded to 2 dp for the record; earnings use the unrounded rate.
  pub per_hour_rate: Decimal,
  pub earnings:      Decimal,
  pub unpaid_days:   u32,
  pub deductions:    Decimal,
  pub net_salary:    Decimal,
}

/// The canonical pay formula.
///
/// `per_hour_rate = base_salary / (26 × 8)`, earnings are hours at that
/// rate, and each unpaid day deducts `base_salary / 26`. Earnings,
/// deductions, and net are rounded to 2 dp.
pub fn compute_pay(
  base_salary: Decimal,
  total_hours: Decimal,
  unpaid_days: u32,
) -> PayrollBreakdown {
  let hours_per_month =
    Decimal::from(WORKING_DAYS_PER_MONTH * HOURS_PER_WORKING_DAY);
  let rate = base_salary / hours_per_month;
  let per_day = base_salary / Decimal::from(WORKING_DAYS_PER_MONTH);

  let earnings = round2(rate * total_hours);
  let deductions = round2(per_day * Decimal::from(unpaid_days));

  PayrollBreakdown {
    total_hours,
    per_hour_rate: round2(rate),
    earnings,
    unpaid_days,
    deductions,
    net_salary: round2(earnings - deductions),
  }
}

// ─── Bulk generation ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPayroll {
  pub employee_id: Uuid,
  pub payroll_id:  Uuid,
  pub net_salary:  Decimal,
}

/// A per-employee failure during a bulk run. The run itself continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollFailure {
  pub employee_id: Uuid,
  pub reason:      String,
}

/// Result of a bulk run: one entry per active employee, in exactly one of
/// the three lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollRunOutcome {
  pub generated: Vec<GeneratedPayroll>,
  /// Employees that already had a record for the period.
  pub skipped:   Vec<Uuid>,
  pub failed:    Vec<PayrollFailure>,
}
