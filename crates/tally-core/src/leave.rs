//! Leave ledger types — the type catalog, per-employee balances, and
//! requests with their status machine.
//!
//! A request moves `pending → approved` (mutates the balance) or
//! `pending → rejected`. Both end states are terminal; no other transition
//! exists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// An immutable catalog entry, seeded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveType {
  pub leave_type_id: Uuid,
  pub name:          String,
  /// Days granted per employee at onboarding.
  pub default_days:  u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveType {
  pub name:         String,
  pub default_days: u32,
}

// ─── Balances ────────────────────────────────────────────────────────────────

/// Per-employee, per-type entitlement ledger. Created at onboarding, mutated
/// only by approval. `used_days <= total_days` always.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBalance {
  pub employee_id:   Uuid,
  pub leave_type_id: Uuid,
  pub total_days:    u32,
  pub used_days:     u32,
}

impl LeaveBalance {
  pub fn remaining(&self) -> u32 {
    self.total_days - self.used_days
  }
}

/// A balance row joined with its catalog name, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBalanceEntry {
  pub leave_type_id: Uuid,
  pub leave_type:    String,
  pub total_days:    u32,
  pub used_days:     u32,
  pub remaining:     u32,
}

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
  Pending,
  Approved,
  Rejected,
}

impl LeaveStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      LeaveStatus::Pending => "pending",
      LeaveStatus::Approved => "approved",
      LeaveStatus::Rejected => "rejected",
    }
  }
}

impl std::fmt::Display for LeaveStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The admin's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveDecision {
  Approved,
  Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
  pub leave_id:      Uuid,
  pub employee_id:   Uuid,
  pub leave_type_id: Uuid,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub reason:        Option<String>,
  pub status:        LeaveStatus,
  pub applied_at:    DateTime<Utc>,
}

impl LeaveRequest {
  /// Inclusive length of the request in whole days.
  pub fn days(&self) -> u32 {
    ((self.end_date - self.start_date).num_days() + 1) as u32
  }
}

/// Two intervals overlap when they share at least one calendar day.
pub fn intervals_overlap(
  a_start: NaiveDate,
  a_end: NaiveDate,
  b_start: NaiveDate,
  b_end: NaiveDate,
) -> bool {
  a_start <= b_end && a_end >= b_start
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveRequest {
  pub employee_id:   Uuid,
  pub leave_type_id: Uuid,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub reason:        Option<String>,
}

impl NewLeaveRequest {
  pub fn validate(&self) -> Result<()> {
    if self.start_date > self.end_date {
      return Err(Error::InvalidDateRange {
        start: self.start_date,
        end:   self.end_date,
      });
    }
    Ok(())
  }
}

/// Outcome of [`decide_leave`](crate::store::WorkforceStore::decide_leave).
/// `days_used` is present only for approvals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecidedLeave {
  pub leave_id:  Uuid,
  pub status:    LeaveStatus,
  pub days_used: Option<u32>,
}

/// A request joined with its catalog name, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestView {
  pub leave_id:      Uuid,
  pub employee_id:   Uuid,
  pub leave_type_id: Uuid,
  pub leave_type:    String,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub reason:        Option<String>,
  pub status:        LeaveStatus,
  pub applied_at:    DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn request(start: NaiveDate, end: NaiveDate) -> LeaveRequest {
    LeaveRequest {
      leave_id:      Uuid::new_v4(),
      employee_id:   Uuid::new_v4(),
      leave_type_id: Uuid::new_v4(),
      start_date:    start,
      end_date:      end,
      reason:        None,
      status:        LeaveStatus::Pending,
      applied_at:    Utc::now(),
    }
  }

  #[test]
  fn days_is_inclusive_of_both_endpoints() {
    assert_eq!(request(date(2024, 3, 10), date(2024, 3, 12)).days(), 3);
    assert_eq!(request(date(2024, 3, 10), date(2024, 3, 10)).days(), 1);
  }

  #[test]
  fn overlap_at_a_single_shared_day() {
    // [10, 12] and [12, 14] share the 12th.
    assert!(intervals_overlap(
      date(2024, 3, 10),
      date(2024, 3, 12),
      date(2024, 3, 12),
      date(2024, 3, 14),
    ));
    // [10, 12] and [13, 14] do not touch.
    assert!(!intervals_overlap(
      date(2024, 3, 10),
      date(2024, 3, 12),
      date(2024, 3, 13),
      date(2024, 3, 14),
    ));
  }

  #[test]
  fn validate_rejects_inverted_range() {
    let bad = NewLeaveRequest {
      employee_id:   Uuid::new_v4(),
      leave_type_id: Uuid::new_v4(),
      start_date:    date(2024, 3, 12),
      end_date:      date(2024, 3, 10),
      reason:        None,
    };
    assert!(matches!(bad.validate(), Err(Error::InvalidDateRange { .. })));
  }

  #[test]
  fn remaining_is_total_minus_used() {
    let balance = LeaveBalance {
      employee_id:   Uuid::new_v4(),
      leave_type_id: Uuid::new_v4(),
      total_days:    12,
      used_days:     10,
    };
    assert_eq!(balance.remaining(), 2);
  }
}
