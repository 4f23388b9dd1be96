//! Error taxonomy for the tally engine.
//!
//! Every variant maps to exactly one [`ErrorKind`]; the HTTP layer maps
//! kinds to status codes. The variant message is the human-readable reason,
//! the kind is the machine-checkable half of the contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::leave::LeaveStatus;

/// Machine-checkable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  Validation,
  NotFound,
  Conflict,
  Authorization,
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  // ── Validation ────────────────────────────────────────────────────────

  #[error("start_date {start} is after end_date {end}")]
  InvalidDateRange { start: NaiveDate, end: NaiveDate },

  #[error("{0} is not a valid calendar month")]
  InvalidMonth(u32),

  #[error("base salary {0} must not be negative")]
  NegativeSalary(Decimal),

  #[error("employee name must not be empty")]
  EmptyName,

  // ── Not found ─────────────────────────────────────────────────────────

  #[error("employee not found or inactive: {0}")]
  EmployeeNotFound(Uuid),

  #[error("leave type not found: {0}")]
  LeaveTypeNotFound(Uuid),

  #[error("leave request not found: {0}")]
  LeaveRequestNotFound(Uuid),

  #[error("no leave balance for employee {employee_id}, leave type {leave_type_id}")]
  BalanceNotFound {
    employee_id:   Uuid,
    leave_type_id: Uuid,
  },

  #[error("not checked in on {0}")]
  NotCheckedIn(NaiveDate),

  // ── Conflict ──────────────────────────────────────────────────────────

  #[error("already checked in on {0}")]
  AlreadyCheckedIn(NaiveDate),

  #[error("already checked out on {0}")]
  AlreadyCheckedOut(NaiveDate),

  #[error("leave request {existing} overlaps {start}..={end}")]
  OverlappingLeave {
    existing: Uuid,
    start:    NaiveDate,
    end:      NaiveDate,
  },

  #[error("attendance already recorded on {0}; cannot claim leave for that day")]
  PresentOnLeaveStart(NaiveDate),

  #[error("insufficient leave balance: {requested} days requested, {remaining} remaining")]
  InsufficientBalance { requested: u32, remaining: u32 },

  #[error("leave request {leave_id} is already {status}")]
  LeaveAlreadyDecided {
    leave_id: Uuid,
    status:   LeaveStatus,
  },

  #[error("payroll already generated for employee {employee_id}, period {month}/{year}")]
  PayrollAlreadyGenerated {
    employee_id: Uuid,
    month:       u32,
    year:        i32,
  },

  // ── Authorization ─────────────────────────────────────────────────────

  #[error("operation requires the admin role")]
  AdminOnly,

  // ── Internal ──────────────────────────────────────────────────────────

  #[error("storage error: {0}")]
  Storage(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::InvalidDateRange { .. }
      | Error::InvalidMonth(_)
      | Error::NegativeSalary(_)
      | Error::EmptyName => ErrorKind::Validation,

      Error::EmployeeNotFound(_)
      | Error::LeaveTypeNotFound(_)
      | Error::LeaveRequestNotFound(_)
      | Error::BalanceNotFound { .. }
      | Error::NotCheckedIn(_) => ErrorKind::NotFound,

      Error::AlreadyCheckedIn(_)
      | Error::AlreadyCheckedOut(_)
      | Error::OverlappingLeave { .. }
      | Error::PresentOnLeaveStart(_)
      | Error::InsufficientBalance { .. }
      | Error::LeaveAlreadyDecided { .. }
      | Error::PayrollAlreadyGenerated { .. } => ErrorKind::Conflict,

      Error::AdminOnly => ErrorKind::Authorization,

      Error::Storage(_) => ErrorKind::Internal,
    }
  }

  /// Wrap an opaque storage-layer failure.
  pub fn storage(e: impl std::fmt::Display) -> Self {
    Error::Storage(e.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
