//! The `WorkforceStore` trait.
//!
//! Implemented by storage backends (e.g. `tally-store-sqlite`). Higher
//! layers depend on this abstraction, not on any concrete backend.
//!
//! Every check-then-act sequence named in a method's contract (duplicate
//! check-in, balance check and increment, payroll duplicate check) must be
//! atomic in the implementation; the listed failures are part of the
//! contract, not best-effort.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Result,
  attendance::{AttendanceRecord, AttendanceStatus, MonthlySummary},
  employee::{Employee, NewEmployee},
  leave::{
    DecidedLeave, LeaveBalanceEntry, LeaveDecision, LeaveRequest,
    LeaveRequestView, LeaveType, NewLeaveRequest, NewLeaveType,
  },
  payroll::{PayrollRecord, PayrollRunOutcome},
  period::Period,
};

pub trait WorkforceStore: Send + Sync {
  // ── Directory ─────────────────────────────────────────────────────────

  /// Onboard an employee. Seeds one leave-balance row per catalog type
  /// (`total_days = default_days`, `used_days = 0`) in the same
  /// transaction as the employee insert.
  fn add_employee(
    &self,
    input: NewEmployee,
  ) -> impl Future<Output = Result<Employee>> + Send + '_;

  /// Retrieve an employee by id, active or not. Returns `None` if unknown.
  fn get_employee(
    &self,
    employee_id: Uuid,
  ) -> impl Future<Output = Result<Option<Employee>>> + Send + '_;

  fn list_active_employees(
    &self,
  ) -> impl Future<Output = Result<Vec<Employee>>> + Send + '_;

  /// Soft-delete: the employee stops participating in every operation.
  fn deactivate_employee(
    &self,
    employee_id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Seed the leave-type catalog, idempotently by name. Returns the full
  /// catalog afterwards.
  fn seed_leave_types(
    &self,
    types: Vec<NewLeaveType>,
  ) -> impl Future<Output = Result<Vec<LeaveType>>> + Send + '_;

  fn list_leave_types(
    &self,
  ) -> impl Future<Output = Result<Vec<LeaveType>>> + Send + '_;

  // ── Attendance ledger ─────────────────────────────────────────────────

  /// Record a check-in for the calendar day of `now`. Fails `Conflict` if
  /// a record for that day already exists.
  fn check_in(
    &self,
    employee_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<AttendanceRecord>> + Send + '_;

  /// Record a check-out for the calendar day of `now`, deriving
  /// `total_hours`. Fails `NotFound` without a prior check-in and
  /// `Conflict` if already checked out.
  fn check_out(
    &self,
    employee_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<AttendanceRecord>> + Send + '_;

  fn attendance_status(
    &self,
    employee_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<AttendanceStatus>> + Send + '_;

  /// All records, optionally restricted to one month, newest first.
  fn attendance_history(
    &self,
    employee_id: Uuid,
    period: Option<Period>,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>>> + Send + '_;

  fn monthly_summary(
    &self,
    employee_id: Uuid,
    period: Period,
  ) -> impl Future<Output = Result<MonthlySummary>> + Send + '_;

  // ── Leave ledger ──────────────────────────────────────────────────────

  /// Validate and insert a `pending` request. Fails `Conflict` on an
  /// overlapping non-rejected request or attendance on the start date.
  fn apply_leave(
    &self,
    input: NewLeaveRequest,
  ) -> impl Future<Output = Result<LeaveRequest>> + Send + '_;

  /// Apply an admin decision to a pending request. Approval checks and
  /// increments the balance atomically; both end states are terminal.
  fn decide_leave(
    &self,
    leave_id: Uuid,
    decision: LeaveDecision,
  ) -> impl Future<Output = Result<DecidedLeave>> + Send + '_;

  fn leave_balances(
    &self,
    employee_id: Uuid,
  ) -> impl Future<Output = Result<Vec<LeaveBalanceEntry>>> + Send + '_;

  /// Requests newest first; all employees when `employee_id` is `None`.
  fn list_leave_requests(
    &self,
    employee_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<LeaveRequestView>>> + Send + '_;

  // ── Payroll engine ────────────────────────────────────────────────────

  /// Compute and persist the payroll record for one period. Fails
  /// `Conflict` if the period already has one and `NotFound` if the
  /// employee is missing or inactive.
  fn generate_payroll(
    &self,
    employee_id: Uuid,
    period: Period,
  ) -> impl Future<Output = Result<PayrollRecord>> + Send + '_;

  /// Run generation for every active employee. Per-employee failures and
  /// already-generated periods are reported in the outcome; they never
  /// abort the rest of the run.
  fn generate_payroll_for_all(
    &self,
    period: Period,
  ) -> impl Future<Output = Result<PayrollRunOutcome>> + Send + '_;

  fn payroll_history(
    &self,
    employee_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PayrollRecord>>> + Send + '_;

  fn all_payroll_records(
    &self,
  ) -> impl Future<Output = Result<Vec<PayrollRecord>>> + Send + '_;
}
