//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar days are ISO `YYYY-MM-DD`
//! (which also makes lexicographic range queries correct), decimals and
//! UUIDs are their canonical string forms. Decode failures mean a corrupt
//! row and surface as [`Error::Storage`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tally_core::{
  Error, Result,
  attendance::AttendanceRecord,
  employee::Employee,
  leave::{LeaveRequestView, LeaveStatus, LeaveType},
  payroll::PayrollRecord,
};
use uuid::Uuid;

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| Error::Storage(format!("corrupt uuid {s:?}: {e}")))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Storage(format!("corrupt timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Storage(format!("corrupt date {s:?}: {e}")))
}

pub fn encode_decimal(d: Decimal) -> String {
  d.to_string()
}

pub fn decode_decimal(s: &str) -> Result<Decimal> {
  s.parse()
    .map_err(|e| Error::Storage(format!("corrupt decimal {s:?}: {e}")))
}

pub fn decode_leave_status(s: &str) -> Result<LeaveStatus> {
  match s {
    "pending" => Ok(LeaveStatus::Pending),
    "approved" => Ok(LeaveStatus::Approved),
    "rejected" => Ok(LeaveStatus::Rejected),
    other => Err(Error::Storage(format!("unknown leave status {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `employees` row.
pub struct RawEmployee {
  pub employee_id: String,
  pub name:        String,
  pub base_salary: String,
  pub is_active:   bool,
  pub joined_at:   String,
}

impl RawEmployee {
  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      employee_id: decode_uuid(&self.employee_id)?,
      name:        self.name,
      base_salary: decode_decimal(&self.base_salary)?,
      is_active:   self.is_active,
      joined_at:   decode_date(&self.joined_at)?,
    })
  }
}

pub struct RawAttendance {
  pub employee_id: String,
  pub date:        String,
  pub check_in:    String,
  pub check_out:   Option<String>,
  pub total_hours: Option<String>,
}

impl RawAttendance {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      employee_id: decode_uuid(&self.employee_id)?,
      date:        decode_date(&self.date)?,
      check_in:    decode_dt(&self.check_in)?,
      check_out:   self.check_out.as_deref().map(decode_dt).transpose()?,
      total_hours: self.total_hours.as_deref().map(decode_decimal).transpose()?,
    })
  }
}

pub struct RawLeaveType {
  pub leave_type_id: String,
  pub name:          String,
  pub default_days:  u32,
}

impl RawLeaveType {
  pub fn into_leave_type(self) -> Result<LeaveType> {
    Ok(LeaveType {
      leave_type_id: decode_uuid(&self.leave_type_id)?,
      name:          self.name,
      default_days:  self.default_days,
    })
  }
}

/// A `leave_requests` row joined with the catalog name.
pub struct RawLeaveRequest {
  pub leave_id:      String,
  pub employee_id:   String,
  pub leave_type_id: String,
  pub leave_type:    String,
  pub start_date:    String,
  pub end_date:      String,
  pub reason:        Option<String>,
  pub status:        String,
  pub applied_at:    String,
}

impl RawLeaveRequest {
  pub fn into_view(self) -> Result<LeaveRequestView> {
    Ok(LeaveRequestView {
      leave_id:      decode_uuid(&self.leave_id)?,
      employee_id:   decode_uuid(&self.employee_id)?,
      leave_type_id: decode_uuid(&self.leave_type_id)?,
      leave_type:    self.leave_type,
      start_date:    decode_date(&self.start_date)?,
      end_date:      decode_date(&self.end_date)?,
      reason:        self.reason,
      status:        decode_leave_status(&self.status)?,
      applied_at:    decode_dt(&self.applied_at)?,
    })
  }
}

pub struct RawPayroll {
  pub payroll_id:    String,
  pub employee_id:   String,
  pub month:         u32,
  pub year:          i32,
  pub base_salary:   String,
  pub total_hours:   String,
  pub per_hour_rate: String,
  pub earnings:      String,
  pub deductions:    String,
  pub net_salary:    String,
  pub generated_at:  String,
}

impl RawPayroll {
  pub fn into_record(self) -> Result<PayrollRecord> {
    Ok(PayrollRecord {
      payroll_id:    decode_uuid(&self.payroll_id)?,
      employee_id:   decode_uuid(&self.employee_id)?,
      month:         self.month,
      year:          self.year,
      base_salary:   decode_decimal(&self.base_salary)?,
      total_hours:   decode_decimal(&self.total_hours)?,
      per_hour_rate: decode_decimal(&self.per_hour_rate)?,
      earnings:      decode_decimal(&self.earnings)?,
      deductions:    decode_decimal(&self.deductions)?,
      net_salary:    decode_decimal(&self.net_salary)?,
      generated_at:  decode_dt(&self.generated_at)?,
    })
  }
}
