//! [`SqliteStore`] — the SQLite implementation of [`WorkforceStore`].
//!
//! Every check-then-act sequence runs inside a single transaction in one
//! `conn.call` closure. Domain failures raised inside a closure travel out
//! through [`tokio_rusqlite::Error::Other`] and are unwrapped back into
//! [`tally_core::Error`] by [`call_error`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_core::{
  Error, Result,
  attendance::{
    AttendanceRecord, AttendanceStatus, MonthlySummary, elapsed_hours,
  },
  employee::{Employee, NewEmployee},
  leave::{
    DecidedLeave, LeaveBalanceEntry, LeaveDecision, LeaveRequest,
    LeaveRequestView, LeaveStatus, LeaveType, NewLeaveRequest, NewLeaveType,
  },
  payroll::{
    GeneratedPayroll, PayrollFailure, PayrollRecord, PayrollRunOutcome,
    compute_pay,
  },
  period::Period,
  store::WorkforceStore,
};

use crate::{
  encode::{
    RawAttendance, RawEmployee, RawLeaveRequest, RawLeaveType, RawPayroll,
    decode_date, decode_decimal, decode_dt, decode_leave_status, decode_uuid,
    encode_date, encode_decimal, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Error plumbing ──────────────────────────────────────────────────────────

/// Carry a domain error out of a `conn.call` closure.
fn domain(e: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Unwrap a closure failure back into the domain error it carries, or wrap
/// genuine database failures as [`Error::Storage`].
fn call_error(e: tokio_rusqlite::Error) -> Error {
  match e {
    tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
      Ok(e) => *e,
      Err(other) => Error::storage(other),
    },
    other => Error::storage(other),
  }
}

/// Fail with `EmployeeNotFound` unless the employee exists and is active.
fn require_active_employee(
  conn: &rusqlite::Connection,
  id_str: &str,
  employee_id: Uuid,
) -> Result<(), tokio_rusqlite::Error> {
  let active: Option<bool> = conn
    .query_row(
      "SELECT is_active FROM employees WHERE employee_id = ?1",
      rusqlite::params![id_str],
      |r| r.get(0),
    )
    .optional()?;

  match active {
    Some(true) => Ok(()),
    _ => Err(domain(Error::EmployeeNotFound(employee_id))),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tally workforce store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(call_error)
  }
}

// ─── WorkforceStore impl ─────────────────────────────────────────────────────

impl WorkforceStore for SqliteStore {
  // ── Directory ─────────────────────────────────────────────────────────────

  async fn add_employee(&self, input: NewEmployee) -> Result<Employee> {
    input.validate()?;

    let employee = Employee {
      employee_id: Uuid::new_v4(),
      name:        input.name.trim().to_owned(),
      base_salary: input.base_salary,
      is_active:   true,
      joined_at:   input.joined_at.unwrap_or_else(|| Utc::now().date_naive()),
    };

    let id_str     = encode_uuid(employee.employee_id);
    let name       = employee.name.clone();
    let salary_str = encode_decimal(employee.base_salary);
    let joined_str = encode_date(employee.joined_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO employees (employee_id, name, base_salary, joined_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, salary_str, joined_str],
        )?;

        // Balance seeding is part of the onboarding transaction: either the
        // employee exists with a full set of balance rows, or not at all.
        let types: Vec<(String, u32)> = {
          let mut stmt =
            tx.prepare("SELECT leave_type_id, default_days FROM leave_types")?;
          let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;
          rows
        };
        for (type_id, default_days) in types {
          tx.execute(
            "INSERT INTO leave_balances (employee_id, leave_type_id, total_days)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![id_str, type_id, default_days],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(call_error)?;

    Ok(employee)
  }

  async fn get_employee(&self, employee_id: Uuid) -> Result<Option<Employee>> {
    let id_str = encode_uuid(employee_id);

    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT employee_id, name, base_salary, is_active, joined_at
               FROM employees WHERE employee_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawEmployee {
                  employee_id: row.get(0)?,
                  name:        row.get(1)?,
                  base_salary: row.get(2)?,
                  is_active:   row.get(3)?,
                  joined_at:   row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(call_error)?;

    raw.map(RawEmployee::into_employee).transpose()
  }

  async fn list_active_employees(&self) -> Result<Vec<Employee>> {
    let raws: Vec<RawEmployee> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT employee_id, name, base_salary, is_active, joined_at
           FROM employees WHERE is_active = 1 ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEmployee {
              employee_id: row.get(0)?,
              name:        row.get(1)?,
              base_salary: row.get(2)?,
              is_active:   row.get(3)?,
              joined_at:   row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  async fn deactivate_employee(&self, employee_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(employee_id);

    self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE employees SET is_active = 0 WHERE employee_id = ?1",
          rusqlite::params![id_str],
        )?;
        if changed == 0 {
          return Err(domain(Error::EmployeeNotFound(employee_id)));
        }
        Ok(())
      })
      .await
      .map_err(call_error)
  }

  async fn seed_leave_types(
    &self,
    types: Vec<NewLeaveType>,
  ) -> Result<Vec<LeaveType>> {
    let raws: Vec<RawLeaveType> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        for t in &types {
          tx.execute(
            "INSERT INTO leave_types (leave_type_id, name, default_days)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO NOTHING",
            rusqlite::params![
              encode_uuid(Uuid::new_v4()),
              t.name,
              t.default_days
            ],
          )?;
        }

        let rows = {
          let mut stmt = tx.prepare(
            "SELECT leave_type_id, name, default_days
             FROM leave_types ORDER BY name",
          )?;
          stmt
            .query_map([], |row| {
              Ok(RawLeaveType {
                leave_type_id: row.get(0)?,
                name:          row.get(1)?,
                default_days:  row.get(2)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawLeaveType::into_leave_type).collect()
  }

  async fn list_leave_types(&self) -> Result<Vec<LeaveType>> {
    let raws: Vec<RawLeaveType> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT leave_type_id, name, default_days
           FROM leave_types ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLeaveType {
              leave_type_id: row.get(0)?,
              name:          row.get(1)?,
              default_days:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawLeaveType::into_leave_type).collect()
  }

  // ── Attendance ledger ─────────────────────────────────────────────────────

  async fn check_in(
    &self,
    employee_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<AttendanceRecord> {
    let date = now.date_naive();
    let emp_str  = encode_uuid(employee_id);
    let date_str = encode_date(date);
    let at_str   = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        require_active_employee(&tx, &emp_str, employee_id)?;

        let exists: Option<i64> = tx
          .query_row(
            "SELECT 1 FROM attendance WHERE employee_id = ?1 AND date = ?2",
            rusqlite::params![emp_str, date_str],
            |r| r.get(0),
          )
          .optional()?;
        if exists.is_some() {
          return Err(domain(Error::AlreadyCheckedIn(date)));
        }

        tx.execute(
          "INSERT INTO attendance (employee_id, date, check_in)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![emp_str, date_str, at_str],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(call_error)?;

    Ok(AttendanceRecord {
      employee_id,
      date,
      check_in: now,
      check_out: None,
      total_hours: None,
    })
  }

  async fn check_out(
    &self,
    employee_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<AttendanceRecord> {
    let date = now.date_naive();
    let emp_str  = encode_uuid(employee_id);
    let date_str = encode_date(date);
    let out_str  = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        require_active_employee(&tx, &emp_str, employee_id)?;

        let row: Option<(String, Option<String>)> = tx
          .query_row(
            "SELECT check_in, check_out FROM attendance
             WHERE employee_id = ?1 AND date = ?2",
            rusqlite::params![emp_str, date_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let (in_str, existing_out) = match row {
          Some(r) => r,
          None => return Err(domain(Error::NotCheckedIn(date))),
        };
        if existing_out.is_some() {
          return Err(domain(Error::AlreadyCheckedOut(date)));
        }

        let check_in = decode_dt(&in_str).map_err(domain)?;
        let total_hours = elapsed_hours(check_in, now);

        tx.execute(
          "UPDATE attendance SET check_out = ?3, total_hours = ?4
           WHERE employee_id = ?1 AND date = ?2",
          rusqlite::params![
            emp_str,
            date_str,
            out_str,
            encode_decimal(total_hours)
          ],
        )?;

        tx.commit()?;
        Ok(AttendanceRecord {
          employee_id,
          date,
          check_in,
          check_out: Some(now),
          total_hours: Some(total_hours),
        })
      })
      .await
      .map_err(call_error)
  }

  async fn attendance_status(
    &self,
    employee_id: Uuid,
    date: NaiveDate,
  ) -> Result<AttendanceStatus> {
    let emp_str  = encode_uuid(employee_id);
    let date_str = encode_date(date);

    let raw: Option<RawAttendance> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT employee_id, date, check_in, check_out, total_hours
               FROM attendance WHERE employee_id = ?1 AND date = ?2",
              rusqlite::params![emp_str, date_str],
              |row| {
                Ok(RawAttendance {
                  employee_id: row.get(0)?,
                  date:        row.get(1)?,
                  check_in:    row.get(2)?,
                  check_out:   row.get(3)?,
                  total_hours: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(call_error)?;

    match raw {
      Some(raw) => Ok(AttendanceStatus::from_record(&raw.into_record()?)),
      None => Ok(AttendanceStatus::absent()),
    }
  }

  async fn attendance_history(
    &self,
    employee_id: Uuid,
    period: Option<Period>,
  ) -> Result<Vec<AttendanceRecord>> {
    let emp_str = encode_uuid(employee_id);
    let range = period.map(|p| (encode_date(p.first_day()), encode_date(p.last_day())));

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawAttendance {
            employee_id: row.get(0)?,
            date:        row.get(1)?,
            check_in:    row.get(2)?,
            check_out:   row.get(3)?,
            total_hours: row.get(4)?,
          })
        };

        let rows = if let Some((first, last)) = range {
          let mut stmt = conn.prepare(
            "SELECT employee_id, date, check_in, check_out, total_hours
             FROM attendance
             WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date DESC",
          )?;
          stmt
            .query_map(rusqlite::params![emp_str, first, last], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT employee_id, date, check_in, check_out, total_hours
             FROM attendance WHERE employee_id = ?1
             ORDER BY date DESC",
          )?;
          stmt
            .query_map(rusqlite::params![emp_str], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  async fn monthly_summary(
    &self,
    employee_id: Uuid,
    period: Period,
  ) -> Result<MonthlySummary> {
    let records = self.attendance_history(employee_id, Some(period)).await?;
    Ok(MonthlySummary::from_records(employee_id, period, &records))
  }

  // ── Leave ledger ──────────────────────────────────────────────────────────

  async fn apply_leave(&self, input: NewLeaveRequest) -> Result<LeaveRequest> {
    input.validate()?;

    let request = LeaveRequest {
      leave_id:      Uuid::new_v4(),
      employee_id:   input.employee_id,
      leave_type_id: input.leave_type_id,
      start_date:    input.start_date,
      end_date:      input.end_date,
      reason:        input.reason,
      status:        LeaveStatus::Pending,
      applied_at:    Utc::now(),
    };

    let leave_str  = encode_uuid(request.leave_id);
    let emp_str    = encode_uuid(request.employee_id);
    let type_str   = encode_uuid(request.leave_type_id);
    let start_str  = encode_date(request.start_date);
    let end_str    = encode_date(request.end_date);
    let reason     = request.reason.clone();
    let at_str     = encode_dt(request.applied_at);
    let (employee_id, leave_type_id) = (request.employee_id, request.leave_type_id);
    let (start, end) = (request.start_date, request.end_date);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        require_active_employee(&tx, &emp_str, employee_id)?;

        let type_exists: Option<i64> = tx
          .query_row(
            "SELECT 1 FROM leave_types WHERE leave_type_id = ?1",
            rusqlite::params![type_str],
            |r| r.get(0),
          )
          .optional()?;
        if type_exists.is_none() {
          return Err(domain(Error::LeaveTypeNotFound(leave_type_id)));
        }

        // Overlap against every non-rejected request of this employee:
        // existing.start <= new.end AND existing.end >= new.start.
        let overlapping: Option<String> = tx
          .query_row(
            "SELECT leave_id FROM leave_requests
             WHERE employee_id = ?1 AND status != 'rejected'
               AND start_date <= ?2 AND end_date >= ?3
             LIMIT 1",
            rusqlite::params![emp_str, end_str, start_str],
            |r| r.get(0),
          )
          .optional()?;
        if let Some(existing) = overlapping {
          let existing = decode_uuid(&existing).map_err(domain)?;
          return Err(domain(Error::OverlappingLeave { existing, start, end }));
        }

        // A day already marked present cannot retroactively become leave.
        let present: Option<i64> = tx
          .query_row(
            "SELECT 1 FROM attendance WHERE employee_id = ?1 AND date = ?2",
            rusqlite::params![emp_str, start_str],
            |r| r.get(0),
          )
          .optional()?;
        if present.is_some() {
          return Err(domain(Error::PresentOnLeaveStart(start)));
        }

        tx.execute(
          "INSERT INTO leave_requests
             (leave_id, employee_id, leave_type_id, start_date, end_date,
              reason, status, applied_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7)",
          rusqlite::params![
            leave_str, emp_str, type_str, start_str, end_str, reason, at_str
          ],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(call_error)?;

    Ok(request)
  }

  async fn decide_leave(
    &self,
    leave_id: Uuid,
    decision: LeaveDecision,
  ) -> Result<DecidedLeave> {
    let leave_str = encode_uuid(leave_id);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let row: Option<(String, String, String, String, String)> = tx
          .query_row(
            "SELECT employee_id, leave_type_id, start_date, end_date, status
             FROM leave_requests WHERE leave_id = ?1",
            rusqlite::params![leave_str],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
          )
          .optional()?;

        let (emp_str, type_str, start_str, end_str, status_str) = match row {
          Some(r) => r,
          None => return Err(domain(Error::LeaveRequestNotFound(leave_id))),
        };

        let status = decode_leave_status(&status_str).map_err(domain)?;
        if status != LeaveStatus::Pending {
          return Err(domain(Error::LeaveAlreadyDecided { leave_id, status }));
        }

        if decision == LeaveDecision::Rejected {
          tx.execute(
            "UPDATE leave_requests SET status = 'rejected' WHERE leave_id = ?1",
            rusqlite::params![leave_str],
          )?;
          tx.commit()?;
          return Ok(DecidedLeave {
            leave_id,
            status: LeaveStatus::Rejected,
            days_used: None,
          });
        }

        // Approval: balance check and increment, atomically with the status
        // transition.
        let start = decode_date(&start_str).map_err(domain)?;
        let end = decode_date(&end_str).map_err(domain)?;
        let days = ((end - start).num_days() + 1) as u32;

        let balance: Option<(u32, u32)> = tx
          .query_row(
            "SELECT total_days, used_days FROM leave_balances
             WHERE employee_id = ?1 AND leave_type_id = ?2",
            rusqlite::params![emp_str, type_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let (total_days, used_days) = match balance {
          Some(b) => b,
          None => {
            let employee_id = decode_uuid(&emp_str).map_err(domain)?;
            let leave_type_id = decode_uuid(&type_str).map_err(domain)?;
            return Err(domain(Error::BalanceNotFound {
              employee_id,
              leave_type_id,
            }));
          }
        };

        if used_days + days > total_days {
          return Err(domain(Error::InsufficientBalance {
            requested: days,
            remaining: total_days - used_days,
          }));
        }

        tx.execute(
          "UPDATE leave_requests SET status = 'approved' WHERE leave_id = ?1",
          rusqlite::params![leave_str],
        )?;
        tx.execute(
          "UPDATE leave_balances SET used_days = used_days + ?3
           WHERE employee_id = ?1 AND leave_type_id = ?2",
          rusqlite::params![emp_str, type_str, days],
        )?;

        tx.commit()?;
        Ok(DecidedLeave {
          leave_id,
          status: LeaveStatus::Approved,
          days_used: Some(days),
        })
      })
      .await
      .map_err(call_error)
  }

  async fn leave_balances(
    &self,
    employee_id: Uuid,
  ) -> Result<Vec<LeaveBalanceEntry>> {
    let emp_str = encode_uuid(employee_id);

    let rows: Vec<(String, String, u32, u32)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT lb.leave_type_id, lt.name, lb.total_days, lb.used_days
           FROM leave_balances lb
           JOIN leave_types lt ON lt.leave_type_id = lb.leave_type_id
           WHERE lb.employee_id = ?1
           ORDER BY lt.name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![emp_str], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    rows
      .into_iter()
      .map(|(type_str, name, total_days, used_days)| {
        Ok(LeaveBalanceEntry {
          leave_type_id: decode_uuid(&type_str)?,
          leave_type:    name,
          total_days,
          used_days,
          remaining:     total_days - used_days,
        })
      })
      .collect()
  }

  async fn list_leave_requests(
    &self,
    employee_id: Option<Uuid>,
  ) -> Result<Vec<LeaveRequestView>> {
    let emp_str = employee_id.map(encode_uuid);

    let raws: Vec<RawLeaveRequest> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawLeaveRequest {
            leave_id:      row.get(0)?,
            employee_id:   row.get(1)?,
            leave_type_id: row.get(2)?,
            leave_type:    row.get(3)?,
            start_date:    row.get(4)?,
            end_date:      row.get(5)?,
            reason:        row.get(6)?,
            status:        row.get(7)?,
            applied_at:    row.get(8)?,
          })
        };

        let rows = if let Some(emp) = emp_str {
          let mut stmt = conn.prepare(
            "SELECT l.leave_id, l.employee_id, l.leave_type_id, lt.name,
                    l.start_date, l.end_date, l.reason, l.status, l.applied_at
             FROM leave_requests l
             JOIN leave_types lt ON lt.leave_type_id = l.leave_type_id
             WHERE l.employee_id = ?1
             ORDER BY l.applied_at DESC",
          )?;
          stmt
            .query_map(rusqlite::params![emp], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT l.leave_id, l.employee_id, l.leave_type_id, lt.name,
                    l.start_date, l.end_date, l.reason, l.status, l.applied_at
             FROM leave_requests l
             JOIN leave_types lt ON lt.leave_type_id = l.leave_type_id
             ORDER BY l.applied_at DESC",
          )?;
          stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawLeaveRequest::into_view).collect()
  }

  // ── Payroll engine ────────────────────────────────────────────────────────

  async fn generate_payroll(
    &self,
    employee_id: Uuid,
    period: Period,
  ) -> Result<PayrollRecord> {
    let payroll_id = Uuid::new_v4();
    let generated_at = Utc::now();

    let id_str    = encode_uuid(payroll_id);
    let emp_str   = encode_uuid(employee_id);
    let at_str    = encode_dt(generated_at);
    let first_str = encode_date(period.first_day());
    let last_str  = encode_date(period.last_day());
    let (month, year) = (period.month(), period.year());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Duplicate-check-then-insert is atomic here; the UNIQUE constraint
        // on (employee_id, month, year) is the backstop.
        let existing: Option<i64> = tx
          .query_row(
            "SELECT 1 FROM payroll
             WHERE employee_id = ?1 AND month = ?2 AND year = ?3",
            rusqlite::params![emp_str, month, year],
            |r| r.get(0),
          )
          .optional()?;
        if existing.is_some() {
          return Err(domain(Error::PayrollAlreadyGenerated {
            employee_id,
            month,
            year,
          }));
        }

        let salary_str: Option<String> = tx
          .query_row(
            "SELECT base_salary FROM employees
             WHERE employee_id = ?1 AND is_active = 1",
            rusqlite::params![emp_str],
            |r| r.get(0),
          )
          .optional()?;
        let salary_str = match salary_str {
          Some(s) => s,
          None => return Err(domain(Error::EmployeeNotFound(employee_id))),
        };
        let base_salary = decode_decimal(&salary_str).map_err(domain)?;

        // Decimals live in TEXT columns, so the sum happens here rather
        // than in SQL (SUM would coerce to float).
        let hour_strs: Vec<String> = {
          let mut stmt = tx.prepare(
            "SELECT total_hours FROM attendance
             WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
               AND total_hours IS NOT NULL",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![emp_str, first_str, last_str], |r| {
              r.get(0)
            })?
            .collect::<rusqlite::Result<_>>()?;
          rows
        };
        let mut total_hours = Decimal::ZERO;
        for h in &hour_strs {
          total_hours += decode_decimal(h).map_err(domain)?;
        }

        let unpaid_days: u32 = tx.query_row(
          "SELECT COUNT(*) FROM leave_requests
           WHERE employee_id = ?1 AND status = 'approved'
             AND start_date >= ?2 AND start_date <= ?3",
          rusqlite::params![emp_str, first_str, last_str],
          |r| r.get(0),
        )?;

        let pay = compute_pay(base_salary, total_hours, unpaid_days);

        tx.execute(
          "INSERT INTO payroll
             (payroll_id, employee_id, month, year, base_salary, total_hours,
              per_hour_rate, earnings, deductions, net_salary, generated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            emp_str,
            month,
            year,
            encode_decimal(base_salary),
            encode_decimal(pay.total_hours),
            encode_decimal(pay.per_hour_rate),
            encode_decimal(pay.earnings),
            encode_decimal(pay.deductions),
            encode_decimal(pay.net_salary),
            at_str
          ],
        )?;

        tx.commit()?;
        Ok(PayrollRecord {
          payroll_id,
          employee_id,
          month,
          year,
          base_salary,
          total_hours:   pay.total_hours,
          per_hour_rate: pay.per_hour_rate,
          earnings:      pay.earnings,
          deductions:    pay.deductions,
          net_salary:    pay.net_salary,
          generated_at,
        })
      })
      .await
      .map_err(call_error)
  }

  async fn generate_payroll_for_all(
    &self,
    period: Period,
  ) -> Result<PayrollRunOutcome> {
    let employees = self.list_active_employees().await?;
    let mut outcome = PayrollRunOutcome::default();

    // One transaction per employee: a skip or failure never blocks or
    // rolls back the rest of the run.
    for employee in employees {
      match self.generate_payroll(employee.employee_id, period).await {
        Ok(record) => outcome.generated.push(GeneratedPayroll {
          employee_id: employee.employee_id,
          payroll_id:  record.payroll_id,
          net_salary:  record.net_salary,
        }),
        Err(Error::PayrollAlreadyGenerated { .. }) => {
          outcome.skipped.push(employee.employee_id);
        }
        Err(e) => {
          tracing::warn!(
            employee_id = %employee.employee_id,
            error = %e,
            "payroll generation failed for employee; continuing run"
          );
          outcome.failed.push(PayrollFailure {
            employee_id: employee.employee_id,
            reason:      e.to_string(),
          });
        }
      }
    }

    Ok(outcome)
  }

  async fn payroll_history(
    &self,
    employee_id: Uuid,
  ) -> Result<Vec<PayrollRecord>> {
    let emp_str = encode_uuid(employee_id);

    let raws: Vec<RawPayroll> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT payroll_id, employee_id, month, year, base_salary,
                  total_hours, per_hour_rate, earnings, deductions,
                  net_salary, generated_at
           FROM payroll WHERE employee_id = ?1
           ORDER BY generated_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![emp_str], map_payroll_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawPayroll::into_record).collect()
  }

  async fn all_payroll_records(&self) -> Result<Vec<PayrollRecord>> {
    let raws: Vec<RawPayroll> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT payroll_id, employee_id, month, year, base_salary,
                  total_hours, per_hour_rate, earnings, deductions,
                  net_salary, generated_at
           FROM payroll
           ORDER BY generated_at DESC",
        )?;
        let rows = stmt
          .query_map([], map_payroll_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(call_error)?;

    raws.into_iter().map(RawPayroll::into_record).collect()
  }
}

fn map_payroll_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPayroll> {
  Ok(RawPayroll {
    payroll_id:    row.get(0)?,
    employee_id:   row.get(1)?,
    month:         row.get(2)?,
    year:          row.get(3)?,
    base_salary:   row.get(4)?,
    total_hours:   row.get(5)?,
    per_hour_rate: row.get(6)?,
    earnings:      row.get(7)?,
    deductions:    row.get(8)?,
    net_salary:    row.get(9)?,
    generated_at:  row.get(10)?,
  })
}
