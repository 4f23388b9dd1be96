//! SQL schema for the tally SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! The UNIQUE constraints are load-bearing: they are the last line of
//! defence for exactly-once daily attendance, one balance row per
//! (employee, type), and idempotent payroll generation.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS employees (
    employee_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    base_salary TEXT NOT NULL,      -- decimal, stored as text
    is_active   INTEGER NOT NULL DEFAULT 1,
    joined_at   TEXT NOT NULL       -- ISO 8601 date
);

-- Immutable catalog; seeded once, idempotently by name.
CREATE TABLE IF NOT EXISTS leave_types (
    leave_type_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    default_days  INTEGER NOT NULL
);

-- At most one record per (employee, day). check_out and total_hours are
-- written exactly once, together.
CREATE TABLE IF NOT EXISTS attendance (
    employee_id TEXT NOT NULL REFERENCES employees(employee_id),
    date        TEXT NOT NULL,
    check_in    TEXT NOT NULL,      -- ISO 8601 UTC
    check_out   TEXT,
    total_hours TEXT,
    PRIMARY KEY (employee_id, date)
);

-- One row per (employee, type), created at onboarding. used_days moves
-- only on approval and can never exceed total_days.
CREATE TABLE IF NOT EXISTS leave_balances (
    employee_id   TEXT NOT NULL REFERENCES employees(employee_id),
    leave_type_id TEXT NOT NULL REFERENCES leave_types(leave_type_id),
    total_days    INTEGER NOT NULL,
    used_days     INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (employee_id, leave_type_id),
    CHECK (used_days >= 0 AND used_days <= total_days)
);

CREATE TABLE IF NOT EXISTS leave_requests (
    leave_id      TEXT PRIMARY KEY,
    employee_id   TEXT NOT NULL REFERENCES employees(employee_id),
    leave_type_id TEXT NOT NULL REFERENCES leave_types(leave_type_id),
    start_date    TEXT NOT NULL,
    end_date      TEXT NOT NULL,
    reason        TEXT,
    status        TEXT NOT NULL DEFAULT 'pending',
    applied_at    TEXT NOT NULL,
    CHECK (start_date <= end_date)
);

-- Append-only payroll ledger; one record per employee per period.
CREATE TABLE IF NOT EXISTS payroll (
    payroll_id    TEXT PRIMARY KEY,
    employee_id   TEXT NOT NULL REFERENCES employees(employee_id),
    month         INTEGER NOT NULL,
    year          INTEGER NOT NULL,
    base_salary   TEXT NOT NULL,
    total_hours   TEXT NOT NULL,
    per_hour_rate TEXT NOT NULL,
    earnings      TEXT NOT NULL,
    deductions    TEXT NOT NULL,
    net_salary    TEXT NOT NULL,
    generated_at  TEXT NOT NULL,
    UNIQUE (employee_id, month, year)
);

CREATE INDEX IF NOT EXISTS leave_requests_employee_idx
    ON leave_requests(employee_id);
CREATE INDEX IF NOT EXISTS leave_requests_status_idx
    ON leave_requests(status);
CREATE INDEX IF NOT EXISTS payroll_employee_idx
    ON payroll(employee_id);

PRAGMA user_version = 1;
";
