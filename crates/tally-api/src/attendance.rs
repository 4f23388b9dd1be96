//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/attendance/check-in` | One per calendar day |
//! | `POST` | `/attendance/check-out` | Sets `total_hours` |
//! | `GET`  | `/attendance/status` | Today's record, if any |
//! | `GET`  | `/attendance/history` | Optional `?month=&year=` |
//! | `GET`  | `/attendance/summary?month=&year=` | Monthly aggregate |
//!
//! All routes act on the caller's own ledger.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tally_core::{
  attendance::{AttendanceRecord, AttendanceStatus, MonthlySummary},
  period::Period,
  store::WorkforceStore,
};

use crate::{actor::Caller, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
  pub month: u32,
  pub year:  i32,
}

impl PeriodParams {
  pub fn period(&self) -> Result<Period, ApiError> {
    Ok(Period::new(self.month, self.year)?)
  }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub month: Option<u32>,
  pub year:  Option<i32>,
}

impl HistoryParams {
  pub fn period(&self) -> Result<Option<Period>, ApiError> {
    match (self.month, self.year) {
      (Some(month), Some(year)) => Ok(Some(Period::new(month, year)?)),
      (None, None) => Ok(None),
      _ => Err(ApiError::BadRequest("month and year must be given together")),
    }
  }
}

/// `POST /attendance/check-in`
pub async fn check_in<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkforceStore,
{
  let record = store.check_in(caller.employee_id, Utc::now()).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /attendance/check-out`
pub async fn check_out<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkforceStore,
{
  let record = store.check_out(caller.employee_id, Utc::now()).await?;
  Ok(Json(json!({
    "date": record.date,
    "total_hours": record.total_hours,
  })))
}

/// `GET /attendance/status`
pub async fn status<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<AttendanceStatus>, ApiError>
where
  S: WorkforceStore,
{
  let status = store
    .attendance_status(caller.employee_id, Utc::now().date_naive())
    .await?;
  Ok(Json(status))
}

/// `GET /attendance/history[?month=<m>&year=<y>]`
pub async fn history<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: WorkforceStore,
{
  let records = store
    .attendance_history(caller.employee_id, params.period()?)
    .await?;
  Ok(Json(records))
}

/// `GET /attendance/summary?month=<m>&year=<y>`
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Query(params): Query<PeriodParams>,
) -> Result<Json<MonthlySummary>, ApiError>
where
  S: WorkforceStore,
{
  let summary = store
    .monthly_summary(caller.employee_id, params.period()?)
    .await?;
  Ok(Json(summary))
}
