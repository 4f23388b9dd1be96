//! Handlers for `/payroll` endpoints.
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/payroll/generate` | admin |
//! | `POST` | `/payroll/generate-all` | admin |
//! | `GET`  | `/payroll` | self |
//! | `GET`  | `/payroll/history/{employee_id}` | admin |
//! | `GET`  | `/payroll/all` | admin |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tally_core::{
  payroll::{PayrollRecord, PayrollRunOutcome},
  period::Period,
  store::WorkforceStore,
};
use uuid::Uuid;

use crate::{actor::Caller, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
  pub employee_id: Uuid,
  pub month:       u32,
  pub year:        i32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateAllBody {
  pub month: u32,
  pub year:  i32,
}

/// `POST /payroll/generate` — body: `{"employee_id":..., "month":3, "year":2024}`
pub async fn generate<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<GenerateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let period = Period::new(body.month, body.year)?;
  let record = store.generate_payroll(body.employee_id, period).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /payroll/generate-all` — one bulk run for every active employee.
pub async fn generate_all<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<GenerateAllBody>,
) -> Result<Json<PayrollRunOutcome>, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let period = Period::new(body.month, body.year)?;
  let outcome = store.generate_payroll_for_all(period).await?;
  Ok(Json(outcome))
}

/// `GET /payroll` — the caller's own records.
pub async fn own_history<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<PayrollRecord>>, ApiError>
where
  S: WorkforceStore,
{
  let records = store.payroll_history(caller.employee_id).await?;
  Ok(Json(records))
}

/// `GET /payroll/history/:employee_id`
pub async fn history<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<PayrollRecord>>, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let records = store.payroll_history(employee_id).await?;
  Ok(Json(records))
}

/// `GET /payroll/all`
pub async fn all<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<PayrollRecord>>, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let records = store.all_payroll_records().await?;
  Ok(Json(records))
}
