//! Handlers for `/leaves` endpoints.
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/leaves` | self |
//! | `GET`  | `/leaves` | own requests; all of them for admins |
//! | `GET`  | `/leaves/balance` | self |
//! | `GET`  | `/leaves/types` | any caller |
//! | `POST` | `/leaves/{id}/decision` | admin |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tally_core::{
  leave::{
    DecidedLeave, LeaveBalanceEntry, LeaveDecision, LeaveRequestView,
    LeaveType, NewLeaveRequest,
  },
  store::WorkforceStore,
};
use uuid::Uuid;

use crate::{actor::Caller, error::ApiError};

// ─── Apply ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApplyBody {
  pub leave_type_id: Uuid,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  pub reason:        Option<String>,
}

/// `POST /leaves` — always on the caller's own behalf.
pub async fn apply<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<ApplyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkforceStore,
{
  let request = store
    .apply_leave(NewLeaveRequest {
      employee_id:   caller.employee_id,
      leave_type_id: body.leave_type_id,
      start_date:    body.start_date,
      end_date:      body.end_date,
      reason:        body.reason,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(request)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /leaves` — an admin sees every employee's requests.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<LeaveRequestView>>, ApiError>
where
  S: WorkforceStore,
{
  let filter = if caller.is_admin() {
    None
  } else {
    Some(caller.employee_id)
  };
  let requests = store.list_leave_requests(filter).await?;
  Ok(Json(requests))
}

// ─── Balances & catalog ───────────────────────────────────────────────────────

/// `GET /leaves/balance`
pub async fn balances<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<LeaveBalanceEntry>>, ApiError>
where
  S: WorkforceStore,
{
  let balances = store.leave_balances(caller.employee_id).await?;
  Ok(Json(balances))
}

/// `GET /leaves/types`
pub async fn types<S>(
  State(store): State<Arc<S>>,
  _caller: Caller,
) -> Result<Json<Vec<LeaveType>>, ApiError>
where
  S: WorkforceStore,
{
  let types = store.list_leave_types().await?;
  Ok(Json(types))
}

// ─── Decide ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
  pub decision: LeaveDecision,
}

/// `POST /leaves/:id/decision` — body: `{"decision":"approved"}`
pub async fn decide<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(leave_id): Path<Uuid>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<DecidedLeave>, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let decided = store.decide_leave(leave_id, body.decision).await?;
  Ok(Json(decided))
}
