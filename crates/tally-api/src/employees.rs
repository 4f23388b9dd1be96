//! Handlers for `/employees` endpoints. All admin-only.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/employees` | Onboard; seeds leave balances |
//! | `GET`    | `/employees` | Active employees only |
//! | `GET`    | `/employees/{id}` | 404 if unknown |
//! | `DELETE` | `/employees/{id}` | Soft delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use tally_core::{
  Error,
  employee::{Employee, NewEmployee},
  store::WorkforceStore,
};
use uuid::Uuid;

use crate::{actor::Caller, error::ApiError};

/// `POST /employees` — body: `{"name":..., "base_salary":"26000", "joined_at":...}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewEmployee>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let employee = store.add_employee(body).await?;
  Ok((StatusCode::CREATED, Json(employee)))
}

/// `GET /employees`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let employees = store.list_active_employees().await?;
  Ok(Json(employees))
}

/// `GET /employees/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  let employee = store
    .get_employee(id)
    .await?
    .ok_or(Error::EmployeeNotFound(id))?;
  Ok(Json(employee))
}

/// `DELETE /employees/:id`
pub async fn deactivate<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WorkforceStore,
{
  caller.require_admin()?;
  store.deactivate_employee(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
