//! JSON REST API for tally.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tally_core::store::WorkforceStore`]. TLS and credential verification are
//! the caller's responsibility; requests arrive with the verified principal
//! in `x-employee-id` and `x-role` headers.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(store.clone()))
//! ```

pub mod actor;
pub mod attendance;
pub mod employees;
pub mod error;
pub mod leave;
pub mod payroll;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::store::WorkforceStore;

pub use actor::Caller;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WorkforceStore + 'static,
{
  Router::new()
    // Attendance
    .route("/attendance/check-in", post(attendance::check_in::<S>))
    .route("/attendance/check-out", post(attendance::check_out::<S>))
    .route("/attendance/status", get(attendance::status::<S>))
    .route("/attendance/history", get(attendance::history::<S>))
    .route("/attendance/summary", get(attendance::summary::<S>))
    // Leave
    .route("/leaves", post(leave::apply::<S>).get(leave::list::<S>))
    .route("/leaves/balance", get(leave::balances::<S>))
    .route("/leaves/types", get(leave::types::<S>))
    .route("/leaves/{id}/decision", post(leave::decide::<S>))
    // Payroll
    .route("/payroll", get(payroll::own_history::<S>))
    .route("/payroll/generate", post(payroll::generate::<S>))
    .route("/payroll/generate-all", post(payroll::generate_all::<S>))
    .route("/payroll/history/{employee_id}", get(payroll::history::<S>))
    .route("/payroll/all", get(payroll::all::<S>))
    // Employees
    .route("/employees", post(employees::create::<S>).get(employees::list::<S>))
    .route(
      "/employees/{id}",
      get(employees::get_one::<S>).delete(employees::deactivate::<S>),
    )
    .with_state(store)
}
