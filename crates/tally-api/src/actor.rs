//! Principal extractor.
//!
//! Credential verification happens upstream (reverse proxy or gateway); the
//! transport hands us the already-verified principal as two headers:
//! `x-employee-id` (a UUID) and `x-role` (`admin` or `employee`). The
//! extractor turns those into an [`Actor`] once, at the boundary. Missing or
//! malformed headers reject with 401 before any handler runs.

use axum::{extract::FromRequestParts, http::request::Parts};
use tally_core::actor::{Actor, Role};
use uuid::Uuid;

use crate::error::ApiError;

pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";
pub const ROLE_HEADER: &str = "x-role";

/// The verified caller, extracted from the principal headers.
pub struct Caller(pub Actor);

impl std::ops::Deref for Caller {
  type Target = Actor;

  fn deref(&self) -> &Actor {
    &self.0
  }
}

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, ApiError> {
  parts
    .headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized("missing principal header"))
}

impl<S> FromRequestParts<S> for Caller
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let employee_id = Uuid::parse_str(header(parts, EMPLOYEE_ID_HEADER)?)
      .map_err(|_| ApiError::Unauthorized("malformed x-employee-id header"))?;
    let role: Role = header(parts, ROLE_HEADER)?
      .parse()
      .map_err(|()| ApiError::Unauthorized("unknown x-role header"))?;
    Ok(Caller(Actor::new(employee_id, role)))
  }
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request};

  use super::*;

  async fn extract(req: Request<Body>) -> Result<Caller, ApiError> {
    let (mut parts, _) = req.into_parts();
    Caller::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn well_formed_headers_extract() {
    let id = Uuid::new_v4();
    let req = Request::builder()
      .header(EMPLOYEE_ID_HEADER, id.to_string())
      .header(ROLE_HEADER, "admin")
      .body(Body::empty())
      .unwrap();

    let caller = extract(req).await.unwrap();
    assert_eq!(caller.employee_id, id);
    assert!(caller.is_admin());
  }

  #[tokio::test]
  async fn missing_headers_reject() {
    let req = Request::builder().body(Body::empty()).unwrap();
    assert!(matches!(
      extract(req).await,
      Err(ApiError::Unauthorized(_))
    ));
  }

  #[tokio::test]
  async fn malformed_id_rejects() {
    let req = Request::builder()
      .header(EMPLOYEE_ID_HEADER, "not-a-uuid")
      .header(ROLE_HEADER, "employee")
      .body(Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req).await,
      Err(ApiError::Unauthorized(_))
    ));
  }

  #[tokio::test]
  async fn unknown_role_rejects() {
    let req = Request::builder()
      .header(EMPLOYEE_ID_HEADER, Uuid::new_v4().to_string())
      .header(ROLE_HEADER, "root")
      .body(Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req).await,
      Err(ApiError::Unauthorized(_))
    ));
  }
}
