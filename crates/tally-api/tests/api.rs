//! Black-box tests: drive the full router over tower's `oneshot` against an
//! in-memory store, exactly as a deployed client would.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tally_api::api_router;
use tally_core::{leave::NewLeaveType, store::WorkforceStore};
use tally_store_sqlite::SqliteStore;
use tower::ServiceExt;
use uuid::Uuid;

// ─── Harness ─────────────────────────────────────────────────────────────────

async fn app() -> Router {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  store
    .seed_leave_types(vec![
      NewLeaveType {
        name:         "casual".into(),
        default_days: 12,
      },
      NewLeaveType {
        name:         "sick".into(),
        default_days: 10,
      },
    ])
    .await
    .unwrap();
  api_router(Arc::new(store))
}

fn request(
  method: &str,
  uri: &str,
  actor: Option<(Uuid, &str)>,
  body: Option<Value>,
) -> Request<Body> {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some((id, role)) = actor {
    builder = builder
      .header("x-employee-id", id.to_string())
      .header("x-role", role);
  }
  match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let response = app.clone().oneshot(req).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn error_kind(body: &Value) -> &str {
  body["error"]["kind"].as_str().unwrap()
}

fn decimal(body: &Value, field: &str) -> Decimal {
  body[field].as_str().unwrap().parse().unwrap()
}

async fn onboard(app: &Router, admin: Uuid, name: &str, salary: &str) -> Uuid {
  let (status, body) = send(
    app,
    request(
      "POST",
      "/employees",
      Some((admin, "admin")),
      Some(json!({ "name": name, "base_salary": salary, "joined_at": "2023-01-01" })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body["employee_id"].as_str().unwrap().parse().unwrap()
}

// ─── Principal boundary ──────────────────────────────────────────────────────

#[tokio::test]
async fn requests_without_principal_headers_are_unauthorized() {
  let app = app().await;
  let (status, body) = send(&app, request("GET", "/leaves/balance", None, None)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(error_kind(&body), "unauthorized");
}

#[tokio::test]
async fn admin_routes_reject_plain_employees() {
  let app = app().await;
  let employee = Uuid::new_v4();

  for (method, uri) in [
    ("POST", "/payroll/generate-all"),
    ("GET", "/payroll/all"),
    ("GET", "/employees"),
  ] {
    let body = (method == "POST").then(|| json!({ "month": 3, "year": 2024 }));
    let (status, response) =
      send(&app, request(method, uri, Some((employee, "employee")), body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
    assert_eq!(error_kind(&response), "authorization");
  }
}

// ─── Attendance over the wire ────────────────────────────────────────────────

#[tokio::test]
async fn attendance_day_round_trip() {
  let app = app().await;
  let admin = Uuid::new_v4();
  let emp = onboard(&app, admin, "Asha", "26000").await;
  let as_emp = Some((emp, "employee"));

  let (status, _) = send(&app, request("POST", "/attendance/check-in", as_emp, None)).await;
  assert_eq!(status, StatusCode::CREATED);

  // The day is already open.
  let (status, body) = send(&app, request("POST", "/attendance/check-in", as_emp, None)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(error_kind(&body), "conflict");

  let (status, body) = send(&app, request("GET", "/attendance/status", as_emp, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["checked_in"], json!(true));
  assert_eq!(body["checked_out"], json!(false));

  let (status, body) = send(&app, request("POST", "/attendance/check-out", as_emp, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(decimal(&body, "total_hours"), Decimal::ZERO);

  let (status, body) = send(&app, request("GET", "/attendance/history", as_emp, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn history_needs_month_and_year_together() {
  let app = app().await;
  let admin = Uuid::new_v4();
  let emp = onboard(&app, admin, "Asha", "26000").await;

  let (status, body) = send(
    &app,
    request("GET", "/attendance/history?month=3", Some((emp, "employee")), None),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error_kind(&body), "validation");
}

// ─── Leave over the wire ─────────────────────────────────────────────────────

#[tokio::test]
async fn leave_application_decision_and_balance() {
  let app = app().await;
  let admin = Uuid::new_v4();
  let emp = onboard(&app, admin, "Asha", "26000").await;
  let as_emp = Some((emp, "employee"));
  let as_admin = Some((admin, "admin"));

  let (_, types) = send(&app, request("GET", "/leaves/types", as_emp, None)).await;
  let casual = types
    .as_array()
    .unwrap()
    .iter()
    .find(|t| t["name"] == "casual")
    .unwrap();
  let casual_id = casual["leave_type_id"].as_str().unwrap();

  let (status, applied) = send(
    &app,
    request(
      "POST",
      "/leaves",
      as_emp,
      Some(json!({
        "leave_type_id": casual_id,
        "start_date": "2024-03-10",
        "end_date": "2024-03-12",
        "reason": "family visit",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(applied["status"], json!("pending"));
  let leave_id = applied["leave_id"].as_str().unwrap();

  // Overlapping request while the first is pending.
  let (status, body) = send(
    &app,
    request(
      "POST",
      "/leaves",
      as_emp,
      Some(json!({
        "leave_type_id": casual_id,
        "start_date": "2024-03-12",
        "end_date": "2024-03-14",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(error_kind(&body), "conflict");

  // Only an admin may decide.
  let decision_uri = format!("/leaves/{leave_id}/decision");
  let (status, _) = send(
    &app,
    request("POST", &decision_uri, as_emp, Some(json!({ "decision": "approved" }))),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, decided) = send(
    &app,
    request("POST", &decision_uri, as_admin, Some(json!({ "decision": "approved" }))),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(decided["status"], json!("approved"));
  assert_eq!(decided["days_used"], json!(3));

  let (_, balances) = send(&app, request("GET", "/leaves/balance", as_emp, None)).await;
  let casual_balance = balances
    .as_array()
    .unwrap()
    .iter()
    .find(|b| b["leave_type"] == "casual")
    .unwrap();
  assert_eq!(casual_balance["used_days"], json!(3));
  assert_eq!(casual_balance["remaining"], json!(9));

  // Admins list every employee's requests; employees only their own.
  let (_, all) = send(&app, request("GET", "/leaves", as_admin, None)).await;
  assert_eq!(all.as_array().unwrap().len(), 1);
}

// ─── Payroll over the wire ───────────────────────────────────────────────────

#[tokio::test]
async fn payroll_generation_and_listings() {
  let app = app().await;
  let admin = Uuid::new_v4();
  let emp = onboard(&app, admin, "Asha", "26000").await;
  let as_emp = Some((emp, "employee"));
  let as_admin = Some((admin, "admin"));

  let generate = json!({ "employee_id": emp, "month": 3, "year": 2024 });
  let (status, record) = send(
    &app,
    request("POST", "/payroll/generate", as_admin, Some(generate.clone())),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(record["month"], json!(3));
  assert_eq!(decimal(&record, "base_salary"), "26000".parse().unwrap());
  // No attendance recorded for the period.
  assert_eq!(decimal(&record, "net_salary"), Decimal::ZERO);

  // The period is closed now.
  let (status, body) = send(
    &app,
    request("POST", "/payroll/generate", as_admin, Some(generate)),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(error_kind(&body), "conflict");

  let (status, own) = send(&app, request("GET", "/payroll", as_emp, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(own.as_array().unwrap().len(), 1);

  let history_uri = format!("/payroll/history/{emp}");
  let (status, history) = send(&app, request("GET", &history_uri, as_admin, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(history.as_array().unwrap().len(), 1);

  let (status, all) = send(&app, request("GET", "/payroll/all", as_admin, None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_range_month_is_a_validation_error() {
  let app = app().await;
  let admin = Uuid::new_v4();

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/payroll/generate-all",
      Some((admin, "admin")),
      Some(json!({ "month": 13, "year": 2024 })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error_kind(&body), "validation");
}

// ─── Directory over the wire ─────────────────────────────────────────────────

#[tokio::test]
async fn unknown_employee_lookup_is_not_found() {
  let app = app().await;
  let admin = Uuid::new_v4();

  let uri = format!("/employees/{}", Uuid::new_v4());
  let (status, body) = send(&app, request("GET", &uri, Some((admin, "admin")), None)).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(error_kind(&body), "not_found");
}

#[tokio::test]
async fn deactivated_employees_drop_off_the_roster() {
  let app = app().await;
  let admin = Uuid::new_v4();
  let emp = onboard(&app, admin, "Asha", "26000").await;
  let as_admin = Some((admin, "admin"));

  let uri = format!("/employees/{emp}");
  let (status, _) = send(&app, request("DELETE", &uri, as_admin, None)).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, roster) = send(&app, request("GET", "/employees", as_admin, None)).await;
  assert!(roster.as_array().unwrap().is_empty());

  // Attendance for a deactivated employee is refused.
  let (status, body) = send(
    &app,
    request("POST", "/attendance/check-in", Some((emp, "employee")), None),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(error_kind(&body), "not_found");
}
