//! Employee directory types.
//!
//! Directory CRUD proper lives outside the engine; these types cover the
//! slice the ledgers need — an id, a base salary, and an active flag.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
  pub employee_id: Uuid,
  pub name:        String,
  pub base_salary: Decimal,
  pub is_active:   bool,
  pub joined_at:   NaiveDate,
}

/// Input for onboarding. Persisting it also seeds one leave-balance row per
/// catalog type, in the same transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
  pub name:        String,
  pub base_salary: Decimal,
  pub joined_at:   Option<NaiveDate>,
}

impl NewEmployee {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    if self.base_salary < Decimal::ZERO {
      return Err(Error::NegativeSalary(self.base_salary));
    }
    Ok(())
  }
}
