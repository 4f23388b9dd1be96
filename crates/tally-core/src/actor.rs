//! The verified principal on whose behalf an operation runs.
//!
//! Credential verification happens upstream; by the time an [`Actor`] exists
//! the id and role are trusted. Admin-only operations check the capability
//! once, at the boundary, instead of re-deriving it from role strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Employee,
}

impl std::str::FromStr for Role {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "admin" => Ok(Role::Admin),
      "employee" => Ok(Role::Employee),
      _ => Err(()),
    }
  }
}

/// An authenticated caller: employee id plus verified role.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
  pub employee_id: Uuid,
  pub role:        Role,
}

impl Actor {
  pub fn new(employee_id: Uuid, role: Role) -> Self {
    Self { employee_id, role }
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }

  /// Fails with [`Error::AdminOnly`] unless the actor holds the admin role.
  pub fn require_admin(&self) -> Result<()> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(Error::AdminOnly)
    }
  }
}
