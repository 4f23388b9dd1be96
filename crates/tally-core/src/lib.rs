//! Core types and trait definitions for the tally workforce engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod actor;
pub mod attendance;
pub mod employee;
pub mod error;
pub mod leave;
pub mod payroll;
pub mod period;
pub mod store;

pub use error::{Error, ErrorKind, Result};

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, half away from zero.
///
/// The single rounding rule used ledger-wide for both hours and money.
pub fn round2(value: Decimal) -> Decimal {
  value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
  }

  #[test]
  fn round2_half_goes_away_from_zero() {
    assert_eq!(round2(dec("1.005")), dec("1.01"));
    assert_eq!(round2(dec("-1.005")), dec("-1.01"));
    assert_eq!(round2(dec("8.5")), dec("8.5"));
  }
}
