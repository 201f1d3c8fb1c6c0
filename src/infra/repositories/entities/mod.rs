//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enum columns are stored as text and decoded on the way out.

use std::str::FromStr;

use crate::errors::{AppError, AppResult};

pub mod audit_log;
pub mod lease;
pub mod maintenance_request;
pub mod maintenance_update;
pub mod notification;
pub mod payment;
pub mod property;
pub mod unit;
pub mod user;

/// Decode a stored enum value. A value the domain does not know is a
/// corrupt row, not a client error.
pub(crate) fn decode<T: FromStr>(column: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::internal(format!("Unknown {} value in storage: {}", column, value)))
}

/// Decode an optional stored enum value.
pub(crate) fn decode_opt<T: FromStr>(column: &str, value: Option<&str>) -> AppResult<Option<T>> {
    value.map(|v| decode(column, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitStatus;

    #[test]
    fn test_decode_known_value() {
        let status: UnitStatus = decode("units.status", "RESERVED").unwrap();
        assert_eq!(status, UnitStatus::Reserved);
    }

    #[test]
    fn test_decode_unknown_value_is_internal() {
        let result: AppResult<UnitStatus> = decode("units.status", "BOARDED_UP");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_decode_opt_passes_none_through() {
        let result: Option<UnitStatus> = decode_opt("units.status", None).unwrap();
        assert!(result.is_none());
    }
}
