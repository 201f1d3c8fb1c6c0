//! Shared helpers for turning stored rows into domain values.
//!
//! Entity models decode into domain types with `TryFrom`, because enum
//! columns are stored as text and can fail to decode.

use crate::errors::{AppError, AppResult};

/// Decode a list of rows.
pub(crate) fn into_domain<M, D>(models: Vec<M>) -> AppResult<Vec<D>>
where
    D: TryFrom<M, Error = AppError>,
{
    models.into_iter().map(D::try_from).collect()
}

/// Decode an optional row.
pub(crate) fn opt_into_domain<M, D>(model: Option<M>) -> AppResult<Option<D>>
where
    D: TryFrom<M, Error = AppError>,
{
    model.map(D::try_from).transpose()
}

/// Map a unique-index violation to a conflict with the given message;
/// other database errors pass through.
pub(crate) fn conflict_on_unique(err: sea_orm::DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(message),
        _ => AppError::from(err),
    }
}
