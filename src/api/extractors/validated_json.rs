//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// Rejections carry the first violated rule only. Fields are visited in
/// name order and nested sections recursively, so the reported message is
/// stable across requests.
///
/// ```rust,ignore
/// async fn submit(ValidatedJson(payload): ValidatedJson<NewMaintenanceRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate().map_err(|e| {
            AppError::validation(
                first_message(&e).unwrap_or_else(|| "Invalid request".to_string()),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

/// First violated rule, in field-name order.
pub(crate) fn first_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields.into_iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(errs) => errs.first().map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field))
        }),
        ValidationErrorsKind::Struct(inner) => first_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_message(inner)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MaintenanceCategory, MaintenancePriority, NewMaintenanceRequest};
    use uuid::Uuid;

    #[test]
    fn test_reports_first_field_in_name_order() {
        let input = NewMaintenanceRequest {
            unit_id: Uuid::new_v4(),
            title: "x".to_string(),
            description: "short".to_string(),
            category: MaintenanceCategory::General,
            priority: MaintenancePriority::Low,
            permission_to_enter: false,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            first_message(&errors).as_deref(),
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn test_descends_into_nested_sections() {
        let json = serde_json::json!({
            "personal": {
                "phone": "555-010-2030",
                "date_of_birth": "1990-04-12",
                "ssn": "12"
            },
            "emergency_contact": { "name": "Sam Lee", "phone": "555-010-9999", "relationship": "Sibling" },
            "employment": { "employer": "Acme", "job_title": "Engineer", "monthly_income_cents": 1000 },
            "unit_selection": { "unit_id": Uuid::new_v4(), "move_in_date": "2031-01-01", "lease_term_months": 12 }
        });
        let input: crate::domain::OnboardingSubmission = serde_json::from_value(json).unwrap();
        let errors = input.validate().unwrap_err();
        assert_eq!(first_message(&errors).as_deref(), Some("SSN must be 9 digits"));
    }
}
