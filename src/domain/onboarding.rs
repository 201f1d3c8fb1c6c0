//! Tenant onboarding: the single multi-section submission that turns a
//! registered tenant into a lease applicant on a vacant unit.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::lease::Lease;
use super::unit::Unit;
use super::user::UserProfile;
use super::validation::{PHONE_RE, SSN_RE};
use crate::config::MAX_LEASE_TERM_MONTHS;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PersonalDetails {
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    #[schema(example = "+1 555 010 2030")]
    pub phone: String,
    pub date_of_birth: NaiveDate,
    /// Full SSN; only a hash and the last four digits are kept
    #[validate(regex(path = *SSN_RE, message = "SSN must be 9 digits"))]
    #[schema(example = "123-45-6789")]
    pub ssn: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmergencyContact {
    #[validate(length(min = 2, max = 100, message = "Emergency contact name is required"))]
    pub name: String,
    #[validate(regex(path = *PHONE_RE, message = "Invalid emergency contact phone"))]
    pub phone: String,
    #[validate(length(min = 2, max = 50, message = "Relationship is required"))]
    pub relationship: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Employment {
    #[validate(length(min = 2, max = 120, message = "Employer is required"))]
    pub employer: String,
    #[validate(length(min = 2, max = 120, message = "Job title is required"))]
    pub job_title: String,
    #[validate(range(min = 0, message = "Monthly income cannot be negative"))]
    pub monthly_income_cents: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UnitSelection {
    pub unit_id: Uuid,
    pub move_in_date: NaiveDate,
    #[validate(range(min = 1, max = 36, message = "Lease term must be between 1 and 36 months"))]
    #[schema(example = 12)]
    pub lease_term_months: u32,
}

impl UnitSelection {
    /// Lease end date: move-in plus the term.
    pub fn end_date(&self) -> AppResult<NaiveDate> {
        if self.lease_term_months == 0 || self.lease_term_months > MAX_LEASE_TERM_MONTHS {
            return Err(AppError::validation(
                "Lease term must be between 1 and 36 months",
            ));
        }
        self.move_in_date
            .checked_add_months(Months::new(self.lease_term_months))
            .ok_or_else(|| AppError::validation("Move-in date is out of range"))
    }
}

/// Onboarding submission payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OnboardingSubmission {
    #[validate(nested)]
    pub personal: PersonalDetails,
    #[validate(nested)]
    pub emergency_contact: EmergencyContact,
    #[validate(nested)]
    pub employment: Employment,
    #[validate(nested)]
    pub unit_selection: UnitSelection,
}

impl OnboardingSubmission {
    /// Date rules the derive cannot express.
    pub fn check_dates(&self, today: NaiveDate) -> AppResult<()> {
        if self.personal.date_of_birth >= today {
            return Err(AppError::validation("Date of birth must be in the past"));
        }
        if self.unit_selection.move_in_date < today {
            return Err(AppError::validation("Move-in date cannot be in the past"));
        }
        Ok(())
    }

    /// Profile fields written for the tenant. The SSN itself is handled
    /// separately.
    pub fn profile(&self, ssn_last_four: String) -> UserProfile {
        UserProfile {
            phone: Some(self.personal.phone.clone()),
            date_of_birth: Some(self.personal.date_of_birth),
            ssn_last_four: Some(ssn_last_four),
            emergency_contact_name: Some(self.emergency_contact.name.clone()),
            emergency_contact_phone: Some(self.emergency_contact.phone.clone()),
            emergency_contact_relationship: Some(self.emergency_contact.relationship.clone()),
            employer: Some(self.employment.employer.clone()),
            job_title: Some(self.employment.job_title.clone()),
            monthly_income_cents: Some(self.employment.monthly_income_cents),
            onboarding_completed: true,
        }
    }
}

/// Vacant unit offered during onboarding
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableUnit {
    #[serde(flatten)]
    pub unit: Unit,
    pub property_name: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
}

/// What the tenant gets back after submitting
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OnboardingReceipt {
    pub lease: Lease,
    pub profile: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn submission() -> OnboardingSubmission {
        OnboardingSubmission {
            personal: PersonalDetails {
                phone: "555-010-2030".to_string(),
                date_of_birth: date(1990, 4, 12),
                ssn: "123-45-6789".to_string(),
            },
            emergency_contact: EmergencyContact {
                name: "Sam Lee".to_string(),
                phone: "555-010-9999".to_string(),
                relationship: "Sibling".to_string(),
            },
            employment: Employment {
                employer: "Acme".to_string(),
                job_title: "Engineer".to_string(),
                monthly_income_cents: 600_000,
            },
            unit_selection: UnitSelection {
                unit_id: Uuid::new_v4(),
                move_in_date: date(2031, 1, 31),
                lease_term_months: 12,
            },
        }
    }

    #[test]
    fn test_valid_submission() {
        let input = submission();
        assert!(input.validate().is_ok());
        assert!(input.check_dates(date(2030, 6, 1)).is_ok());
    }

    #[test]
    fn test_nested_section_errors_surface() {
        let mut input = submission();
        input.personal.ssn = "12345".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_lease_term_bounds() {
        let mut input = submission();
        input.unit_selection.lease_term_months = 37;
        assert!(input.validate().is_err());
        assert!(input.unit_selection.end_date().is_err());
    }

    #[test]
    fn test_end_date_clamps_month_end() {
        let selection = UnitSelection {
            unit_id: Uuid::new_v4(),
            move_in_date: date(2031, 1, 31),
            lease_term_months: 1,
        };
        assert_eq!(selection.end_date().unwrap(), date(2031, 2, 28));
    }

    #[test]
    fn test_move_in_in_the_past_is_rejected() {
        let input = submission();
        assert!(input.check_dates(date(2032, 1, 1)).is_err());
    }

    #[test]
    fn test_profile_marks_onboarding_complete() {
        let profile = submission().profile("6789".to_string());
        assert!(profile.onboarding_completed);
        assert_eq!(profile.ssn_last_four.as_deref(), Some("6789"));
        assert_eq!(profile.employer.as_deref(), Some("Acme"));
    }
}
