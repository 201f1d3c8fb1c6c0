//! Rentable unit within a property.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

string_enum! {
    UnitStatus {
        Vacant => "VACANT",
        Occupied => "OCCUPIED",
        UnderMaintenance => "UNDER_MAINTENANCE",
        Reserved => "RESERVED",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Unit {
    pub id: Uuid,
    pub property_id: Uuid,
    #[schema(example = "2B")]
    pub unit_number: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_feet: Option<i32>,
    /// Monthly rent in cents
    pub rent_cents: i64,
    pub deposit_cents: i64,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn new(property_id: Uuid, input: NewUnit) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            property_id,
            unit_number: input.unit_number.trim().to_string(),
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            square_feet: input.square_feet,
            rent_cents: input.rent_cents,
            deposit_cents: input.deposit_cents,
            status: input.status.unwrap_or(UnitStatus::Vacant),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: UnitChanges) {
        if let Some(number) = changes.unit_number {
            self.unit_number = number.trim().to_string();
        }
        if let Some(bedrooms) = changes.bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = changes.bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(square_feet) = changes.square_feet {
            self.square_feet = Some(square_feet);
        }
        if let Some(rent) = changes.rent_cents {
            self.rent_cents = rent;
        }
        if let Some(deposit) = changes.deposit_cents {
            self.deposit_cents = deposit;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_vacant(&self) -> bool {
        self.status == UnitStatus::Vacant
    }
}

/// Unit creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewUnit {
    #[validate(length(min = 1, max = 20, message = "Unit number must be between 1 and 20 characters"))]
    #[schema(example = "2B")]
    pub unit_number: String,
    #[validate(range(min = 0, max = 20, message = "Bedrooms must be between 0 and 20"))]
    pub bedrooms: i32,
    #[validate(range(min = 0.0, max = 20.0, message = "Bathrooms must be between 0 and 20"))]
    pub bathrooms: f64,
    #[validate(range(min = 1, message = "Square feet must be positive"))]
    pub square_feet: Option<i32>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    #[schema(example = 185000)]
    pub rent_cents: i64,
    #[validate(range(min = 0, message = "Deposit cannot be negative"))]
    pub deposit_cents: i64,
    pub status: Option<UnitStatus>,
}

/// Unit update payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UnitChanges {
    #[validate(length(min = 1, max = 20, message = "Unit number must be between 1 and 20 characters"))]
    pub unit_number: Option<String>,
    #[validate(range(min = 0, max = 20, message = "Bedrooms must be between 0 and 20"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0.0, max = 20.0, message = "Bathrooms must be between 0 and 20"))]
    pub bathrooms: Option<f64>,
    #[validate(range(min = 1, message = "Square feet must be positive"))]
    pub square_feet: Option<i32>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_cents: Option<i64>,
    #[validate(range(min = 0, message = "Deposit cannot be negative"))]
    pub deposit_cents: Option<i64>,
    pub status: Option<UnitStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewUnit {
        NewUnit {
            unit_number: " 2B ".to_string(),
            bedrooms: 2,
            bathrooms: 1.5,
            square_feet: Some(850),
            rent_cents: 185_000,
            deposit_cents: 185_000,
            status: None,
        }
    }

    #[test]
    fn test_new_unit_is_vacant_and_trimmed() {
        let unit = Unit::new(Uuid::new_v4(), input());
        assert_eq!(unit.status, UnitStatus::Vacant);
        assert_eq!(unit.unit_number, "2B");
        assert!(unit.is_vacant());
    }

    #[test]
    fn test_negative_rent_is_invalid() {
        let mut payload = input();
        payload.rent_cents = -1;
        assert!(payload.validate().is_err());
    }
}
