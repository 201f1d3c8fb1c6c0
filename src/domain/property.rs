//! Property aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::unit::{Unit, UnitStatus};
use super::validation::POSTAL_CODE_RE;

string_enum! {
    PropertyType {
        SingleFamily => "SINGLE_FAMILY",
        MultiFamily => "MULTI_FAMILY",
        Apartment => "APARTMENT",
        Condo => "CONDO",
        Townhouse => "TOWNHOUSE",
        Commercial => "COMMERCIAL",
    }
}

string_enum! {
    PropertyStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        UnderRenovation => "UNDER_RENOVATION",
    }
}

/// A building or lot owned by one landlord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Property {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn new(landlord_id: Uuid, input: NewProperty) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            landlord_id,
            name: input.name,
            property_type: input.property_type,
            status: input.status.unwrap_or(PropertyStatus::Active),
            address_line1: input.address_line1,
            address_line2: input.address_line2,
            city: input.city,
            state: input.state,
            postal_code: input.postal_code,
            country: input.country.unwrap_or_else(|| "US".to_string()),
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: PropertyChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(property_type) = changes.property_type {
            self.property_type = property_type;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(line1) = changes.address_line1 {
            self.address_line1 = line1;
        }
        if let Some(line2) = changes.address_line2 {
            self.address_line2 = Some(line2);
        }
        if let Some(city) = changes.city {
            self.city = city;
        }
        if let Some(state) = changes.state {
            self.state = state;
        }
        if let Some(postal_code) = changes.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        self.updated_at = Utc::now();
    }
}

/// Property creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewProperty {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    #[schema(example = "Maple Court")]
    pub name: String,
    pub property_type: PropertyType,
    pub status: Option<PropertyStatus>,
    #[validate(length(min = 3, max = 200, message = "Address is required"))]
    #[schema(example = "12 Maple Street")]
    pub address_line1: String,
    #[validate(length(max = 200, message = "Address line 2 is too long"))]
    pub address_line2: Option<String>,
    #[validate(length(min = 2, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 2, max = 100, message = "State is required"))]
    pub state: String,
    #[validate(regex(path = *POSTAL_CODE_RE, message = "Invalid postal code"))]
    #[schema(example = "94110")]
    pub postal_code: String,
    #[validate(length(min = 2, max = 2, message = "Country must be a 2-letter code"))]
    pub country: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Property update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PropertyChanges {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    #[validate(length(min = 3, max = 200, message = "Address is required"))]
    pub address_line1: Option<String>,
    #[validate(length(max = 200, message = "Address line 2 is too long"))]
    pub address_line2: Option<String>,
    #[validate(length(min = 2, max = 100, message = "City is required"))]
    pub city: Option<String>,
    #[validate(length(min = 2, max = 100, message = "State is required"))]
    pub state: Option<String>,
    #[validate(regex(path = *POSTAL_CODE_RE, message = "Invalid postal code"))]
    pub postal_code: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Property with its units
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub units: Vec<Unit>,
}

/// Landlord dashboard figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PortfolioSummary {
    pub property_count: usize,
    pub unit_count: usize,
    pub vacant_units: usize,
    pub occupied_units: usize,
    pub reserved_units: usize,
    pub maintenance_units: usize,
    /// Occupied units as a percentage of all units
    pub occupancy_rate: f64,
    pub open_maintenance_requests: usize,
    pub pending_payments: usize,
}

impl PortfolioSummary {
    pub fn from_units(property_count: usize, units: &[Unit]) -> Self {
        let count = |status: UnitStatus| units.iter().filter(|u| u.status == status).count();
        let occupied = count(UnitStatus::Occupied);
        let occupancy_rate = if units.is_empty() {
            0.0
        } else {
            (occupied as f64 / units.len() as f64 * 1000.0).round() / 10.0
        };

        Self {
            property_count,
            unit_count: units.len(),
            vacant_units: count(UnitStatus::Vacant),
            occupied_units: occupied,
            reserved_units: count(UnitStatus::Reserved),
            maintenance_units: count(UnitStatus::UnderMaintenance),
            occupancy_rate,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::unit::NewUnit;

    fn new_property() -> NewProperty {
        NewProperty {
            name: "Maple Court".to_string(),
            property_type: PropertyType::Apartment,
            status: None,
            address_line1: "12 Maple Street".to_string(),
            address_line2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: None,
            description: None,
        }
    }

    fn unit(property_id: Uuid, number: &str, status: UnitStatus) -> Unit {
        let mut unit = Unit::new(
            property_id,
            NewUnit {
                unit_number: number.to_string(),
                bedrooms: 2,
                bathrooms: 1.0,
                square_feet: None,
                rent_cents: 150_000,
                deposit_cents: 150_000,
                status: None,
            },
        );
        unit.status = status;
        unit
    }

    #[test]
    fn test_new_property_defaults() {
        let property = Property::new(Uuid::new_v4(), new_property());
        assert_eq!(property.status, PropertyStatus::Active);
        assert_eq!(property.country, "US");
    }

    #[test]
    fn test_validation_rejects_bad_postal_code() {
        let mut input = new_property();
        assert!(input.validate().is_ok());
        input.postal_code = "!".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_apply_changes_only_touches_given_fields() {
        let mut property = Property::new(Uuid::new_v4(), new_property());
        property.apply(PropertyChanges {
            city: Some("Shelbyville".to_string()),
            ..Default::default()
        });
        assert_eq!(property.city, "Shelbyville");
        assert_eq!(property.name, "Maple Court");
    }

    #[test]
    fn test_portfolio_summary_occupancy() {
        let pid = Uuid::new_v4();
        let units = vec![
            unit(pid, "1", UnitStatus::Occupied),
            unit(pid, "2", UnitStatus::Vacant),
            unit(pid, "3", UnitStatus::Reserved),
        ];
        let summary = PortfolioSummary::from_units(1, &units);
        assert_eq!(summary.unit_count, 3);
        assert_eq!(summary.occupied_units, 1);
        assert_eq!(summary.vacant_units, 1);
        assert_eq!(summary.occupancy_rate, 33.3);
    }

    #[test]
    fn test_portfolio_summary_empty() {
        let summary = PortfolioSummary::from_units(0, &[]);
        assert_eq!(summary.occupancy_rate, 0.0);
    }
}
