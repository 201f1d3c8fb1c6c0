//! Lease: binds one tenant to one unit for a date range.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::unit::UnitStatus;
use crate::errors::{AppError, AppResult};

string_enum! {
    LeaseStatus {
        Draft => "DRAFT",
        PendingSignature => "PENDING_SIGNATURE",
        Active => "ACTIVE",
        Expired => "EXPIRED",
        Terminated => "TERMINATED",
        Renewed => "RENEWED",
    }
}

impl LeaseStatus {
    /// Statuses that hold a unit and block its deletion.
    pub const BLOCKING: [LeaseStatus; 2] = [LeaseStatus::Active, LeaseStatus::PendingSignature];

    pub fn is_blocking(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            LeaseStatus::Expired | LeaseStatus::Terminated | LeaseStatus::Renewed
        )
    }

    /// Landlord-driven transitions. Signing (`PENDING_SIGNATURE -> ACTIVE`)
    /// is reserved for the tenant.
    pub fn landlord_can_move_to(&self, next: LeaseStatus) -> bool {
        use LeaseStatus::*;
        matches!(
            (self, next),
            (Draft, PendingSignature)
                | (Draft, Terminated)
                | (PendingSignature, Draft)
                | (PendingSignature, Terminated)
                | (Active, Expired)
                | (Active, Terminated)
                | (Active, Renewed)
        )
    }

    /// Unit status implied by moving a lease from `self` to `next`, if any.
    /// Only a lease that held the unit may release it.
    pub fn unit_status_on_move(&self, next: LeaseStatus) -> Option<UnitStatus> {
        match next {
            LeaseStatus::PendingSignature => Some(UnitStatus::Reserved),
            LeaseStatus::Active => Some(UnitStatus::Occupied),
            _ if self.is_blocking() => Some(UnitStatus::Vacant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Lease {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_cents: i64,
    pub deposit_cents: i64,
    pub status: LeaseStatus,
    pub terms: Option<String>,
    pub signature: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lease {
    pub fn new(input: &NewLease) -> Self {
        let now = Utc::now();
        let status = if input.send_for_signature {
            LeaseStatus::PendingSignature
        } else {
            LeaseStatus::Draft
        };
        Self {
            id: Uuid::new_v4(),
            unit_id: input.unit_id,
            tenant_id: input.tenant_id,
            start_date: input.start_date,
            end_date: input.end_date,
            rent_cents: input.rent_cents,
            deposit_cents: input.deposit_cents,
            status,
            terms: input.terms.clone(),
            signature: None,
            signed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply landlord edits. Returns the unit status to write alongside
    /// the lease when the status moved.
    pub fn apply(&mut self, changes: LeaseChanges) -> AppResult<Option<UnitStatus>> {
        if self.status.is_final() {
            return Err(AppError::validation(format!(
                "Lease is {} and can no longer be changed",
                self.status
            )));
        }

        let mut unit_status = None;
        if let Some(next) = changes.status {
            if next != self.status {
                if !self.status.landlord_can_move_to(next) {
                    return Err(AppError::validation(format!(
                        "Cannot move lease from {} to {}",
                        self.status, next
                    )));
                }
                unit_status = self.status.unit_status_on_move(next);
                self.status = next;
            }
        }

        if changes.start_date.is_some() || changes.end_date.is_some() {
            let start = changes.start_date.unwrap_or(self.start_date);
            let end = changes.end_date.unwrap_or(self.end_date);
            super::validation::ordered_dates(start, end)?;
            self.start_date = start;
            self.end_date = end;
        }
        if let Some(rent) = changes.rent_cents {
            self.rent_cents = rent;
        }
        if let Some(deposit) = changes.deposit_cents {
            self.deposit_cents = deposit;
        }
        if let Some(terms) = changes.terms {
            self.terms = Some(terms);
        }
        self.updated_at = Utc::now();
        Ok(unit_status)
    }

    /// Tenant signature: only a lease awaiting signature can be signed.
    pub fn sign(&mut self, signature: String, at: DateTime<Utc>) -> AppResult<()> {
        if self.status != LeaseStatus::PendingSignature {
            return Err(AppError::validation(format!(
                "Lease is {} and cannot be signed",
                self.status
            )));
        }
        self.signature = Some(signature);
        self.signed_at = Some(at);
        self.status = LeaseStatus::Active;
        self.updated_at = at;
        Ok(())
    }
}

/// Lease creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewLease {
    pub unit_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_cents: i64,
    #[validate(range(min = 0, message = "Deposit cannot be negative"))]
    pub deposit_cents: i64,
    #[validate(length(max = 10000, message = "Terms are too long"))]
    pub terms: Option<String>,
    /// Create directly in PENDING_SIGNATURE instead of DRAFT
    #[serde(default)]
    pub send_for_signature: bool,
}

/// Lease update payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LeaseChanges {
    pub status: Option<LeaseStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_cents: Option<i64>,
    #[validate(range(min = 0, message = "Deposit cannot be negative"))]
    pub deposit_cents: Option<i64>,
    #[validate(length(max = 10000, message = "Terms are too long"))]
    pub terms: Option<String>,
}

/// Tenant signature payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignLease {
    #[validate(length(min = 2, max = 200, message = "Signature must be between 2 and 200 characters"))]
    #[schema(example = "Jordan Lee")]
    pub signature: String,
}

/// Landlord list filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaseFilter {
    pub status: Option<LeaseStatus>,
}

impl LeaseFilter {
    pub fn matches(&self, lease: &Lease) -> bool {
        self.status.map_or(true, |s| lease.status == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lease(send_for_signature: bool) -> Lease {
        Lease::new(&NewLease {
            unit_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            rent_cents: 120_000,
            deposit_cents: 120_000,
            terms: None,
            send_for_signature,
        })
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(lease(false).status, LeaseStatus::Draft);
        assert_eq!(lease(true).status, LeaseStatus::PendingSignature);
    }

    #[test]
    fn test_sign_activates_pending_lease() {
        let mut lease = lease(true);
        let now = Utc::now();
        lease.sign("Jordan Lee".to_string(), now).unwrap();
        assert_eq!(lease.status, LeaseStatus::Active);
        assert_eq!(lease.signed_at, Some(now));
    }

    #[test]
    fn test_draft_cannot_be_signed() {
        let mut lease = lease(false);
        assert!(lease.sign("Jordan Lee".to_string(), Utc::now()).is_err());
        assert_eq!(lease.status, LeaseStatus::Draft);
    }

    #[test]
    fn test_landlord_cannot_activate_directly() {
        let mut lease = lease(true);
        let result = lease.apply(LeaseChanges {
            status: Some(LeaseStatus::Active),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_termination_frees_unit() {
        let mut lease = lease(true);
        lease.sign("Jordan Lee".to_string(), Utc::now()).unwrap();
        let unit_status = lease
            .apply(LeaseChanges {
                status: Some(LeaseStatus::Terminated),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unit_status, Some(UnitStatus::Vacant));
        assert!(!lease.status.is_blocking());
    }

    #[test]
    fn test_terminating_draft_leaves_unit_alone() {
        let mut lease = lease(false);
        let unit_status = lease
            .apply(LeaseChanges {
                status: Some(LeaseStatus::Terminated),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unit_status, None);
        assert_eq!(lease.status, LeaseStatus::Terminated);
    }

    #[test]
    fn test_recalling_pending_lease_frees_unit() {
        let mut lease = lease(true);
        let unit_status = lease
            .apply(LeaseChanges {
                status: Some(LeaseStatus::Draft),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unit_status, Some(UnitStatus::Vacant));
    }

    #[test]
    fn test_final_lease_is_frozen() {
        let mut lease = lease(false);
        lease
            .apply(LeaseChanges {
                status: Some(LeaseStatus::Terminated),
                ..Default::default()
            })
            .unwrap();
        let result = lease.apply(LeaseChanges {
            rent_cents: Some(1),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_date_edits_must_stay_ordered() {
        let mut lease = lease(false);
        let result = lease.apply(LeaseChanges {
            end_date: Some(date(2024, 6, 1)),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_same_status_is_not_a_transition() {
        let mut lease = lease(false);
        let unit_status = lease
            .apply(LeaseChanges {
                status: Some(LeaseStatus::Draft),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unit_status, None);
    }
}
