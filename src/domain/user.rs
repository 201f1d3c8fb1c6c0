//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

string_enum! {
    /// User roles
    UserRole {
        Tenant => "TENANT",
        Landlord => "LANDLORD",
        Admin => "ADMIN",
    }
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role can access routes reserved for `required`.
    /// Admins reach landlord routes; tenant routes stay tenant-only.
    pub fn can_access(&self, required: UserRole) -> bool {
        match (self, required) {
            (UserRole::Admin, UserRole::Landlord) => true,
            (role, required) => *role == required,
        }
    }

    /// Roles that can be chosen at self-registration
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, UserRole::Tenant | UserRole::Landlord)
    }
}

string_enum! {
    /// Account status
    UserStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Suspended => "SUSPENDED",
    }
}

/// Profile details collected during tenant onboarding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Last four digits only; the full value is never stored
    pub ssn_last_four: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub employer: Option<String>,
    pub job_title: Option<String>,
    pub monthly_income_cents: Option<i64>,
    pub onboarding_completed: bool,
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile: UserProfile,
    /// Argon2 hash of the full SSN, for matching only
    #[serde(skip_serializing)]
    pub ssn_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(email: String, password_hash: String, name: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            ssn_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Only active accounts may sign in
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUser {
    /// User email address
    #[schema(example = "tenant@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// User display name
    #[schema(example = "Jordan Lee")]
    pub name: String,
    /// TENANT or LANDLORD
    pub role: UserRole,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "tenant@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Jordan Lee")]
    pub name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile: UserProfile,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            status: user.status,
            profile: user.profile,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_storage_text() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_access() {
        assert!(UserRole::Admin.can_access(UserRole::Landlord));
        assert!(!UserRole::Admin.can_access(UserRole::Tenant));
        assert!(UserRole::Tenant.can_access(UserRole::Tenant));
        assert!(!UserRole::Tenant.can_access(UserRole::Landlord));
        assert!(!UserRole::Landlord.can_access(UserRole::Tenant));
    }

    #[test]
    fn test_admin_cannot_self_register() {
        assert!(!UserRole::Admin.is_self_assignable());
        assert!(UserRole::Tenant.is_self_assignable());
    }

    #[test]
    fn test_role_serializes_as_upper_snake_case() {
        let json = serde_json::to_string(&UserRole::Landlord).unwrap();
        assert_eq!(json, "\"LANDLORD\"");
    }
}
