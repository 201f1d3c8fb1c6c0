//! Ownership scoping.
//!
//! Every landlord read/write is checked against the landlord owning the
//! property; every tenant read/write against the tenant on the record.
//! A failed check is `Forbidden`, never an empty result.

use uuid::Uuid;

use super::user::UserRole;
use crate::errors::{AppError, AppResult};

/// The authenticated user acting on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Landlord-side access: the owning landlord or an admin.
    pub fn ensure_landlord_of(&self, landlord_id: Uuid) -> AppResult<()> {
        if self.is_admin() || (self.role == UserRole::Landlord && self.id == landlord_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Tenant-side access: only the tenant on the record.
    pub fn ensure_tenant_of(&self, tenant_id: Uuid) -> AppResult<()> {
        if self.role == UserRole::Tenant && self.id == tenant_id {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn ensure_role(&self, role: UserRole) -> AppResult<()> {
        if self.role.can_access(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landlord_scope() {
        let owner = Uuid::new_v4();
        let landlord = Actor::new(owner, UserRole::Landlord);
        let other = Actor::new(Uuid::new_v4(), UserRole::Landlord);
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);

        assert!(landlord.ensure_landlord_of(owner).is_ok());
        assert!(matches!(
            other.ensure_landlord_of(owner),
            Err(AppError::Forbidden)
        ));
        assert!(admin.ensure_landlord_of(owner).is_ok());
    }

    #[test]
    fn test_tenant_with_matching_id_is_not_a_landlord() {
        let id = Uuid::new_v4();
        let tenant = Actor::new(id, UserRole::Tenant);
        assert!(tenant.ensure_landlord_of(id).is_err());
    }

    #[test]
    fn test_tenant_scope() {
        let id = Uuid::new_v4();
        let tenant = Actor::new(id, UserRole::Tenant);
        let other = Actor::new(Uuid::new_v4(), UserRole::Tenant);

        assert!(tenant.ensure_tenant_of(id).is_ok());
        assert!(other.ensure_tenant_of(id).is_err());
    }
}
