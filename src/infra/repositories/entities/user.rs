//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::decode;
use crate::domain::{User, UserProfile};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub ssn_hash: Option<String>,
    pub ssn_last_four: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub employer: Option<String>,
    pub job_title: Option<String>,
    pub monthly_income_cents: Option<i64>,
    pub onboarding_completed: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            role: decode("users.role", &model.role)?,
            status: decode("users.status", &model.status)?,
            profile: UserProfile {
                phone: model.phone,
                date_of_birth: model.date_of_birth,
                ssn_last_four: model.ssn_last_four,
                emergency_contact_name: model.emergency_contact_name,
                emergency_contact_phone: model.emergency_contact_phone,
                emergency_contact_relationship: model.emergency_contact_relationship,
                employer: model.employer,
                job_title: model.job_title,
                monthly_income_cents: model.monthly_income_cents,
                onboarding_completed: model.onboarding_completed,
            },
            ssn_hash: model.ssn_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Full-row active model for inserts and whole-record updates
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        let profile = &user.profile;
        ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            name: Set(user.name.clone()),
            role: Set(user.role.as_str().to_string()),
            status: Set(user.status.as_str().to_string()),
            phone: Set(profile.phone.clone()),
            date_of_birth: Set(profile.date_of_birth),
            ssn_hash: Set(user.ssn_hash.clone()),
            ssn_last_four: Set(profile.ssn_last_four.clone()),
            emergency_contact_name: Set(profile.emergency_contact_name.clone()),
            emergency_contact_phone: Set(profile.emergency_contact_phone.clone()),
            emergency_contact_relationship: Set(profile.emergency_contact_relationship.clone()),
            employer: Set(profile.employer.clone()),
            job_title: Set(profile.job_title.clone()),
            monthly_income_cents: Set(profile.monthly_income_cents),
            onboarding_completed: Set(profile.onboarding_completed),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
