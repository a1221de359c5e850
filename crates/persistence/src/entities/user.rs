//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{PortalUser, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Member,
    Admin,
}

impl From<UserRoleDb> for UserRole {
    fn from(db: UserRoleDb) -> Self {
        match db {
            UserRoleDb::Member => UserRole::Member,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: UserRoleDb,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for PortalUser {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            display_name: entity.display_name,
            email: entity.email,
            role: entity.role.into(),
            created_at: entity.created_at,
        }
    }
}
