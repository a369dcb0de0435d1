//! User repository for database operations.

use chrono::Utc;
use fxcalc_core::auth::{NewUser, User};
use fxcalc_core::store::{StoreError, UserStore};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{backend_error, store_error};
use crate::entities::users;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_user(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        roles: model.roles,
    }
}

impl UserStore for UserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let email = user.email.clone();
        let model = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            roles: Set(user.roles),
            created_at: Set(Utc::now().into()),
        };

        model
            .insert(&self.db)
            .await
            .map(into_user)
            .map_err(|e| store_error(e, &email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map(|m| m.map(into_user))
            .map_err(backend_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|m| m.map(into_user))
            .map_err(backend_error)
    }

    async fn set_roles(&self, id: Uuid, roles: Vec<String>) -> Result<bool, StoreError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Roles, sea_orm::sea_query::Expr::value(roles))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected > 0)
    }
}
