//! Refresh token repository for database operations.

use chrono::{DateTime, Utc};
use fxcalc_core::store::{RefreshTokenStore, StoreError};
use fxcalc_core::token::RefreshToken;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::{backend_error, store_error};
use crate::entities::refresh_tokens;

/// Refresh token repository.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    db: DatabaseConnection,
}

impl RefreshTokenRepository {
    /// Creates a new refresh token repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_token(model: refresh_tokens::Model) -> RefreshToken {
    RefreshToken {
        token: model.token,
        user_id: model.user_id,
        created_at: model.created_at.with_timezone(&Utc),
        expires_at: model.expires_at.with_timezone(&Utc),
        is_revoked: model.is_revoked,
    }
}

impl RefreshTokenStore for RefreshTokenRepository {
    async fn insert(&self, token: RefreshToken) -> Result<(), StoreError> {
        let key = token.token.clone();
        refresh_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.token),
            user_id: Set(token.user_id),
            created_at: Set(token.created_at.into()),
            expires_at: Set(token.expires_at.into()),
            is_revoked: Set(token.is_revoked),
        }
        .insert(&self.db)
        .await
        .map_err(|e| store_error(e, &key))?;

        Ok(())
    }

    async fn find_usable(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, StoreError> {
        refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::Token.eq(token))
            .filter(refresh_tokens::Column::IsRevoked.eq(false))
            .filter(refresh_tokens::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .map(|m| m.map(into_token))
            .map_err(backend_error)
    }

    async fn revoke(&self, token: &str) -> Result<bool, StoreError> {
        let result = refresh_tokens::Entity::update_many()
            .col_expr(
                refresh_tokens::Column::IsRevoked,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(refresh_tokens::Column::Token.eq(token))
            .filter(refresh_tokens::Column::IsRevoked.eq(false))
            .exec(&self.db)
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = refresh_tokens::Entity::update_many()
            .col_expr(
                refresh_tokens::Column::IsRevoked,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(refresh_tokens::Column::UserId.eq(user_id))
            .filter(refresh_tokens::Column::IsRevoked.eq(false))
            .exec(&self.db)
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected)
    }

    async fn delete_stale(
        &self,
        now: DateTime<Utc>,
        revoked_before: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = refresh_tokens::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(refresh_tokens::Column::ExpiresAt.lt(now))
                    .add(
                        Condition::all()
                            .add(refresh_tokens::Column::IsRevoked.eq(true))
                            .add(refresh_tokens::Column::CreatedAt.lt(revoked_before)),
                    ),
            )
            .exec(&self.db)
            .await
            .map_err(backend_error)?;

        debug!(deleted = result.rows_affected, "Deleted stale refresh tokens");
        Ok(result.rows_affected)
    }
}
