use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, is_unique_violation};
use crate::types::db::{refresh_token, role, user, user_role};
use crate::types::internal::context::RequestContext;

/// Values for a new user row; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_email_verified: bool,
}

/// CredentialStore persists users, role links and refresh tokens
///
/// Methods take a connection so coordinators can run them inside a transaction.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn begin_transaction(
        &self,
        ctx: &RequestContext,
        operation: &str,
    ) -> Result<DatabaseTransaction, InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;
        tracing::debug!(request_id = %ctx.request_id, "Transaction started: {}", operation);
        Ok(txn)
    }

    pub async fn find_user_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn find_user_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Whether either the email or the username is already taken
    pub async fn user_exists(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        username: &str,
    ) -> Result<bool, InternalError> {
        let existing = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_user_exists", e))?;

        Ok(existing.is_some())
    }

    pub async fn find_role_by_name(
        &self,
        conn: &impl ConnectionTrait,
        role_name: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::RoleName.eq(role_name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }

    /// Insert the user row
    ///
    /// A unique violation on email or username surfaces as `AlreadyExists`,
    /// which covers a concurrent signup slipping past the existence check.
    pub async fn create_user_in_txn(
        &self,
        txn: &DatabaseTransaction,
        record: NewUserRecord,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();

        let new_user = user::ActiveModel {
            email: Set(record.email),
            username: Set(record.username),
            password_hash: Set(record.password_hash),
            is_active: Set(record.is_active),
            is_email_verified: Set(record.is_email_verified),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_user.insert(txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::from(CredentialError::AlreadyExists)
            } else {
                InternalError::database("insert_user", e)
            }
        })
    }

    /// Link a user to a role looked up by name
    ///
    /// Fails with `RoleNotFound` when the role is not in the seeded catalog.
    pub async fn assign_role_in_txn(
        &self,
        txn: &DatabaseTransaction,
        user_id: i32,
        role_name: &str,
    ) -> Result<(), InternalError> {
        let role = self
            .find_role_by_name(txn, role_name)
            .await?
            .ok_or_else(|| CredentialError::RoleNotFound(role_name.to_string()))?;

        user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_user_role", e))?;

        Ok(())
    }

    /// Role names held by a user, de-duplicated and sorted
    pub async fn get_user_roles(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Vec<String>, InternalError> {
        let links = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .find_also_related(role::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("get_user_roles", e))?;

        let roles: BTreeSet<String> = links
            .into_iter()
            .filter_map(|(_, role)| role.map(|r| r.role_name))
            .filter(|name| !name.is_empty())
            .collect();

        Ok(roles.into_iter().collect())
    }

    /// Persist a refresh token digest
    pub async fn store_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        token_hash: String,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        refresh_token::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at),
            is_revoked: Set(false),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_refresh_token", e))?;

        Ok(())
    }

    /// Spend a refresh token and return its owner's user id
    ///
    /// The token is revoked with a conditional update. When two callers race on
    /// the same token only one sees an affected row; the other gets `TokenInvalid`.
    pub async fn consume_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<i32, InternalError> {
        let token = refresh_token::Entity::find()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_refresh_token", e))?
            .ok_or(CredentialError::TokenInvalid)?;

        if token.is_revoked {
            tracing::warn!(user_id = token.user_id, "Revoked refresh token presented");
            return Err(CredentialError::TokenInvalid.into());
        }

        if token.expires_at <= Utc::now().timestamp() {
            tracing::debug!(user_id = token.user_id, "Expired refresh token presented");
            return Err(CredentialError::TokenInvalid.into());
        }

        let result = refresh_token::Entity::update_many()
            .col_expr(refresh_token::Column::IsRevoked, Expr::value(true))
            .filter(refresh_token::Column::Id.eq(token.id))
            .filter(refresh_token::Column::IsRevoked.eq(false))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("consume_refresh_token", e))?;

        if result.rows_affected == 0 {
            tracing::warn!(user_id = token.user_id, "Refresh token already spent by a concurrent request");
            return Err(CredentialError::TokenInvalid.into());
        }

        Ok(token.user_id)
    }

    /// Mark an active refresh token as revoked
    ///
    /// Fails with `TokenNotFound` when nothing matches or it was already revoked.
    pub async fn revoke_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<(), InternalError> {
        let result = refresh_token::Entity::update_many()
            .col_expr(refresh_token::Column::IsRevoked, Expr::value(true))
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .filter(refresh_token::Column::IsRevoked.eq(false))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))?;

        if result.rows_affected == 0 {
            return Err(CredentialError::TokenNotFound.into());
        }

        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .finish()
    }
}
