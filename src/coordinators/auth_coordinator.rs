use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::{CredentialStore, NewUserRecord};
use crate::types::internal::auth::{
    AuthenticatedUser, IssuedTokens, NewUser, TokenSubject, UserProfile,
};
use crate::types::internal::context::RequestContext;

/// Authentication coordinator that orchestrates signup, login and the refresh-token lifecycle
///
/// Composes the credential store with the crypto and token providers. Carries no
/// HTTP concerns: callers translate the returned `InternalError` at the boundary.
pub struct AuthCoordinator {
    credential_store: Arc<CredentialStore>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    ///
    /// Extracts the credential store and creates the providers internally.
    pub fn new(app_data: Arc<AppData>) -> Self {
        let crypto_provider = Arc::new(CryptoProvider::new(app_data.secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(
            app_data.secret_manager.clone(),
            crypto_provider.clone(),
        ));

        Self {
            credential_store: app_data.credential_store.clone(),
            crypto_provider,
            token_provider,
        }
    }

    /// Register a new account
    ///
    /// Coordinates the sequence of operations:
    /// 1. Reject a taken email or username
    /// 2. Hash the password
    /// 3. Insert the user and link the role in one transaction
    ///
    /// # Errors
    /// * `AlreadyExists` - email or username already registered
    /// * `RoleNotFound` - the requested role is not seeded
    pub async fn register(
        &self,
        ctx: &RequestContext,
        new_user: NewUser,
    ) -> Result<UserProfile, InternalError> {
        // Step 1: Existence check
        let conn = self.credential_store.connection();
        if self
            .credential_store
            .user_exists(conn, &new_user.email, &new_user.username)
            .await?
        {
            tracing::warn!(request_id = %ctx.request_id, "Signup rejected: email or username taken");
            return Err(CredentialError::AlreadyExists.into());
        }

        // Step 2: Hash password
        let password_hash = self.crypto_provider.hash_password(&new_user.password)?;

        // Step 3: User row and role link, atomically
        let txn = self.credential_store.begin_transaction(ctx, "register").await?;

        let user = self
            .credential_store
            .create_user_in_txn(
                &txn,
                NewUserRecord {
                    email: new_user.email,
                    username: new_user.username,
                    password_hash,
                    is_active: new_user.is_active,
                    is_email_verified: new_user.is_email_verified,
                },
            )
            .await?;

        self.credential_store
            .assign_role_in_txn(&txn, user.id, &new_user.role)
            .await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, role = %new_user.role, "User registered");

        Ok(UserProfile {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            roles: vec![new_user.role],
        })
    }

    /// Verify credentials and return the user with their role names
    ///
    /// An unknown email and a wrong password are indistinguishable to the caller.
    /// The active flag is only checked once the password matched.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, InternalError> {
        let conn = self.credential_store.connection();

        let Some(user) = self.credential_store.find_user_by_email(conn, email).await? else {
            tracing::debug!(request_id = %ctx.request_id, ip = %ctx.client_ip(), "Login failed: unknown email");
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !self.crypto_provider.verify_password(password, &user.password_hash)? {
            tracing::debug!(request_id = %ctx.request_id, user_id = user.id, "Login failed: wrong password");
            return Err(CredentialError::InvalidCredentials.into());
        }

        if !user.is_active {
            tracing::debug!(request_id = %ctx.request_id, user_id = user.id, "Login refused: account inactive");
            return Err(CredentialError::AccountInactive.into());
        }

        let roles = self.credential_store.get_user_roles(conn, user.id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            source = %ctx.source,
            ip = %ctx.client_ip(),
            user_id = user.id,
            "User logged in"
        );

        Ok(UserProfile {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            roles,
        })
    }

    /// Issue an access token and persist a fresh refresh token for the user
    pub async fn issue_tokens(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        email: &str,
    ) -> Result<IssuedTokens, InternalError> {
        let (access_token, expires_in) = self.token_provider.generate_jwt(user_id, email)?;

        let refresh_token = self.token_provider.generate_refresh_token();
        let token_hash = self.token_provider.hash_refresh_token(&refresh_token)?;
        let expires_at = self.token_provider.refresh_expiration();

        self.credential_store
            .store_refresh_token(self.credential_store.connection(), user_id, token_hash, expires_at)
            .await?;

        tracing::debug!(request_id = %ctx.request_id, user_id, "Token pair issued");

        Ok(IssuedTokens {
            access_token,
            expires_in,
            refresh_token,
        })
    }

    /// Spend a refresh token and return whose it was
    ///
    /// The presented token is revoked; the caller issues a new pair.
    pub async fn refresh(
        &self,
        ctx: &RequestContext,
        refresh_token: &str,
    ) -> Result<TokenSubject, InternalError> {
        if refresh_token.is_empty() {
            return Err(CredentialError::TokenMissing.into());
        }

        let token_hash = self.token_provider.hash_refresh_token(refresh_token)?;
        let conn = self.credential_store.connection();

        let user_id = self.credential_store.consume_refresh_token(conn, &token_hash).await?;

        let user = self
            .credential_store
            .find_user_by_id(conn, user_id)
            .await?
            .ok_or(CredentialError::TokenInvalid)?;

        tracing::debug!(request_id = %ctx.request_id, user_id, "Refresh token consumed");

        Ok(TokenSubject {
            user_id: user.id,
            email: user.email,
        })
    }

    /// Revoke an active refresh token
    ///
    /// The token itself is the authority; no ownership check is made.
    pub async fn revoke(&self, ctx: &RequestContext, refresh_token: &str) -> Result<(), InternalError> {
        if refresh_token.is_empty() {
            return Err(CredentialError::TokenMissing.into());
        }

        let token_hash = self.token_provider.hash_refresh_token(refresh_token)?;
        self.credential_store
            .revoke_refresh_token(self.credential_store.connection(), &token_hash)
            .await?;

        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, "Refresh token revoked");
        Ok(())
    }

    /// Resolve a bearer token to the current user and their roles
    ///
    /// Fails when the token is invalid or expired, or when the user no longer
    /// exists or has been deactivated.
    pub async fn authenticate(&self, bearer_token: &str) -> Result<AuthenticatedUser, InternalError> {
        let claims = self.token_provider.validate_jwt(bearer_token)?;
        let conn = self.credential_store.connection();

        let user = self
            .credential_store
            .find_user_by_id(conn, claims.id)
            .await?
            .ok_or(CredentialError::UserNotFound(claims.id))?;

        if !user.is_active {
            return Err(CredentialError::invalid_token("jwt", "account inactive").into());
        }

        let roles = self.credential_store.get_user_roles(conn, user.id).await?;

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::ErrorKind;
    use crate::test::utils::{TEST_PASSWORD, new_user, setup_test_app_data};
    use crate::types::db::user;
    use crate::types::internal::auth::{ROLE_BUSINESS_OWNER, ROLE_USER};
    use sea_orm::{EntityTrait, PaginatorTrait};

    fn ctx() -> RequestContext {
        RequestContext::for_cli("test")
    }

    async fn setup() -> (Arc<AppData>, AuthCoordinator) {
        let app_data = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data.clone());
        (app_data, coordinator)
    }

    #[tokio::test]
    async fn test_register_returns_profile_without_hash() {
        let (_app_data, auth) = setup().await;

        let profile = auth
            .register(&ctx(), new_user("ana@example.com", "ana", ROLE_BUSINESS_OWNER))
            .await
            .unwrap();

        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(profile.roles, vec![ROLE_BUSINESS_OWNER.to_string()]);
        assert!(profile.is_active);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_or_username_conflicts() {
        let (_app_data, auth) = setup().await;
        auth.register(&ctx(), new_user("ana@example.com", "ana", ROLE_USER))
            .await
            .unwrap();

        let same_email = auth
            .register(&ctx(), new_user("ana@example.com", "other", ROLE_USER))
            .await
            .unwrap_err();
        assert_eq!(same_email.kind(), ErrorKind::Conflict);

        let same_username = auth
            .register(&ctx(), new_user("other@example.com", "ana", ROLE_USER))
            .await
            .unwrap_err();
        assert_eq!(same_username.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_register_unknown_role_leaves_no_user_row() {
        let (app_data, auth) = setup().await;

        let err = auth
            .register(&ctx(), new_user("ana@example.com", "ana", "superuser"))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Credential(CredentialError::RoleNotFound(_))));
        let users = user::Entity::find().count(&app_data.db).await.unwrap();
        assert_eq!(users, 0);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let (_app_data, auth) = setup().await;
        auth.register(&ctx(), new_user("ana@example.com", "ana", ROLE_USER))
            .await
            .unwrap();

        let wrong_password = auth.login(&ctx(), "ana@example.com", "nope").await.unwrap_err();
        let unknown_email = auth.login(&ctx(), "bob@example.com", TEST_PASSWORD).await.unwrap_err();

        assert!(matches!(wrong_password, InternalError::Credential(CredentialError::InvalidCredentials)));
        assert!(matches!(unknown_email, InternalError::Credential(CredentialError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_account_refused_after_password_check() {
        let (_app_data, auth) = setup().await;
        let mut input = new_user("ana@example.com", "ana", ROLE_USER);
        input.is_active = false;
        auth.register(&ctx(), input).await.unwrap();

        let err = auth.login(&ctx(), "ana@example.com", TEST_PASSWORD).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::AccountInactive)));

        let err = auth.login(&ctx(), "ana@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_returns_roles() {
        let (_app_data, auth) = setup().await;
        auth.register(&ctx(), new_user("ana@example.com", "ana", ROLE_BUSINESS_OWNER))
            .await
            .unwrap();

        let profile = auth.login(&ctx(), "ana@example.com", TEST_PASSWORD).await.unwrap();
        assert_eq!(profile.roles, vec![ROLE_BUSINESS_OWNER.to_string()]);
    }

    #[tokio::test]
    async fn test_refresh_token_is_single_use() {
        let (_app_data, auth) = setup().await;
        let profile = auth
            .register(&ctx(), new_user("ana@example.com", "ana", ROLE_USER))
            .await
            .unwrap();
        let tokens = auth.issue_tokens(&ctx(), profile.id, &profile.email).await.unwrap();

        let subject = auth.refresh(&ctx(), &tokens.refresh_token).await.unwrap();
        assert_eq!(subject.user_id, profile.id);
        assert_eq!(subject.email, "ana@example.com");

        let reused = auth.refresh(&ctx(), &tokens.refresh_token).await.unwrap_err();
        assert!(matches!(reused, InternalError::Credential(CredentialError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_refresh_and_revoke_require_a_token() {
        let (_app_data, auth) = setup().await;

        let err = auth.refresh(&ctx(), "").await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::TokenMissing)));

        let err = auth.revoke(&ctx(), "").await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::TokenMissing)));
    }

    #[tokio::test]
    async fn test_revoke_then_refresh_fails() {
        let (_app_data, auth) = setup().await;
        let profile = auth
            .register(&ctx(), new_user("ana@example.com", "ana", ROLE_USER))
            .await
            .unwrap();
        let tokens = auth.issue_tokens(&ctx(), profile.id, &profile.email).await.unwrap();

        auth.revoke(&ctx(), &tokens.refresh_token).await.unwrap();

        let again = auth.revoke(&ctx(), &tokens.refresh_token).await.unwrap_err();
        assert!(matches!(again, InternalError::Credential(CredentialError::TokenNotFound)));

        let refresh = auth.refresh(&ctx(), &tokens.refresh_token).await.unwrap_err();
        assert!(matches!(refresh, InternalError::Credential(CredentialError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_roles() {
        let (_app_data, auth) = setup().await;
        let profile = auth
            .register(&ctx(), new_user("ana@example.com", "ana", ROLE_BUSINESS_OWNER))
            .await
            .unwrap();
        let tokens = auth.issue_tokens(&ctx(), profile.id, &profile.email).await.unwrap();

        let principal = auth.authenticate(&tokens.access_token).await.unwrap();

        assert_eq!(principal.id, profile.id);
        assert!(principal.has_role(ROLE_BUSINESS_OWNER));
        assert!(!principal.is_admin());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage() {
        let (_app_data, auth) = setup().await;

        let err = auth.authenticate("not-a-jwt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }
}
