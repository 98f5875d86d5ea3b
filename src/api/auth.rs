use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Cookie;
use poem_openapi::{OpenApi, Tags, payload::Json};
use validator::ValidateEmail;

use crate::api::BearerAuth;
use crate::api::helpers::{clear_refresh_cookie, set_refresh_cookie};
use crate::app_data::AppData;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::errors::internal::{ErrorKind, InternalError};
use crate::types::dto::auth::{
    AuthData, AuthResponse, LoginApiResponse, LoginRequest, RefreshApiResponse, RefreshData,
    RefreshResponse, RevokeApiResponse, SignupApiResponse, SignupRequest, TokenResponse,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::auth::NewUser;
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
    cookie_secure: bool,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            cookie_secure: app_data.settings.cookie_secure(),
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data)),
        }
    }

    /// Refresh failures always clear the cookie so the client stops replaying it
    fn refresh_failure(&self, err: InternalError) -> AuthError {
        match err.kind() {
            ErrorKind::Internal => AuthError::from_internal_error(err),
            _ => {
                tracing::debug!("Refresh rejected: {}", err);
                AuthError::invalid_refresh_token(err.to_string(), clear_refresh_cookie(self.cookie_secure))
            }
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account and sign in
    ///
    /// Returns an access token in the body and sets the refresh token cookie.
    #[oai(path = "/signup", method = "post", tag = "AuthTags::Authentication")]
    async fn signup(&self, req: &Request, body: Json<SignupRequest>) -> Result<SignupApiResponse, AuthError> {
        let ctx = RequestContext::from_request(req);
        let body = body.0;

        if !body.email.validate_email() {
            return Err(AuthError::validation_failed("Please provide a valid email"));
        }

        let new_user = NewUser {
            email: body.email,
            password: body.password,
            username: body.username,
            role: body.role.unwrap_or_default().as_str().to_string(),
            is_active: body.is_active.unwrap_or(true),
            is_email_verified: body.is_email_verified.unwrap_or(false),
        };

        let user = self
            .auth_coordinator
            .register(&ctx, new_user)
            .await
            .map_err(AuthError::from_internal_error)?;

        let tokens = self
            .auth_coordinator
            .issue_tokens(&ctx, user.id, &user.email)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(SignupApiResponse::Created(
            Json(AuthResponse {
                success: true,
                data: AuthData {
                    tokens: TokenResponse::from(&tokens),
                    user: user.into(),
                },
            }),
            set_refresh_cookie(&tokens.refresh_token, self.cookie_secure),
        ))
    }

    /// Sign in with email and password
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<LoginApiResponse, AuthError> {
        let ctx = RequestContext::from_request(req);

        if body.email.is_empty() || body.password.is_empty() {
            return Err(AuthError::validation_failed("Email and password are required"));
        }
        if !body.email.validate_email() {
            return Err(AuthError::validation_failed("Please provide a valid email"));
        }

        let user = self
            .auth_coordinator
            .login(&ctx, &body.email, &body.password)
            .await
            .map_err(AuthError::from_internal_error)?;

        let tokens = self
            .auth_coordinator
            .issue_tokens(&ctx, user.id, &user.email)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(LoginApiResponse::Ok(
            Json(AuthResponse {
                success: true,
                data: AuthData {
                    tokens: TokenResponse::from(&tokens),
                    user: user.into(),
                },
            }),
            set_refresh_cookie(&tokens.refresh_token, self.cookie_secure),
        ))
    }

    /// Exchange the refresh token cookie for a new token pair
    ///
    /// The presented refresh token is spent; a new one is set in the cookie.
    #[oai(path = "/refresh-token", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh_token(
        &self,
        req: &Request,
        #[oai(name = "refreshToken")] refresh_token: Cookie<Option<String>>,
    ) -> Result<RefreshApiResponse, AuthError> {
        let ctx = RequestContext::from_request(req);
        let presented = refresh_token.0.unwrap_or_default();

        let subject = self
            .auth_coordinator
            .refresh(&ctx, &presented)
            .await
            .map_err(|e| self.refresh_failure(e))?;

        let tokens = self
            .auth_coordinator
            .issue_tokens(&ctx, subject.user_id, &subject.email)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(RefreshApiResponse::Ok(
            Json(RefreshResponse {
                success: true,
                data: RefreshData {
                    tokens: TokenResponse::from(&tokens),
                },
            }),
            set_refresh_cookie(&tokens.refresh_token, self.cookie_secure),
        ))
    }

    /// Revoke the refresh token cookie and clear it
    #[oai(path = "/revoke-token", method = "post", tag = "AuthTags::Authentication")]
    async fn revoke_token(
        &self,
        req: &Request,
        auth: BearerAuth,
        #[oai(name = "refreshToken")] refresh_token: Cookie<Option<String>>,
    ) -> Result<RevokeApiResponse, AuthError> {
        let user = self
            .auth_coordinator
            .authenticate(&auth.0.token)
            .await
            .map_err(AuthError::from_internal_error)?;
        let ctx = RequestContext::from_request(req).with_user(&user);

        let presented = refresh_token.0.unwrap_or_default();
        self.auth_coordinator
            .revoke(&ctx, &presented)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(RevokeApiResponse::Ok(
            Json(MessageResponse::ok("Token revoked successfully")),
            clear_refresh_cookie(self.cookie_secure),
        ))
    }
}
