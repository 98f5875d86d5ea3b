use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::BearerAuth;
use crate::api::helpers::invalid_contact_field;
use crate::app_data::AppData;
use crate::coordinators::business_coordinator::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::coordinators::{AuthCoordinator, BusinessCoordinator};
use crate::errors::BusinessApiError;
use crate::errors::internal::ErrorKind;
use crate::types::dto::business::{
    BusinessApiResponse, BusinessEnvelope, BusinessListEnvelope, BusinessStatusDto,
    CreateBusinessApiResponse, CreateBusinessRequest, DeleteBusinessApiResponse,
    ListBusinessesApiResponse, UpdateBusinessRequest,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::auth::{AuthenticatedUser, ROLE_BUSINESS_OWNER};
use crate::types::internal::business::BusinessFilter;
use crate::types::internal::context::RequestContext;

/// Business listing API endpoints
pub struct BusinessApi {
    auth_coordinator: Arc<AuthCoordinator>,
    business_coordinator: Arc<BusinessCoordinator>,
}

impl BusinessApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data.clone())),
            business_coordinator: Arc::new(BusinessCoordinator::new(app_data)),
        }
    }

    async fn authenticate(&self, auth: &BearerAuth) -> Result<AuthenticatedUser, BusinessApiError> {
        self.auth_coordinator
            .authenticate(&auth.0.token)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::Internal => BusinessApiError::from_internal_error(err),
                _ => {
                    tracing::debug!("Bearer token rejected: {}", err);
                    BusinessApiError::unauthorized("Authentication required")
                }
            })
    }

    /// 404 when the business is missing, 403 unless the caller is an admin or an owner
    async fn authorize_owner_or_admin(
        &self,
        user: &AuthenticatedUser,
        business_id: i32,
        denied_message: &str,
    ) -> Result<(), BusinessApiError> {
        let coordinator = &self.business_coordinator;

        if !coordinator
            .exists(business_id)
            .await
            .map_err(BusinessApiError::from_internal_error)?
        {
            return Err(BusinessApiError::not_found());
        }

        if user.is_admin() {
            return Ok(());
        }

        if coordinator
            .is_owner(business_id, user.id)
            .await
            .map_err(BusinessApiError::from_internal_error)?
        {
            return Ok(());
        }

        tracing::debug!(user_id = user.id, business_id, "Business access denied");
        Err(BusinessApiError::forbidden(denied_message))
    }
}

/// API tags for business endpoints
#[derive(Tags)]
enum BusinessTags {
    /// Business listings
    Businesses,
}

#[OpenApi(prefix_path = "/businesses")]
impl BusinessApi {
    /// List businesses
    ///
    /// Paginated and filterable. Page numbers start at 1; `limit` is at most 100.
    #[oai(path = "/", method = "get", tag = "BusinessTags::Businesses")]
    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
        name: Query<Option<String>>,
        status: Query<Option<BusinessStatusDto>>,
        city_id: Query<Option<i32>>,
        service_id: Query<Option<i32>>,
        brand_id: Query<Option<i32>>,
        specialization_id: Query<Option<i32>>,
    ) -> Result<ListBusinessesApiResponse, BusinessApiError> {
        let page = page.0.unwrap_or(1);
        let limit = limit.0.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 || limit == 0 {
            return Err(BusinessApiError::validation_failed(
                "page and limit must be positive integers",
            ));
        }
        if limit > MAX_PAGE_SIZE {
            return Err(BusinessApiError::validation_failed(format!(
                "limit must not exceed {}",
                MAX_PAGE_SIZE
            )));
        }
        // Row offset must fit the database's signed 64-bit OFFSET
        let offset_fits = (page - 1)
            .checked_mul(limit)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !offset_fits {
            return Err(BusinessApiError::validation_failed("page is out of range"));
        }

        let filter = BusinessFilter {
            name: name.0,
            status: status.0.map(Into::into),
            city_id: city_id.0,
            service_id: service_id.0,
            brand_id: brand_id.0,
            specialization_id: specialization_id.0,
        };

        let result = self
            .business_coordinator
            .list(&filter, page, limit)
            .await
            .map_err(BusinessApiError::from_internal_error)?;

        Ok(ListBusinessesApiResponse::Ok(Json(BusinessListEnvelope {
            success: true,
            data: result.businesses.into_iter().map(Into::into).collect(),
            pagination: result.pagination.into(),
        })))
    }

    /// Get one business with everything it owns
    #[oai(path = "/:id", method = "get", tag = "BusinessTags::Businesses")]
    async fn get(&self, id: Path<i32>) -> Result<BusinessApiResponse, BusinessApiError> {
        let business = self
            .business_coordinator
            .get(id.0)
            .await
            .map_err(BusinessApiError::from_internal_error)?
            .ok_or_else(BusinessApiError::not_found)?;

        Ok(BusinessApiResponse::Ok(Json(BusinessEnvelope::ok(business.into()))))
    }

    /// Create a business listing
    ///
    /// Requires the `business_owner` or `admin` role. The caller is recorded as owner.
    #[oai(path = "/", method = "post", tag = "BusinessTags::Businesses")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateBusinessRequest>,
    ) -> Result<CreateBusinessApiResponse, BusinessApiError> {
        let user = self.authenticate(&auth).await?;
        if !(user.has_role(ROLE_BUSINESS_OWNER) || user.is_admin()) {
            return Err(BusinessApiError::forbidden(
                "Business owner or admin privileges required",
            ));
        }
        let contact = &body.contact;
        if let Some(field) =
            invalid_contact_field(contact.email_primary.as_deref(), contact.website_url.as_deref())
        {
            return Err(BusinessApiError::validation_failed(format!("Invalid {}", field)));
        }
        let ctx = RequestContext::from_request(req).with_user(&user);

        let created = self
            .business_coordinator
            .create(&ctx, body.0.into(), Some(user.id))
            .await
            .map_err(BusinessApiError::from_internal_error)?;

        Ok(CreateBusinessApiResponse::Created(Json(BusinessEnvelope::ok(
            created.into(),
        ))))
    }

    /// Update a business listing
    ///
    /// Requires ownership of the business or the `admin` role.
    #[oai(path = "/:id", method = "put", tag = "BusinessTags::Businesses")]
    async fn update(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateBusinessRequest>,
    ) -> Result<BusinessApiResponse, BusinessApiError> {
        let user = self.authenticate(&auth).await?;
        self.authorize_owner_or_admin(&user, id.0, "You do not have permission to update this business")
            .await?;
        if let Some(contact) = &body.contact {
            if let Some(field) = invalid_contact_field(
                contact.email_primary.as_deref(),
                contact.website_url.as_deref(),
            ) {
                return Err(BusinessApiError::validation_failed(format!("Invalid {}", field)));
            }
        }
        let ctx = RequestContext::from_request(req).with_user(&user);

        let updated = self
            .business_coordinator
            .update(&ctx, id.0, body.0.into(), Some(user.id))
            .await
            .map_err(BusinessApiError::from_internal_error)?;

        Ok(BusinessApiResponse::Ok(Json(BusinessEnvelope::ok(updated.into()))))
    }

    /// Delete a business listing and everything it owns
    ///
    /// Requires ownership of the business or the `admin` role.
    #[oai(path = "/:id", method = "delete", tag = "BusinessTags::Businesses")]
    async fn delete(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<DeleteBusinessApiResponse, BusinessApiError> {
        let user = self.authenticate(&auth).await?;
        self.authorize_owner_or_admin(&user, id.0, "You do not have permission to delete this business")
            .await?;
        let ctx = RequestContext::from_request(req).with_user(&user);

        self.business_coordinator
            .delete(&ctx, id.0)
            .await
            .map_err(BusinessApiError::from_internal_error)?;

        Ok(DeleteBusinessApiResponse::Ok(Json(MessageResponse::ok(
            "Business deleted successfully",
        ))))
    }
}
