use std::sync::Arc;

use sea_orm::Set;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{BusinessError, CatalogKind};
use crate::stores::BusinessStore;
use crate::types::db::business;
use crate::types::internal::business::{
    BusinessAggregate, BusinessFilter, BusinessPage, BusinessPatch, NewBusiness, PageInfo,
};
use crate::types::internal::context::RequestContext;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validated association id sets for one write
#[derive(Default)]
struct AssociationIds {
    services: Option<Vec<i32>>,
    brands: Option<Vec<i32>>,
    specializations: Option<Vec<i32>>,
}

impl AssociationIds {
    fn sets(&self) -> [(CatalogKind, Option<&Vec<i32>>); 3] {
        [
            (CatalogKind::Service, self.services.as_ref()),
            (CatalogKind::Brand, self.brands.as_ref()),
            (CatalogKind::Specialization, self.specializations.as_ref()),
        ]
    }
}

/// Business coordinator that orchestrates the aggregate lifecycle
///
/// Writes touching more than one table run in a single transaction. Aggregates
/// are hydrated after commit.
pub struct BusinessCoordinator {
    business_store: Arc<BusinessStore>,
}

impl BusinessCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            business_store: app_data.business_store.clone(),
        }
    }

    async fn validate_associations(
        &self,
        services: Option<&[i32]>,
        brands: Option<&[i32]>,
        specializations: Option<&[i32]>,
    ) -> Result<AssociationIds, InternalError> {
        let store = &self.business_store;
        let conn = store.connection();

        let mut ids = AssociationIds::default();
        if let Some(services) = services {
            ids.services = Some(store.validate_catalog_ids(conn, CatalogKind::Service, services).await?);
        }
        if let Some(brands) = brands {
            ids.brands = Some(store.validate_catalog_ids(conn, CatalogKind::Brand, brands).await?);
        }
        if let Some(specializations) = specializations {
            ids.specializations = Some(
                store
                    .validate_catalog_ids(conn, CatalogKind::Specialization, specializations)
                    .await?,
            );
        }
        Ok(ids)
    }

    /// Create a business with its contact, primary location, owner link,
    /// associations and operating hours
    ///
    /// Coordinates the sequence of operations:
    /// 1. Reject a duplicate (name, city, address line)
    /// 2. Validate catalog ids
    /// 3. Insert every row in one transaction
    /// 4. Load the hydrated aggregate
    ///
    /// # Arguments
    /// * `ctx` - Request context for log correlation
    /// * `input` - The new business
    /// * `owner_id` - User recorded as `Owner`; no ownership row when absent
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: NewBusiness,
        owner_id: Option<i32>,
    ) -> Result<BusinessAggregate, InternalError> {
        let store = &self.business_store;

        // Step 1: Duplicate check
        if store
            .has_duplicate(
                store.connection(),
                &input.name,
                input.location.city_id,
                &input.location.address_line1,
            )
            .await?
        {
            tracing::warn!(request_id = %ctx.request_id, name = %input.name, "Duplicate business rejected");
            return Err(BusinessError::Duplicate { name: input.name }.into());
        }

        // Step 2: Catalog ids
        let associations = self
            .validate_associations(
                Some(input.service_ids.as_slice()),
                Some(input.brand_ids.as_slice()),
                Some(input.specialization_ids.as_slice()),
            )
            .await?;

        // Step 3: All rows, atomically
        let txn = store.begin_transaction(ctx, "create_business").await?;
        let now = chrono::Utc::now().timestamp();

        let row = store
            .insert_business_in_txn(
                &txn,
                business::ActiveModel {
                    name: Set(input.name),
                    description_short: Set(input.description_short),
                    description_long: Set(input.description_long),
                    is_featured: Set(input.is_featured),
                    price_range_indicator: Set(input.price_range_indicator),
                    status: Set(input.status),
                    created_by: Set(owner_id),
                    updated_by: Set(owner_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                },
            )
            .await?;

        store
            .insert_contact_in_txn(&txn, row.id, &input.contact, owner_id)
            .await?;

        let primary = store
            .insert_location_in_txn(&txn, row.id, &input.location, true, owner_id)
            .await?;

        if let Some(owner_id) = owner_id {
            store.insert_owner_in_txn(&txn, row.id, owner_id).await?;
        }

        for (kind, ids) in associations.sets() {
            if let Some(ids) = ids {
                store
                    .replace_associations_in_txn(&txn, kind, row.id, ids, owner_id)
                    .await?;
            }
        }

        store
            .replace_operating_hours_in_txn(&txn, row.id, &input.operating_hours, Some(primary.id), owner_id)
            .await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(request_id = %ctx.request_id, business_id = row.id, "Business created");

        // Step 4: Hydrate
        self.get(row.id)
            .await?
            .ok_or_else(|| BusinessError::NotFound(row.id).into())
    }

    /// One page of hydrated businesses matching the filter
    ///
    /// `page` is 1-based; zero is treated as the first page.
    pub async fn list(
        &self,
        filter: &BusinessFilter,
        page: u64,
        limit: u64,
    ) -> Result<BusinessPage, InternalError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let store = &self.business_store;

        let (rows, total) = store.list_page(store.connection(), filter, page, limit).await?;
        let businesses = store.hydrate(store.connection(), rows, false).await?;

        Ok(BusinessPage {
            businesses,
            pagination: PageInfo::new(total, page, limit),
        })
    }

    /// A single hydrated business, portfolio images included
    pub async fn get(&self, business_id: i32) -> Result<Option<BusinessAggregate>, InternalError> {
        let store = &self.business_store;
        let conn = store.connection();

        let Some(row) = store.find_business(conn, business_id).await? else {
            return Ok(None);
        };

        Ok(store.hydrate(conn, vec![row], true).await?.into_iter().next())
    }

    pub async fn exists(&self, business_id: i32) -> Result<bool, InternalError> {
        self.business_store
            .exists(self.business_store.connection(), business_id)
            .await
    }

    pub async fn is_owner(&self, business_id: i32, user_id: i32) -> Result<bool, InternalError> {
        self.business_store
            .is_owner(self.business_store.connection(), business_id, user_id)
            .await
    }

    /// Apply a sparse update
    ///
    /// Association sets and operating hours present in the patch replace what is
    /// stored, an empty list clears them. Absent keys leave them alone.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        business_id: i32,
        patch: BusinessPatch,
        actor_id: Option<i32>,
    ) -> Result<BusinessAggregate, InternalError> {
        let store = &self.business_store;

        let existing = store
            .find_business(store.connection(), business_id)
            .await?
            .ok_or(BusinessError::NotFound(business_id))?;

        let associations = self
            .validate_associations(
                patch.service_ids.as_deref(),
                patch.brand_ids.as_deref(),
                patch.specialization_ids.as_deref(),
            )
            .await?;

        let txn = store.begin_transaction(ctx, "update_business").await?;

        store
            .update_business_row_in_txn(&txn, existing, &patch, actor_id)
            .await?;

        if let Some(contact) = &patch.contact {
            store
                .upsert_contact_in_txn(&txn, business_id, contact, actor_id)
                .await?;
        }

        let mut primary_location_id = None;
        if let Some(location) = &patch.location {
            let primary = store
                .upsert_primary_location_in_txn(&txn, business_id, location, actor_id)
                .await?;
            primary_location_id = Some(primary.id);
        }

        for (kind, ids) in associations.sets() {
            if let Some(ids) = ids {
                store
                    .replace_associations_in_txn(&txn, kind, business_id, ids, actor_id)
                    .await?;
            }
        }

        if let Some(hours) = &patch.operating_hours {
            let default_location = match primary_location_id {
                Some(id) => Some(id),
                None => store.primary_location(&txn, business_id).await?.map(|l| l.id),
            };
            store
                .replace_operating_hours_in_txn(&txn, business_id, hours, default_location, actor_id)
                .await?;
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!(request_id = %ctx.request_id, business_id, "Business updated");

        self.get(business_id)
            .await?
            .ok_or_else(|| BusinessError::NotFound(business_id).into())
    }

    /// Delete a business; owned rows go with it
    pub async fn delete(&self, ctx: &RequestContext, business_id: i32) -> Result<(), InternalError> {
        let store = &self.business_store;

        if !store.delete(store.connection(), business_id).await? {
            return Err(BusinessError::NotFound(business_id).into());
        }

        tracing::info!(request_id = %ctx.request_id, business_id, "Business deleted");
        Ok(())
    }
}
