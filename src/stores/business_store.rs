use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{NaiveTime, Timelike, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Set, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::{BusinessError, CatalogKind};
use crate::types::db::business_owner::OWNER_ROLE;
use crate::types::db::{
    brand, business, business_brand, business_owner, business_service, business_specialization,
    contact_info, location, operating_hours, portfolio_image, service, specialization, user,
};
use crate::types::internal::business::{
    BusinessAggregate, BusinessFilter, BusinessPatch, ContactInput, ContactPatch, HoursInput,
    LocationInput, LocationPatch, OwnerSummary, SocialMediaLinks,
};
use crate::types::internal::context::RequestContext;

/// Parse `HH:MM` or `HH:MM:SS`; seconds are dropped. Missing values mean midnight.
pub fn parse_hours_time(value: Option<&str>) -> Result<NaiveTime, BusinessError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(NaiveTime::MIN);
    };

    let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| BusinessError::InvalidTime(raw.to_string()))?;

    parsed
        .with_second(0)
        .ok_or_else(|| BusinessError::InvalidTime(raw.to_string()))
}

fn social_links_json(links: Option<&SocialMediaLinks>) -> Result<Option<String>, InternalError> {
    links
        .map(|l| serde_json::to_string(l).map_err(|e| InternalError::parse("social_media_links", e.to_string())))
        .transpose()
}

/// `%needle%` with LIKE wildcards escaped
///
/// The needle is folded the way the backend's `lower()` folds the column:
/// ASCII only on SQLite, full Unicode on Postgres.
fn like_contains(needle: &str, backend: DbBackend) -> String {
    let folded = match backend {
        DbBackend::Sqlite => needle.to_ascii_lowercase(),
        _ => needle.to_lowercase(),
    };
    let escaped = folded
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn group_by_business<T>(rows: Vec<T>, key: impl Fn(&T) -> i32) -> HashMap<i32, Vec<T>> {
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

/// Persistence for the business aggregate
///
/// Every write method takes the caller's transaction. Reads accept any
/// connection so they can run inside or outside a transaction.
pub struct BusinessStore {
    db: DatabaseConnection,
}

impl BusinessStore {
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

    // ---- Lookups ----

    pub async fn find_business(
        &self,
        conn: &impl ConnectionTrait,
        business_id: i32,
    ) -> Result<Option<business::Model>, InternalError> {
        business::Entity::find_by_id(business_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_business", e))
    }

    pub async fn exists(&self, conn: &impl ConnectionTrait, business_id: i32) -> Result<bool, InternalError> {
        let count = business::Entity::find()
            .filter(business::Column::Id.eq(business_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("business_exists", e))?;
        Ok(count > 0)
    }

    pub async fn is_owner(
        &self,
        conn: &impl ConnectionTrait,
        business_id: i32,
        user_id: i32,
    ) -> Result<bool, InternalError> {
        let count = business_owner::Entity::find()
            .filter(business_owner::Column::BusinessId.eq(business_id))
            .filter(business_owner::Column::UserId.eq(user_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("is_business_owner", e))?;
        Ok(count > 0)
    }

    /// Whether a business with this name already has a primary location at this address
    pub async fn has_duplicate(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        city_id: i32,
        address_line1: &str,
    ) -> Result<bool, InternalError> {
        let primary_at_address = location::Entity::find()
            .select_only()
            .column(location::Column::BusinessId)
            .filter(location::Column::CityId.eq(city_id))
            .filter(location::Column::AddressLine1.eq(address_line1))
            .filter(location::Column::IsPrimary.eq(true))
            .into_query();

        let existing = business::Entity::find()
            .filter(business::Column::Name.eq(name))
            .filter(business::Column::Id.in_subquery(primary_at_address))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_duplicate_business", e))?;

        Ok(existing.is_some())
    }

    pub async fn primary_location(
        &self,
        conn: &impl ConnectionTrait,
        business_id: i32,
    ) -> Result<Option<location::Model>, InternalError> {
        location::Entity::find()
            .filter(location::Column::BusinessId.eq(business_id))
            .filter(location::Column::IsPrimary.eq(true))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_primary_location", e))
    }

    /// De-duplicate catalog ids and check that every one exists
    pub async fn validate_catalog_ids(
        &self,
        conn: &impl ConnectionTrait,
        kind: CatalogKind,
        ids: &[i32],
    ) -> Result<Vec<i32>, InternalError> {
        let unique: BTreeSet<i32> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let wanted = unique.iter().copied();
        let found: Vec<i32> = match kind {
            CatalogKind::Service => service::Entity::find()
                .select_only()
                .column(service::Column::Id)
                .filter(service::Column::Id.is_in(wanted))
                .into_tuple::<i32>()
                .all(conn)
                .await,
            CatalogKind::Brand => brand::Entity::find()
                .select_only()
                .column(brand::Column::Id)
                .filter(brand::Column::Id.is_in(wanted))
                .into_tuple::<i32>()
                .all(conn)
                .await,
            CatalogKind::Specialization => specialization::Entity::find()
                .select_only()
                .column(specialization::Column::Id)
                .filter(specialization::Column::Id.is_in(wanted))
                .into_tuple::<i32>()
                .all(conn)
                .await,
        }
        .map_err(|e| InternalError::database("validate_catalog_ids", e))?;

        let found: HashSet<i32> = found.into_iter().collect();
        if let Some(missing) = unique.iter().find(|id| !found.contains(id)) {
            return Err(BusinessError::UnknownCatalogEntry { kind, id: *missing }.into());
        }

        Ok(unique.into_iter().collect())
    }

    // ---- Writes ----

    pub async fn insert_business_in_txn(
        &self,
        txn: &DatabaseTransaction,
        model: business::ActiveModel,
    ) -> Result<business::Model, InternalError> {
        model
            .insert(txn)
            .await
            .map_err(|e| InternalError::database("insert_business", e))
    }

    pub async fn insert_contact_in_txn(
        &self,
        txn: &DatabaseTransaction,
        business_id: i32,
        contact: &ContactInput,
        actor: Option<i32>,
    ) -> Result<contact_info::Model, InternalError> {
        let now = Utc::now().timestamp();

        contact_info::ActiveModel {
            business_id: Set(business_id),
            phone_primary: Set(contact.phone_primary.clone()),
            phone_secondary: Set(contact.phone_secondary.clone()),
            email_primary: Set(contact.email_primary.clone()),
            website_url: Set(contact.website_url.clone()),
            social_media_links: Set(social_links_json(contact.social_media_links.as_ref())?),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_contact_info", e))
    }

    pub async fn insert_location_in_txn(
        &self,
        txn: &DatabaseTransaction,
        business_id: i32,
        input: &LocationInput,
        is_primary: bool,
        actor: Option<i32>,
    ) -> Result<location::Model, InternalError> {
        let now = Utc::now().timestamp();

        location::ActiveModel {
            business_id: Set(business_id),
            address_line1: Set(input.address_line1.clone()),
            address_line2: Set(input.address_line2.clone()),
            area_locality: Set(input.area_locality.clone()),
            city_id: Set(input.city_id),
            pincode: Set(input.pincode.clone()),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            is_primary: Set(is_primary),
            created_by: Set(actor),
            updated_by: Set(actor),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_location", e))
    }

    pub async fn insert_owner_in_txn(
        &self,
        txn: &DatabaseTransaction,
        business_id: i32,
        user_id: i32,
    ) -> Result<(), InternalError> {
        business_owner::ActiveModel {
            business_id: Set(business_id),
            user_id: Set(user_id),
            role: Set(OWNER_ROLE.to_string()),
            added_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_business_owner", e))?;

        Ok(())
    }

    /// Replace one association set wholesale: delete every link, insert the given ids
    ///
    /// Ids must already be validated and de-duplicated.
    pub async fn replace_associations_in_txn(
        &self,
        txn: &DatabaseTransaction,
        kind: CatalogKind,
        business_id: i32,
        ids: &[i32],
        actor: Option<i32>,
    ) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();

        match kind {
            CatalogKind::Service => {
                business_service::Entity::delete_many()
                    .filter(business_service::Column::BusinessId.eq(business_id))
                    .exec(txn)
                    .await
                    .map_err(|e| InternalError::database("clear_business_services", e))?;

                if !ids.is_empty() {
                    business_service::Entity::insert_many(ids.iter().map(|&service_id| {
                        business_service::ActiveModel {
                            business_id: Set(business_id),
                            service_id: Set(service_id),
                            created_by: Set(actor),
                            created_at: Set(now),
                            ..Default::default()
                        }
                    }))
                    .exec(txn)
                    .await
                    .map_err(|e| InternalError::database("insert_business_services", e))?;
                }
            }
            CatalogKind::Brand => {
                business_brand::Entity::delete_many()
                    .filter(business_brand::Column::BusinessId.eq(business_id))
                    .exec(txn)
                    .await
                    .map_err(|e| InternalError::database("clear_business_brands", e))?;

                if !ids.is_empty() {
                    business_brand::Entity::insert_many(ids.iter().map(|&brand_id| {
                        business_brand::ActiveModel {
                            business_id: Set(business_id),
                            brand_id: Set(brand_id),
                            created_by: Set(actor),
                            created_at: Set(now),
                            ..Default::default()
                        }
                    }))
                    .exec(txn)
                    .await
                    .map_err(|e| InternalError::database("insert_business_brands", e))?;
                }
            }
            CatalogKind::Specialization => {
                business_specialization::Entity::delete_many()
                    .filter(business_specialization::Column::BusinessId.eq(business_id))
                    .exec(txn)
                    .await
                    .map_err(|e| InternalError::database("clear_business_specializations", e))?;

                if !ids.is_empty() {
                    business_specialization::Entity::insert_many(ids.iter().map(|&specialization_id| {
                        business_specialization::ActiveModel {
                            business_id: Set(business_id),
                            specialization_id: Set(specialization_id),
                            created_by: Set(actor),
                            created_at: Set(now),
                            ..Default::default()
                        }
                    }))
                    .exec(txn)
                    .await
                    .map_err(|e| InternalError::database("insert_business_specializations", e))?;
                }
            }
        }

        tracing::debug!(business_id, kind = %kind, count = ids.len(), "Association set replaced");
        Ok(())
    }

    /// Replace all operating hours of a business
    ///
    /// Rows without a location go to `default_location_id`. An explicit location
    /// must belong to this business.
    pub async fn replace_operating_hours_in_txn(
        &self,
        txn: &DatabaseTransaction,
        business_id: i32,
        hours: &[HoursInput],
        default_location_id: Option<i32>,
        actor: Option<i32>,
    ) -> Result<(), InternalError> {
        let owned_locations: HashSet<i32> = location::Entity::find()
            .select_only()
            .column(location::Column::Id)
            .filter(location::Column::BusinessId.eq(business_id))
            .into_tuple::<i32>()
            .all(txn)
            .await
            .map_err(|e| InternalError::database("list_business_locations", e))?
            .into_iter()
            .collect();

        let now = Utc::now().timestamp();
        let mut rows = Vec::with_capacity(hours.len());
        for entry in hours {
            let location_id = match entry.location_id {
                Some(id) if !owned_locations.contains(&id) => {
                    return Err(BusinessError::UnknownLocation {
                        business_id,
                        location_id: id,
                    }
                    .into());
                }
                Some(id) => Some(id),
                None => default_location_id,
            };

            rows.push(operating_hours::ActiveModel {
                business_id: Set(business_id),
                location_id: Set(location_id),
                day_of_week: Set(entry.day_of_week.clone()),
                open_time: Set(parse_hours_time(entry.open_time.as_deref())?),
                close_time: Set(parse_hours_time(entry.close_time.as_deref())?),
                is_closed: Set(entry.is_closed),
                created_by: Set(actor),
                updated_by: Set(actor),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
        }

        operating_hours::Entity::delete_many()
            .filter(operating_hours::Column::BusinessId.eq(business_id))
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("clear_operating_hours", e))?;

        if !rows.is_empty() {
            operating_hours::Entity::insert_many(rows)
                .exec(txn)
                .await
                .map_err(|e| InternalError::database("insert_operating_hours", e))?;
        }

        Ok(())
    }

    /// Apply the scalar part of a patch; untouched fields keep their values
    pub async fn update_business_row_in_txn(
        &self,
        txn: &DatabaseTransaction,
        existing: business::Model,
        patch: &BusinessPatch,
        actor: Option<i32>,
    ) -> Result<business::Model, InternalError> {
        let mut model = existing.into_active_model();

        if let Some(name) = &patch.name {
            model.name = Set(name.clone());
        }
        if let Some(description_short) = &patch.description_short {
            model.description_short = Set(Some(description_short.clone()));
        }
        if let Some(description_long) = &patch.description_long {
            model.description_long = Set(Some(description_long.clone()));
        }
        if let Some(is_featured) = patch.is_featured {
            model.is_featured = Set(is_featured);
        }
        if let Some(price_range_indicator) = &patch.price_range_indicator {
            model.price_range_indicator = Set(Some(price_range_indicator.clone()));
        }
        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if actor.is_some() {
            model.updated_by = Set(actor);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_business", e))
    }

    /// Update the contact row in place, or create it when the business has none
    pub async fn upsert_contact_in_txn(
        &self,
        txn: &DatabaseTransaction,
        business_id: i32,
        patch: &ContactPatch,
        actor: Option<i32>,
    ) -> Result<(), InternalError> {
        let existing = contact_info::Entity::find()
            .filter(contact_info::Column::BusinessId.eq(business_id))
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_contact_info", e))?;

        let Some(existing) = existing else {
            let phone_primary = patch
                .phone_primary
                .clone()
                .ok_or(BusinessError::IncompleteContact("phone_primary"))?;
            let input = ContactInput {
                phone_primary,
                phone_secondary: patch.phone_secondary.clone(),
                email_primary: patch.email_primary.clone(),
                website_url: patch.website_url.clone(),
                social_media_links: patch.social_media_links.clone(),
            };
            self.insert_contact_in_txn(txn, business_id, &input, actor).await?;
            return Ok(());
        };

        let mut model = existing.into_active_model();
        if let Some(phone_primary) = &patch.phone_primary {
            model.phone_primary = Set(phone_primary.clone());
        }
        if let Some(phone_secondary) = &patch.phone_secondary {
            model.phone_secondary = Set(Some(phone_secondary.clone()));
        }
        if let Some(email_primary) = &patch.email_primary {
            model.email_primary = Set(Some(email_primary.clone()));
        }
        if let Some(website_url) = &patch.website_url {
            model.website_url = Set(Some(website_url.clone()));
        }
        if patch.social_media_links.is_some() {
            model.social_media_links = Set(social_links_json(patch.social_media_links.as_ref())?);
        }
        if actor.is_some() {
            model.updated_by = Set(actor);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_contact_info", e))?;

        Ok(())
    }

    /// Update the primary location in place, or create it when missing
    pub async fn upsert_primary_location_in_txn(
        &self,
        txn: &DatabaseTransaction,
        business_id: i32,
        patch: &LocationPatch,
        actor: Option<i32>,
    ) -> Result<location::Model, InternalError> {
        let Some(existing) = self.primary_location(txn, business_id).await? else {
            let input = LocationInput {
                address_line1: patch
                    .address_line1
                    .clone()
                    .ok_or(BusinessError::IncompleteLocation("address_line1"))?,
                address_line2: patch.address_line2.clone(),
                area_locality: patch.area_locality.clone(),
                city_id: patch.city_id.ok_or(BusinessError::IncompleteLocation("city_id"))?,
                pincode: patch
                    .pincode
                    .clone()
                    .ok_or(BusinessError::IncompleteLocation("pincode"))?,
                latitude: patch.latitude,
                longitude: patch.longitude,
            };
            return self
                .insert_location_in_txn(txn, business_id, &input, true, actor)
                .await;
        };

        let mut model = existing.into_active_model();
        if let Some(address_line1) = &patch.address_line1 {
            model.address_line1 = Set(address_line1.clone());
        }
        if let Some(address_line2) = &patch.address_line2 {
            model.address_line2 = Set(Some(address_line2.clone()));
        }
        if let Some(area_locality) = &patch.area_locality {
            model.area_locality = Set(Some(area_locality.clone()));
        }
        if let Some(city_id) = patch.city_id {
            model.city_id = Set(city_id);
        }
        if let Some(pincode) = &patch.pincode {
            model.pincode = Set(pincode.clone());
        }
        if patch.latitude.is_some() {
            model.latitude = Set(patch.latitude);
        }
        if patch.longitude.is_some() {
            model.longitude = Set(patch.longitude);
        }
        if actor.is_some() {
            model.updated_by = Set(actor);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(txn)
            .await
            .map_err(|e| InternalError::database("update_location", e))
    }

    /// Delete the business row; child rows go with it through cascading foreign keys
    ///
    /// Returns false when no row matched.
    pub async fn delete(&self, conn: &impl ConnectionTrait, business_id: i32) -> Result<bool, InternalError> {
        let result = business::Entity::delete_by_id(business_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_business", e))?;

        Ok(result.rows_affected > 0)
    }

    // ---- Listing and hydration ----

    /// One page of business rows matching the filter, ordered by id, plus the total count
    pub async fn list_page(
        &self,
        conn: &impl ConnectionTrait,
        filter: &BusinessFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<business::Model>, u64), InternalError> {
        let mut query = business::Entity::find();

        if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
            let pattern = like_contains(name, conn.get_database_backend());
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((business::Entity, business::Column::Name))))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        if let Some(status) = filter.status {
            query = query.filter(business::Column::Status.eq(status));
        }

        if let Some(city_id) = filter.city_id {
            query = query.filter(
                business::Column::Id.in_subquery(
                    location::Entity::find()
                        .select_only()
                        .column(location::Column::BusinessId)
                        .filter(location::Column::CityId.eq(city_id))
                        .into_query(),
                ),
            );
        }

        if let Some(service_id) = filter.service_id {
            query = query.filter(
                business::Column::Id.in_subquery(
                    business_service::Entity::find()
                        .select_only()
                        .column(business_service::Column::BusinessId)
                        .filter(business_service::Column::ServiceId.eq(service_id))
                        .into_query(),
                ),
            );
        }

        if let Some(brand_id) = filter.brand_id {
            query = query.filter(
                business::Column::Id.in_subquery(
                    business_brand::Entity::find()
                        .select_only()
                        .column(business_brand::Column::BusinessId)
                        .filter(business_brand::Column::BrandId.eq(brand_id))
                        .into_query(),
                ),
            );
        }

        if let Some(specialization_id) = filter.specialization_id {
            query = query.filter(
                business::Column::Id.in_subquery(
                    business_specialization::Entity::find()
                        .select_only()
                        .column(business_specialization::Column::BusinessId)
                        .filter(business_specialization::Column::SpecializationId.eq(specialization_id))
                        .into_query(),
                ),
            );
        }

        let paginator = query
            .order_by_asc(business::Column::Id)
            .paginate(conn, limit.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_businesses", e))?;

        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| InternalError::database("list_businesses", e))?;

        Ok((rows, total))
    }

    /// Load everything each business owns or associates, batched per table
    pub async fn hydrate(
        &self,
        conn: &impl ConnectionTrait,
        businesses: Vec<business::Model>,
        include_portfolio: bool,
    ) -> Result<Vec<BusinessAggregate>, InternalError> {
        if businesses.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = businesses.iter().map(|b| b.id).collect();

        let mut contacts: HashMap<i32, contact_info::Model> = contact_info::Entity::find()
            .filter(contact_info::Column::BusinessId.is_in(ids.clone()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_contact_info", e))?
            .into_iter()
            .map(|c| (c.business_id, c))
            .collect();

        let mut locations = group_by_business(
            location::Entity::find()
                .filter(location::Column::BusinessId.is_in(ids.clone()))
                .order_by_desc(location::Column::IsPrimary)
                .order_by_asc(location::Column::Id)
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_locations", e))?,
            |l| l.business_id,
        );

        let mut hours = group_by_business(
            operating_hours::Entity::find()
                .filter(operating_hours::Column::BusinessId.is_in(ids.clone()))
                .order_by_asc(operating_hours::Column::Id)
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_operating_hours", e))?,
            |h| h.business_id,
        );

        let mut services = group_by_business(
            business_service::Entity::find()
                .filter(business_service::Column::BusinessId.is_in(ids.clone()))
                .order_by_asc(business_service::Column::ServiceId)
                .find_also_related(service::Entity)
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_business_services", e))?,
            |(link, _)| link.business_id,
        );

        let mut brands = group_by_business(
            business_brand::Entity::find()
                .filter(business_brand::Column::BusinessId.is_in(ids.clone()))
                .order_by_asc(business_brand::Column::BrandId)
                .find_also_related(brand::Entity)
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_business_brands", e))?,
            |(link, _)| link.business_id,
        );

        let mut specializations = group_by_business(
            business_specialization::Entity::find()
                .filter(business_specialization::Column::BusinessId.is_in(ids.clone()))
                .order_by_asc(business_specialization::Column::SpecializationId)
                .find_also_related(specialization::Entity)
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_business_specializations", e))?,
            |(link, _)| link.business_id,
        );

        let mut owners = group_by_business(
            business_owner::Entity::find()
                .filter(business_owner::Column::BusinessId.is_in(ids.clone()))
                .order_by_asc(business_owner::Column::Id)
                .find_also_related(user::Entity)
                .all(conn)
                .await
                .map_err(|e| InternalError::database("load_business_owners", e))?,
            |(link, _)| link.business_id,
        );

        let mut portfolio = if include_portfolio {
            group_by_business(
                portfolio_image::Entity::find()
                    .filter(portfolio_image::Column::BusinessId.is_in(ids.clone()))
                    .order_by_asc(portfolio_image::Column::DisplayOrder)
                    .order_by_asc(portfolio_image::Column::Id)
                    .all(conn)
                    .await
                    .map_err(|e| InternalError::database("load_portfolio_images", e))?,
                |p| p.business_id,
            )
        } else {
            HashMap::new()
        };

        let aggregates = businesses
            .into_iter()
            .map(|business| {
                let id = business.id;
                BusinessAggregate {
                    contact: contacts.remove(&id),
                    locations: locations.remove(&id).unwrap_or_default(),
                    operating_hours: hours.remove(&id).unwrap_or_default(),
                    services: services
                        .remove(&id)
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|(_, s)| s)
                        .collect(),
                    brands: brands
                        .remove(&id)
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|(_, b)| b)
                        .collect(),
                    specializations: specializations
                        .remove(&id)
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|(_, s)| s)
                        .collect(),
                    owners: owners
                        .remove(&id)
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|(link, owner)| {
                            owner.map(|u| OwnerSummary {
                                user_id: u.id,
                                email: u.email,
                                role: link.role,
                            })
                        })
                        .collect(),
                    portfolio_images: include_portfolio
                        .then(|| portfolio.remove(&id).unwrap_or_default()),
                    business,
                }
            })
            .collect();

        Ok(aggregates)
    }
}

impl std::fmt::Debug for BusinessStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessStore").field("db", &"<connection>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_catalog, setup_test_db};
    use crate::types::db::business::BusinessStatus;

    fn business_row(name: &str, status: BusinessStatus) -> business::ActiveModel {
        let now = Utc::now().timestamp();
        business::ActiveModel {
            name: Set(name.to_string()),
            is_featured: Set(false),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn location_input(city_id: i32, address: &str) -> LocationInput {
        LocationInput {
            address_line1: address.to_string(),
            city_id,
            pincode: "560001".to_string(),
            ..Default::default()
        }
    }

    async fn insert(store: &BusinessStore, name: &str, status: BusinessStatus, city_id: i32, address: &str) -> i32 {
        let ctx = RequestContext::for_cli("test");
        let txn = store.begin_transaction(&ctx, "insert").await.unwrap();
        let row = store.insert_business_in_txn(&txn, business_row(name, status)).await.unwrap();
        store
            .insert_location_in_txn(&txn, row.id, &location_input(city_id, address), true, None)
            .await
            .unwrap();
        txn.commit().await.unwrap();
        row.id
    }

    #[test]
    fn test_parse_hours_time_formats() {
        assert_eq!(parse_hours_time(Some("09:30")).unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_hours_time(Some("18:45:59")).unwrap(), NaiveTime::from_hms_opt(18, 45, 0).unwrap());
        assert_eq!(parse_hours_time(None).unwrap(), NaiveTime::MIN);
        assert_eq!(parse_hours_time(Some("")).unwrap(), NaiveTime::MIN);
        assert!(matches!(parse_hours_time(Some("25:00")), Err(BusinessError::InvalidTime(_))));
        assert!(parse_hours_time(Some("noon")).is_err());
    }

    #[test]
    fn test_like_contains_escapes_wildcards() {
        assert_eq!(like_contains("Acme", DbBackend::Sqlite), "%acme%");
        assert_eq!(like_contains("100%_off", DbBackend::Sqlite), "%100\\%\\_off%");
    }

    #[test]
    fn test_like_contains_folds_like_the_backend() {
        assert_eq!(like_contains("ÉCOLE", DbBackend::Sqlite), "%École%");
        assert_eq!(like_contains("ÉCOLE", DbBackend::Postgres), "%école%");
    }

    #[tokio::test]
    async fn test_duplicate_lookup_matches_name_city_and_address() {
        let store = BusinessStore::new(setup_test_db().await);
        insert(&store, "Acme Plumbing", BusinessStatus::Approved, 1, "12 Main St").await;

        let conn = store.connection();
        assert!(store.has_duplicate(conn, "Acme Plumbing", 1, "12 Main St").await.unwrap());
        assert!(!store.has_duplicate(conn, "Acme Plumbing", 2, "12 Main St").await.unwrap());
        assert!(!store.has_duplicate(conn, "Acme Plumbing", 1, "14 Main St").await.unwrap());
        assert!(!store.has_duplicate(conn, "Acme Electric", 1, "12 Main St").await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_catalog_ids_dedupes_and_reports_missing() {
        let db = setup_test_db().await;
        let catalog = seed_catalog(&db).await;
        let store = BusinessStore::new(db);

        let s = &catalog.service_ids;
        let ids = store
            .validate_catalog_ids(store.connection(), CatalogKind::Service, &[s[1], s[0], s[1]])
            .await
            .unwrap();
        assert_eq!(ids, vec![s[0], s[1]]);

        let missing = store
            .validate_catalog_ids(store.connection(), CatalogKind::Brand, &[catalog.brand_ids[0], 9999])
            .await;
        assert!(matches!(
            missing,
            Err(InternalError::Business(BusinessError::UnknownCatalogEntry {
                kind: CatalogKind::Brand,
                id: 9999
            }))
        ));
    }

    #[tokio::test]
    async fn test_list_page_filters_by_name_status_and_city() {
        let store = BusinessStore::new(setup_test_db().await);
        insert(&store, "Acme Plumbing", BusinessStatus::Approved, 1, "1 A St").await;
        insert(&store, "Bolt Electric", BusinessStatus::PendingApproval, 1, "2 B St").await;
        insert(&store, "ACME Carpentry", BusinessStatus::Approved, 2, "3 C St").await;

        let conn = store.connection();

        let by_name = BusinessFilter {
            name: Some("acme".to_string()),
            ..Default::default()
        };
        let (rows, total) = store.list_page(conn, &by_name, 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);

        let approved_in_city_one = BusinessFilter {
            status: Some(BusinessStatus::Approved),
            city_id: Some(1),
            ..Default::default()
        };
        let (rows, total) = store.list_page(conn, &approved_in_city_one, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "Acme Plumbing");
    }

    #[tokio::test]
    async fn test_list_page_name_filter_with_accented_name() {
        let store = BusinessStore::new(setup_test_db().await);
        insert(&store, "École du Nord", BusinessStatus::Approved, 1, "1 Rue").await;

        let by_name = |name: &str| BusinessFilter {
            name: Some(name.to_string()),
            ..Default::default()
        };

        for needle in ["École", "ÉCOLE DU", "du nord"] {
            let (_, total) = store
                .list_page(store.connection(), &by_name(needle), 1, 10)
                .await
                .unwrap();
            assert_eq!(total, 1, "needle {:?}", needle);
        }
    }

    #[tokio::test]
    async fn test_list_page_beyond_range_is_empty_with_total() {
        let store = BusinessStore::new(setup_test_db().await);
        for i in 0..3 {
            insert(&store, &format!("Shop {}", i), BusinessStatus::Approved, 1, &format!("{} Road", i)).await;
        }

        let (rows, total) = store
            .list_page(store.connection(), &BusinessFilter::default(), 5, 2)
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_operating_hours_reject_foreign_location() {
        let store = BusinessStore::new(setup_test_db().await);
        let first = insert(&store, "First", BusinessStatus::Approved, 1, "1 St").await;
        let second = insert(&store, "Second", BusinessStatus::Approved, 1, "2 St").await;
        let foreign_location = store
            .primary_location(store.connection(), second)
            .await
            .unwrap()
            .unwrap();

        let ctx = RequestContext::for_cli("test");
        let txn = store.begin_transaction(&ctx, "hours").await.unwrap();
        let result = store
            .replace_operating_hours_in_txn(
                &txn,
                first,
                &[HoursInput {
                    day_of_week: "Mon".to_string(),
                    location_id: Some(foreign_location.id),
                    ..Default::default()
                }],
                None,
                None,
            )
            .await;
        txn.rollback().await.unwrap();

        assert!(matches!(
            result,
            Err(InternalError::Business(BusinessError::UnknownLocation { .. }))
        ));
    }
}
