use chrono::DateTime;
use poem_openapi::{ApiResponse, Enum, Object, payload::Json};

use crate::types::db::{
    brand, business::BusinessStatus, contact_info, location, operating_hours, portfolio_image,
    service, specialization,
};
use crate::types::internal::business::{
    BusinessAggregate, BusinessPatch, ContactInput, ContactPatch, HoursInput, LocationInput,
    LocationPatch, NewBusiness, OwnerSummary, SocialMediaLinks,
};

use super::common::{MessageResponse, PaginationResponse};

fn iso8601(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "snake_case")]
pub enum BusinessStatusDto {
    PendingApproval,
    Approved,
    Rejected,
}

impl From<BusinessStatusDto> for BusinessStatus {
    fn from(status: BusinessStatusDto) -> Self {
        match status {
            BusinessStatusDto::PendingApproval => BusinessStatus::PendingApproval,
            BusinessStatusDto::Approved => BusinessStatus::Approved,
            BusinessStatusDto::Rejected => BusinessStatus::Rejected,
        }
    }
}

impl From<BusinessStatus> for BusinessStatusDto {
    fn from(status: BusinessStatus) -> Self {
        match status {
            BusinessStatus::PendingApproval => BusinessStatusDto::PendingApproval,
            BusinessStatus::Approved => BusinessStatusDto::Approved,
            BusinessStatus::Rejected => BusinessStatusDto::Rejected,
        }
    }
}

#[derive(Object, Debug, Clone, Default)]
pub struct SocialMediaLinksDto {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

impl From<SocialMediaLinksDto> for SocialMediaLinks {
    fn from(dto: SocialMediaLinksDto) -> Self {
        Self {
            facebook: dto.facebook,
            instagram: dto.instagram,
            twitter: dto.twitter,
            linkedin: dto.linkedin,
        }
    }
}

impl From<SocialMediaLinks> for SocialMediaLinksDto {
    fn from(links: SocialMediaLinks) -> Self {
        Self {
            facebook: links.facebook,
            instagram: links.instagram,
            twitter: links.twitter,
            linkedin: links.linkedin,
        }
    }
}

// ---- Requests ----

#[derive(Object, Debug)]
pub struct ContactRequest {
    #[oai(validator(min_length = 1, max_length = 20))]
    pub phone_primary: String,

    #[oai(validator(max_length = 20))]
    pub phone_secondary: Option<String>,

    #[oai(validator(max_length = 255))]
    pub email_primary: Option<String>,

    #[oai(validator(max_length = 255))]
    pub website_url: Option<String>,

    pub social_media_links: Option<SocialMediaLinksDto>,
}

#[derive(Object, Debug)]
pub struct LocationRequest {
    #[oai(validator(min_length = 1, max_length = 255))]
    pub address_line1: String,

    #[oai(validator(max_length = 255))]
    pub address_line2: Option<String>,

    #[oai(validator(max_length = 100))]
    pub area_locality: Option<String>,

    #[oai(validator(minimum(value = "1")))]
    pub city_id: i32,

    #[oai(validator(min_length = 1, max_length = 10))]
    pub pincode: String,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Accepted for compatibility; the location created with a business is always primary
    pub is_primary: Option<bool>,
}

#[derive(Object, Debug)]
pub struct OperatingHoursRequest {
    /// Three-letter day abbreviation, e.g. `Mon`
    #[oai(validator(min_length = 1, max_length = 3))]
    pub day_of_week: String,

    /// `HH:MM` or `HH:MM:SS`, defaults to `00:00`
    pub open_time: Option<String>,

    /// `HH:MM` or `HH:MM:SS`, defaults to `00:00`
    pub close_time: Option<String>,

    pub is_closed: Option<bool>,

    /// Defaults to the primary location
    #[oai(validator(minimum(value = "1")))]
    pub location_id: Option<i32>,
}

impl From<OperatingHoursRequest> for HoursInput {
    fn from(req: OperatingHoursRequest) -> Self {
        Self {
            day_of_week: req.day_of_week,
            open_time: req.open_time,
            close_time: req.close_time,
            is_closed: req.is_closed.unwrap_or(false),
            location_id: req.location_id,
        }
    }
}

/// Request model for creating a business listing
#[derive(Object, Debug)]
pub struct CreateBusinessRequest {
    #[oai(validator(min_length = 1, max_length = 255))]
    pub name: String,

    #[oai(validator(max_length = 500))]
    pub description_short: Option<String>,

    pub description_long: Option<String>,

    pub is_featured: Option<bool>,

    #[oai(validator(max_length = 10))]
    pub price_range_indicator: Option<String>,

    /// Defaults to `pending_approval`
    pub status: Option<BusinessStatusDto>,

    pub contact: ContactRequest,

    pub location: LocationRequest,

    pub operating_hours: Option<Vec<OperatingHoursRequest>>,

    pub service_ids: Option<Vec<i32>>,

    pub brand_ids: Option<Vec<i32>>,

    pub specialization_ids: Option<Vec<i32>>,
}

impl From<CreateBusinessRequest> for NewBusiness {
    fn from(req: CreateBusinessRequest) -> Self {
        Self {
            name: req.name,
            description_short: req.description_short,
            description_long: req.description_long,
            is_featured: req.is_featured.unwrap_or(false),
            price_range_indicator: req.price_range_indicator,
            status: req.status.map(Into::into).unwrap_or_default(),
            contact: ContactInput {
                phone_primary: req.contact.phone_primary,
                phone_secondary: req.contact.phone_secondary,
                email_primary: req.contact.email_primary,
                website_url: req.contact.website_url,
                social_media_links: req.contact.social_media_links.map(Into::into),
            },
            location: LocationInput {
                address_line1: req.location.address_line1,
                address_line2: req.location.address_line2,
                area_locality: req.location.area_locality,
                city_id: req.location.city_id,
                pincode: req.location.pincode,
                latitude: req.location.latitude,
                longitude: req.location.longitude,
            },
            operating_hours: req
                .operating_hours
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            service_ids: req.service_ids.unwrap_or_default(),
            brand_ids: req.brand_ids.unwrap_or_default(),
            specialization_ids: req.specialization_ids.unwrap_or_default(),
        }
    }
}

#[derive(Object, Debug, Default)]
pub struct ContactPatchRequest {
    #[oai(validator(min_length = 1, max_length = 20))]
    pub phone_primary: Option<String>,

    #[oai(validator(max_length = 20))]
    pub phone_secondary: Option<String>,

    #[oai(validator(max_length = 255))]
    pub email_primary: Option<String>,

    #[oai(validator(max_length = 255))]
    pub website_url: Option<String>,

    pub social_media_links: Option<SocialMediaLinksDto>,
}

#[derive(Object, Debug, Default)]
pub struct LocationPatchRequest {
    #[oai(validator(min_length = 1, max_length = 255))]
    pub address_line1: Option<String>,

    #[oai(validator(max_length = 255))]
    pub address_line2: Option<String>,

    #[oai(validator(max_length = 100))]
    pub area_locality: Option<String>,

    #[oai(validator(minimum(value = "1")))]
    pub city_id: Option<i32>,

    #[oai(validator(min_length = 1, max_length = 10))]
    pub pincode: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    pub is_primary: Option<bool>,
}

/// Request model for a partial business update
///
/// Omitted keys are left untouched. A supplied list (even empty) replaces the set.
#[derive(Object, Debug, Default)]
pub struct UpdateBusinessRequest {
    #[oai(validator(min_length = 1, max_length = 255))]
    pub name: Option<String>,

    #[oai(validator(max_length = 500))]
    pub description_short: Option<String>,

    pub description_long: Option<String>,

    pub is_featured: Option<bool>,

    #[oai(validator(max_length = 10))]
    pub price_range_indicator: Option<String>,

    pub status: Option<BusinessStatusDto>,

    pub contact: Option<ContactPatchRequest>,

    pub location: Option<LocationPatchRequest>,

    pub operating_hours: Option<Vec<OperatingHoursRequest>>,

    pub service_ids: Option<Vec<i32>>,

    pub brand_ids: Option<Vec<i32>>,

    pub specialization_ids: Option<Vec<i32>>,
}

impl From<UpdateBusinessRequest> for BusinessPatch {
    fn from(req: UpdateBusinessRequest) -> Self {
        Self {
            name: req.name,
            description_short: req.description_short,
            description_long: req.description_long,
            is_featured: req.is_featured,
            price_range_indicator: req.price_range_indicator,
            status: req.status.map(Into::into),
            contact: req.contact.map(|c| ContactPatch {
                phone_primary: c.phone_primary,
                phone_secondary: c.phone_secondary,
                email_primary: c.email_primary,
                website_url: c.website_url,
                social_media_links: c.social_media_links.map(Into::into),
            }),
            location: req.location.map(|l| LocationPatch {
                address_line1: l.address_line1,
                address_line2: l.address_line2,
                area_locality: l.area_locality,
                city_id: l.city_id,
                pincode: l.pincode,
                latitude: l.latitude,
                longitude: l.longitude,
            }),
            operating_hours: req
                .operating_hours
                .map(|hours| hours.into_iter().map(Into::into).collect()),
            service_ids: req.service_ids,
            brand_ids: req.brand_ids,
            specialization_ids: req.specialization_ids,
        }
    }
}

// ---- Responses ----

#[derive(Object, Debug, Clone)]
pub struct ContactInfoResponse {
    pub id: i32,
    pub phone_primary: String,
    pub phone_secondary: Option<String>,
    pub email_primary: Option<String>,
    pub website_url: Option<String>,
    pub social_media_links: Option<SocialMediaLinksDto>,
}

impl From<contact_info::Model> for ContactInfoResponse {
    fn from(model: contact_info::Model) -> Self {
        let social_media_links = model
            .social_media_links
            .as_deref()
            .and_then(|raw| serde_json::from_str::<SocialMediaLinks>(raw).ok())
            .map(Into::into);

        Self {
            id: model.id,
            phone_primary: model.phone_primary,
            phone_secondary: model.phone_secondary,
            email_primary: model.email_primary,
            website_url: model.website_url,
            social_media_links,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct LocationResponse {
    pub id: i32,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub area_locality: Option<String>,
    pub city_id: i32,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_primary: bool,
}

impl From<location::Model> for LocationResponse {
    fn from(model: location::Model) -> Self {
        Self {
            id: model.id,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            area_locality: model.area_locality,
            city_id: model.city_id,
            pincode: model.pincode,
            latitude: model.latitude,
            longitude: model.longitude,
            is_primary: model.is_primary,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct OperatingHoursResponse {
    pub id: i32,
    pub location_id: Option<i32>,
    pub day_of_week: String,
    /// `HH:MM:SS`
    pub open_time: String,
    /// `HH:MM:SS`
    pub close_time: String,
    pub is_closed: bool,
}

impl From<operating_hours::Model> for OperatingHoursResponse {
    fn from(model: operating_hours::Model) -> Self {
        Self {
            id: model.id,
            location_id: model.location_id,
            day_of_week: model.day_of_week,
            open_time: model.open_time.format("%H:%M:%S").to_string(),
            close_time: model.close_time.format("%H:%M:%S").to_string(),
            is_closed: model.is_closed,
        }
    }
}

/// Service or specialization reference
#[derive(Object, Debug, Clone)]
pub struct CatalogEntryResponse {
    pub id: i32,
    pub name: String,
}

impl From<service::Model> for CatalogEntryResponse {
    fn from(model: service::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<specialization::Model> for CatalogEntryResponse {
    fn from(model: specialization::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
    pub logo_url: Option<String>,
}

impl From<brand::Model> for BrandResponse {
    fn from(model: brand::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            logo_url: model.logo_url,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct OwnerResponse {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

impl From<OwnerSummary> for OwnerResponse {
    fn from(owner: OwnerSummary) -> Self {
        Self {
            user_id: owner.user_id,
            email: owner.email,
            role: owner.role,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct PortfolioImageResponse {
    pub id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub display_order: i32,
}

impl From<portfolio_image::Model> for PortfolioImageResponse {
    fn from(model: portfolio_image::Model) -> Self {
        Self {
            id: model.id,
            image_url: model.image_url,
            caption: model.caption,
            display_order: model.display_order,
        }
    }
}

/// A fully hydrated business listing
#[derive(Object, Debug, Clone)]
pub struct BusinessResponse {
    pub id: i32,
    pub name: String,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub is_featured: bool,
    pub price_range_indicator: Option<String>,
    pub status: BusinessStatusDto,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    /// ISO 8601
    pub created_at: String,
    /// ISO 8601
    pub updated_at: String,
    pub contact_info: Option<ContactInfoResponse>,
    pub locations: Vec<LocationResponse>,
    pub operating_hours: Vec<OperatingHoursResponse>,
    pub services: Vec<CatalogEntryResponse>,
    pub brands: Vec<BrandResponse>,
    pub specializations: Vec<CatalogEntryResponse>,
    pub owners: Vec<OwnerResponse>,
    /// Only present on single-business reads
    #[oai(skip_serializing_if_is_none)]
    pub portfolio_images: Option<Vec<PortfolioImageResponse>>,
}

impl From<BusinessAggregate> for BusinessResponse {
    fn from(agg: BusinessAggregate) -> Self {
        let business = agg.business;
        Self {
            id: business.id,
            name: business.name,
            description_short: business.description_short,
            description_long: business.description_long,
            is_featured: business.is_featured,
            price_range_indicator: business.price_range_indicator,
            status: business.status.into(),
            created_by: business.created_by,
            updated_by: business.updated_by,
            created_at: iso8601(business.created_at),
            updated_at: iso8601(business.updated_at),
            contact_info: agg.contact.map(Into::into),
            locations: agg.locations.into_iter().map(Into::into).collect(),
            operating_hours: agg.operating_hours.into_iter().map(Into::into).collect(),
            services: agg.services.into_iter().map(Into::into).collect(),
            brands: agg.brands.into_iter().map(Into::into).collect(),
            specializations: agg.specializations.into_iter().map(Into::into).collect(),
            owners: agg.owners.into_iter().map(Into::into).collect(),
            portfolio_images: agg
                .portfolio_images
                .map(|images| images.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Object, Debug)]
pub struct BusinessEnvelope {
    pub success: bool,
    pub data: BusinessResponse,
}

impl BusinessEnvelope {
    pub fn ok(data: BusinessResponse) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Object, Debug)]
pub struct BusinessListEnvelope {
    pub success: bool,
    pub data: Vec<BusinessResponse>,
    pub pagination: PaginationResponse,
}

#[derive(ApiResponse)]
pub enum CreateBusinessApiResponse {
    /// Business created
    #[oai(status = 201)]
    Created(Json<BusinessEnvelope>),
}

#[derive(ApiResponse)]
pub enum BusinessApiResponse {
    #[oai(status = 200)]
    Ok(Json<BusinessEnvelope>),
}

#[derive(ApiResponse)]
pub enum ListBusinessesApiResponse {
    #[oai(status = 200)]
    Ok(Json<BusinessListEnvelope>),
}

#[derive(ApiResponse)]
pub enum DeleteBusinessApiResponse {
    /// Business and everything it owns were deleted
    #[oai(status = 200)]
    Ok(Json<MessageResponse>),
}
