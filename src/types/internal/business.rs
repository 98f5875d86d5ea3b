use serde::{Deserialize, Serialize};

use crate::types::db::{
    brand, business, contact_info, location, operating_hours, portfolio_image, service,
    specialization,
};
use crate::types::db::business::BusinessStatus;

/// Fixed set of listing filters. Every field maps to one known predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessFilter {
    /// Case-insensitive substring match on the business name
    pub name: Option<String>,
    pub status: Option<BusinessStatus>,
    /// Matches businesses with any location in this city
    pub city_id: Option<i32>,
    pub service_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub specialization_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub phone_primary: String,
    pub phone_secondary: Option<String>,
    pub email_primary: Option<String>,
    pub website_url: Option<String>,
    pub social_media_links: Option<SocialMediaLinks>,
}

#[derive(Debug, Clone, Default)]
pub struct LocationInput {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub area_locality: Option<String>,
    pub city_id: i32,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One operating-hours row. Times are `HH:MM` or `HH:MM:SS` strings, parsed by the store.
#[derive(Debug, Clone, Default)]
pub struct HoursInput {
    pub day_of_week: String,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: bool,
    /// Defaults to the primary location when absent
    pub location_id: Option<i32>,
}

/// Everything needed to create a business aggregate in one go
#[derive(Debug, Clone, Default)]
pub struct NewBusiness {
    pub name: String,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub is_featured: bool,
    pub price_range_indicator: Option<String>,
    pub status: BusinessStatus,
    pub contact: ContactInput,
    pub location: LocationInput,
    pub operating_hours: Vec<HoursInput>,
    pub service_ids: Vec<i32>,
    pub brand_ids: Vec<i32>,
    pub specialization_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub phone_primary: Option<String>,
    pub phone_secondary: Option<String>,
    pub email_primary: Option<String>,
    pub website_url: Option<String>,
    pub social_media_links: Option<SocialMediaLinks>,
}

#[derive(Debug, Clone, Default)]
pub struct LocationPatch {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub area_locality: Option<String>,
    pub city_id: Option<i32>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Sparse update of a business aggregate
///
/// `None` leaves a field or set untouched. For the association sets and
/// operating hours, `Some(vec![])` clears the set.
#[derive(Debug, Clone, Default)]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub description_short: Option<String>,
    pub description_long: Option<String>,
    pub is_featured: Option<bool>,
    pub price_range_indicator: Option<String>,
    pub status: Option<BusinessStatus>,
    pub contact: Option<ContactPatch>,
    pub location: Option<LocationPatch>,
    pub operating_hours: Option<Vec<HoursInput>>,
    pub service_ids: Option<Vec<i32>>,
    pub brand_ids: Option<Vec<i32>>,
    pub specialization_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSummary {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

/// A business row with everything it owns and associates
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessAggregate {
    pub business: business::Model,
    pub contact: Option<contact_info::Model>,
    pub locations: Vec<location::Model>,
    pub operating_hours: Vec<operating_hours::Model>,
    pub services: Vec<service::Model>,
    pub brands: Vec<brand::Model>,
    pub specializations: Vec<specialization::Model>,
    pub owners: Vec<OwnerSummary>,
    /// Only loaded for single-business reads
    pub portfolio_images: Option<Vec<portfolio_image::Model>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

impl PageInfo {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BusinessPage {
    pub businesses: Vec<BusinessAggregate>,
    pub pagination: PageInfo,
}
