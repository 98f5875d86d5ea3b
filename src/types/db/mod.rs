// Database entities - SeaORM models

// Identity
pub mod refresh_token;
pub mod role;
pub mod user;
pub mod user_role;

// Catalogs
pub mod brand;
pub mod service;
pub mod specialization;

// Business aggregate
pub mod business;
pub mod business_brand;
pub mod business_owner;
pub mod business_service;
pub mod business_specialization;
pub mod contact_info;
pub mod location;
pub mod operating_hours;
pub mod portfolio_image;
