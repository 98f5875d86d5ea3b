// DTOs - API request/response models
pub mod auth;
pub mod business;
pub mod common;
