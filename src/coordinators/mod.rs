// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and provider operations for specific API
// endpoints and CLI commands.

pub mod auth_coordinator;
pub mod business_coordinator;

pub use auth_coordinator::AuthCoordinator;
pub use business_coordinator::BusinessCoordinator;
