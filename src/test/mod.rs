// Test support, compiled only for unit tests
pub mod utils;
