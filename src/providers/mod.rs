// Providers layer - Work performers
//
// Providers do self-contained work (hashing, signing) that coordinators
// compose with store calls.

pub mod crypto_provider;
pub mod token_provider;

pub use crypto_provider::CryptoProvider;
pub use token_provider::TokenProvider;
