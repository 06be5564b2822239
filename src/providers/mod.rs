// Providers layer - Token and cryptographic operations composed by coordinators
pub mod crypto_provider;
pub mod token_provider;

pub use crypto_provider::CryptoProvider;
pub use token_provider::TokenProvider;
