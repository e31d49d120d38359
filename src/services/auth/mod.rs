pub mod claims_token;
pub mod factory;

pub use claims_token::{ClaimsTokenError, ClaimsVerifier};
pub use factory::build_claims_verifier;
