//! Factory: build `ClaimsVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::ClaimsVerifier;

pub fn build_claims_verifier(config: &Config) -> Result<Arc<ClaimsVerifier>, AppError> {
    let verifier = ClaimsVerifier::new(
        &config.auth_jwt_secret,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to build claims verifier");
        AppError::Internal
    })?;

    Ok(Arc::new(verifier))
}
