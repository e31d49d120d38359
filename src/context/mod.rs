/*!
 * Request context
 *
 * Responsibility:
 * - リクエスト単位のコンテキスト (RequestContext) と、それを引くための ambient accessor
 * - Claims → Operator の変換
 * - Service の型付き解決 (Services / Resolve)
 *
 * Public API:
 * - provider::{init, configuration, current_operator, get_logger, get_service, cache, ...}
 * - Operator / ClaimsIdentity / Claim / ClaimType
 * - Services / Resolve / Logger / LoggerFactory
 */

mod error;
pub mod logger;
pub mod operator;
pub mod provider;
pub mod services;

pub use error::ContextError;
pub use logger::{Logger, LoggerFactory};
pub use operator::{Claim, ClaimType, ClaimsIdentity, Operator};
pub use provider::RequestContext;
pub use services::{Resolve, Services};
