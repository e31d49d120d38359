/*!
 * Request context extractor
 *
 * Responsibility:
 * - middleware::core_context が extensions に入れた RequestContext を handler に明示的に渡す
 * - ambient (provider::*) を使わずに済ませたい handler 向け
 */

mod core;

pub use self::core::CoreCtx;
