use thiserror::Error;

/// コンテキスト解決時のエラー
///
/// `Unauthenticated` 以外は基本的に配線ミス (init 忘れ、middleware 未適用、service 未登録)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("core context is not initialized")]
    NotInitialized,
    #[error("core context is already initialized")]
    AlreadyInitialized,
    #[error("no active request context")]
    NoActiveRequest,
    #[error("operator is not authenticated")]
    Unauthenticated,
    #[error("service not registered: {0}")]
    ServiceNotFound(&'static str),
}
