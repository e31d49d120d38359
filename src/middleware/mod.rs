/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - 適用順は app.rs で決める (外側から http → cors/security → claims → core_context)
 */
pub mod auth;
pub mod core_context;
pub mod cors;
pub mod http;
pub mod security_headers;
