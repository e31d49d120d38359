pub mod core_ctx;

pub use core_ctx::CoreCtx;
