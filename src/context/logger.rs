//! 名前付き logger (tracing のイベントに `logger` フィールドを付けるだけの薄いラッパー)
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Logger {
    name: Arc<str>,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(logger = %self.name, "{message}");
    }

    pub fn info(&self, message: &str) {
        tracing::info!(logger = %self.name, "{message}");
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(logger = %self.name, "{message}");
    }

    pub fn error(&self, message: &str) {
        tracing::error!(logger = %self.name, "{message}");
    }
}

/// Logger の生成元。Services に登録され、get_logger から解決される
#[derive(Clone, Debug)]
pub struct LoggerFactory {
    default_name: Arc<str>,
}

impl LoggerFactory {
    pub fn new(default_name: impl Into<Arc<str>>) -> Self {
        Self {
            default_name: default_name.into(),
        }
    }

    pub fn create_logger(&self, name: &str) -> Logger {
        Logger { name: name.into() }
    }

    pub fn default_logger(&self) -> Logger {
        Logger {
            name: Arc::clone(&self.default_name),
        }
    }
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}
