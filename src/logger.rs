#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    /// Header value wins; otherwise fall back to the `LOG_LEVEL` env var.
    pub fn resolve(header: Option<&str>, env_default: Option<&str>) -> Self {
        match header.filter(|h| !h.trim().is_empty()) {
            Some(value) => Self::from_header(value),
            None => env_default.map(Self::from_header).unwrap_or_default(),
        }
    }

    pub fn should_log_debug(&self) -> bool {
        matches!(self, LogLevel::Debug)
    }
}

/// Log at INFO level (always displayed)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        worker::console_log!("[INFO] {}", format!($($arg)*))
    };
}

/// Log at DEBUG level (only when debug mode enabled)
#[macro_export]
macro_rules! log_debug {
    ($level:expr, $($arg:tt)*) => {
        if $level.should_log_debug() {
            worker::console_log!("[DEBUG] {}", format!($($arg)*))
        }
    };
}

/// Log errors (always displayed)
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        worker::console_error!("[ERROR] {}", format!($($arg)*))
    };
}
