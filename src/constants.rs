// Centralized magic numbers & default values
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 4096;
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_TEMPLATE_KEY: &str = "default";
pub const DEFAULT_TEMPLATE_PATTERN: &str = "{0}";
pub const ERROR_TEMPLATE_KEY: &str = "error";
pub const DEFAULT_CONTAINER_TAG: &str = "div";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const MAX_BACKOFF_JITTER_MS: u64 = 1000;
