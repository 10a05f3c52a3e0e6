pub mod config;
pub mod field_path;
pub mod text_processing;

pub use config::{API_KEY_ENV, ConfigError, URL_ENV, normalize_base_url, resolve_credentials};
pub use field_path::{FieldPath, FieldPathError, PathSegment};
pub use text_processing::{preview_value, redact_sensitive, redact_sensitive_with, truncate_for_summary};
