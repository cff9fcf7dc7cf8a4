// Adapters - External system implementations

pub mod probe_ffprobe;
pub mod temp_fs;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use probe_ffprobe::FFprobeAdapter;
pub use temp_fs::ScopedTempFile;
pub use toml_config::{AppConfig, TomlConfigAdapter};
