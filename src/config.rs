use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CareCompanion";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides the guideline table location.
pub const GUIDELINES_ENV: &str = "CARECOMPANION_GUIDELINES";

/// Get the application data directory
/// ~/CareCompanion/ on all platforms, or the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the directory holding reference data files
pub fn data_dir() -> PathBuf {
    app_data_dir().join("data")
}

/// Resolve the guideline table path.
/// `CARECOMPANION_GUIDELINES` wins when set and non-empty.
pub fn guidelines_path() -> PathBuf {
    match std::env::var(GUIDELINES_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => data_dir().join("guidelines.json"),
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,carecompanion_lib=debug"
}
