//! Build settings for an object that implements `Deserialize`
//!
//! ---
//! The configuration is merged from several sources, later ones overriding
//! earlier ones:
//!
//! 1. the base file, read from the path in `DON_CONFIG_PATH` or
//!    `base_config/config.toml` by default. It must exist.
//! 2. the override file, read from the path in `DON_CONFIG_OVERRIDE_PATH` or
//!    `config/config.toml` by default, if it exists.
//! 3. the per-user configuration directory of the application, if it exists.
//! 4. environment variables carrying the given prefix.
//!
use crate::config::constants::{BASE_CONFIG_PATH, OVERRIDE_CONFIG_PATH};
use crate::error::ModelsError;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Merge the settings from the default locations.
pub fn build_don_settings<T: DeserializeOwned>(
    app_name: &str,
    env_prefix: &str,
) -> Result<T, ModelsError> {
    let config_path =
        std::env::var("DON_CONFIG_PATH").unwrap_or_else(|_| BASE_CONFIG_PATH.to_string());
    let config_override_path = std::env::var("DON_CONFIG_OVERRIDE_PATH")
        .unwrap_or_else(|_| OVERRIDE_CONFIG_PATH.to_string());
    build_don_settings_from(
        Path::new(&config_path),
        Some(Path::new(&config_override_path)),
        app_name,
        env_prefix,
    )
}

/// Merge the settings from explicit file locations.
pub fn build_don_settings_from<T: DeserializeOwned>(
    base_path: &Path,
    override_path: Option<&Path>,
    app_name: &str,
    env_prefix: &str,
) -> Result<T, ModelsError> {
    let mut builder = config::Config::builder().add_source(config::File::from(base_path));

    if let Some(path) = override_path.filter(|p| p.is_file()) {
        builder = builder.add_source(config::File::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "DonOnboarding", app_name) {
        // Portable user config loading
        let user_config_path = proj_dirs.config_dir().join("config.toml");
        if user_config_path.is_file() {
            builder = builder.add_source(config::File::from(user_config_path));
        }
    }

    builder
        .add_source(config::Environment::with_prefix(env_prefix).separator("__"))
        .build()
        .and_then(|s| s.try_deserialize())
        .map_err(|e| ModelsError::SettingsError(e.to_string()))
}
