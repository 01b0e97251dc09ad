use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::{RequestSpec, TomlRequestFile};

/// Loads the ordered request list from a `.json` or `.toml` file.
///
/// JSON files hold a top-level array of request objects; TOML files hold a
/// `[[requests]]` array. Methods are not validated here.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not well formed, or has
/// an unsupported extension.
pub fn load_request_specs(path: &Path) -> AppResult<Vec<RequestSpec>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("toml") => toml::from_str::<TomlRequestFile>(&content)
            .map(|file| file.requests)
            .map_err(|err| {
                AppError::config(ConfigError::ParseToml {
                    path: path.to_path_buf(),
                    source: err,
                })
            }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}
