// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # YAML
//!
//! Loads test values from a YAML file into any deserializable record. Use
//! `#[serde(deny_unknown_fields)]` on the target to reject unexpected keys.

use crate::errors::ConfigsError;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use tracing::{debug, error};

/// Reads `path` and decodes it into `T`.
///
/// # Errors
///
/// - `ConfigsError::YamlLoading` if the file can not be read
/// - `ConfigsError::YamlParsing` if the content is not valid YAML for `T`
pub fn load_yaml<T>(path: impl AsRef<Path>) -> Result<T, ConfigsError>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let shown = path.display().to_string();

    let contents = fs::read_to_string(path).map_err(|err| {
        error!(path = shown.as_str(), error = err.to_string(), "failed to read yaml file");
        ConfigsError::YamlLoading {
            path: shown.clone(),
        }
    })?;

    let values = serde_yaml::from_str(&contents).map_err(|err| ConfigsError::YamlParsing {
        path: shown.clone(),
        reason: err.to_string(),
    })?;
    debug!(path = shown.as_str(), "loaded yaml values");

    Ok(values)
}
