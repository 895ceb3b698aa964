// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Errors
//!
//! Error types for the test_configs_builder crate.
//!
//! Only the fail-fast paths produce errors: locating the vault name, talking to
//! the secret store and reading `.env`/YAML files. Environment filling degrades
//! to empty values and validation reports a verdict, so neither appears here
//! except for [`ConfigsError::IncompleteConfig`], raised by the builder when it
//! is asked to turn a failed verdict into an error.

use crate::secrets::SecretStoreError;
use thiserror::Error;

/// Errors that can occur while populating a test configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigsError {
    /// No field tagged `kvname` exists, or the tagged field is not a string.
    #[error("can not find kvname field on struct {struct_name}")]
    VaultNameNotFound { struct_name: String },

    /// The `kvname` field exists but holds an empty value.
    ///
    /// # Arguments
    ///
    /// * `struct_name` - The configuration type being filled
    /// * `field` - The field tagged `kvname`
    #[error("empty key vault name is not allowed, set a value on {struct_name}.{field}")]
    EmptyVaultName { struct_name: String, field: String },

    /// A secret store lookup failed. The fill is aborted at the first failure.
    #[error("error to load secrets from secret store - `{0}`")]
    SecretLoading(#[from] SecretStoreError),

    /// The `.env` file could not be read or parsed.
    #[error("can not read .env file: {path}")]
    EnvFileLoading { path: String },

    /// The YAML file path is unset or unreadable.
    #[error("path to yaml file not set or invalid: {path}")]
    YamlLoading { path: String },

    /// The YAML file was read but could not be decoded into the target type.
    #[error("error parsing yaml file {path}: {reason}")]
    YamlParsing { path: String, reason: String },

    /// Error that occurred while setting up the logging subsystem.
    #[error("failed to configure logging")]
    LoggingSetupError,

    /// Validation returned a negative verdict for the populated configuration.
    #[error("configuration {struct_name} is missing required values")]
    IncompleteConfig { struct_name: String },
}
