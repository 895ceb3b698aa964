// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Configuration Builder
//!
//! This module provides the `ConfigBuilder`, which populates a test configuration
//! record and checks it before a test uses it.
//!
//! ## Pipeline
//!
//! 1. **Environment**: the builder uses the snapshot given with `environment()`.
//!    Without one, it loads the test `.env` file named by `TEST_ENV_FILE_PATH`
//!    into the process and captures the process environment.
//!
//! 2. **Environment filling**: string fields tagged `env` are filled from the
//!    snapshot, extracting a `property` from `key="value"` values when tagged.
//!
//! 3. **Secret filling**: when a secret store is configured, fields tagged `kv`
//!    are fetched from the vault named by the field tagged `kvname`.
//!
//! 4. **Validation**: every required field must hold a value. Fields tagged
//!    `generated` may stay empty when `skip_generated(true)` is set.

use crate::{
    environment::Environment,
    errors::ConfigsError,
    fields::TestConfig,
    filler::fill_from_env,
    secrets::{SecretStore, fill_from_secrets},
    validation::validate,
};
use tracing::{debug, error};

/// Builds populated test configurations.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use test_configs_builder::{ConfigBuilder, Environment, InMemorySecretStore, test_config};
///
/// test_config! {
///     pub struct DatabaseTestConfig {
///         #[tags(env = "KEY_VAULT_NAME", kvname = "true")]
///         pub key_vault: String,
///         #[tags(env = "SQL_SERVER_NAME")]
///         pub server: String,
///         #[tags(kv = "sql-admin-password")]
///         pub password: String,
///     }
/// }
///
/// let env = Environment::from_pairs([
///     ("KEY_VAULT_NAME", "kv-integration"),
///     ("SQL_SERVER_NAME", "sql-integration"),
/// ]);
/// let store = InMemorySecretStore::new().with_secret(
///     "kv-integration",
///     "sql-admin-password",
///     "v1",
///     Utc::now(),
///     "s3cr3t",
/// );
///
/// let cfg: DatabaseTestConfig = ConfigBuilder::new()
///     .environment(env)
///     .secret_store(&store)
///     .build()
///     .unwrap();
/// assert_eq!(cfg.password, "s3cr3t");
/// ```
#[derive(Default)]
pub struct ConfigBuilder<'s> {
    environment: Option<Environment>,
    store: Option<&'s dyn SecretStore>,
    skip_generated: bool,
}

impl<'s> ConfigBuilder<'s> {
    /// Creates a builder with no explicit environment, no secret store and
    /// generated fields required.
    pub fn new() -> ConfigBuilder<'s> {
        ConfigBuilder::default()
    }

    /// Uses `environment` instead of the process environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Enables secret filling from `store`.
    pub fn secret_store(mut self, store: &'s dyn SecretStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Tolerates empty fields tagged `generated` during validation.
    pub fn skip_generated(mut self, skip: bool) -> Self {
        self.skip_generated = skip;
        self
    }

    /// Runs the pipeline and returns the configuration with its verdict.
    ///
    /// # Errors
    ///
    /// Fails only when secret filling fails (`VaultNameNotFound`,
    /// `EmptyVaultName`, `SecretLoading`). A negative verdict is returned as
    /// `false`.
    pub fn populate<T>(self) -> Result<(T, bool), ConfigsError>
    where
        T: TestConfig + Default,
    {
        let environment = self
            .environment
            .unwrap_or_else(Environment::from_process_with_env_file);

        let mut cfg = T::default();
        fill_from_env(&mut cfg, &environment);

        if let Some(store) = self.store {
            if let Err(err) = fill_from_secrets(&mut cfg, store) {
                error!(
                    config = T::struct_name(),
                    error = err.to_string(),
                    "failed to fill configuration from secret store"
                );
                return Err(err);
            }
        }

        let valid = validate(&cfg, self.skip_generated);
        debug!(config = T::struct_name(), valid = valid, "configuration populated");

        Ok((cfg, valid))
    }

    /// Runs the pipeline and rejects configurations missing required values.
    ///
    /// # Errors
    ///
    /// Everything [`populate`](Self::populate) returns, plus
    /// `ConfigsError::IncompleteConfig` when validation fails.
    pub fn build<T>(self) -> Result<T, ConfigsError>
    where
        T: TestConfig + Default,
    {
        match self.populate::<T>()? {
            (cfg, true) => Ok(cfg),
            (_, false) => Err(ConfigsError::IncompleteConfig {
                struct_name: T::struct_name().to_owned(),
            }),
        }
    }
}
