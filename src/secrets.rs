// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Secrets
//!
//! Populates `kv`-tagged fields of a test configuration from a secret store.
//!
//! The store instance (vault) is named by the value of the field tagged `kvname`,
//! so environment filling normally runs first. Secret filling is fail-fast: a
//! missing or empty vault name, or any store error, aborts the fill. Fields
//! written before the failure keep their new values.
//!
//! Secrets are versioned. A lookup lists the versions of a secret, selects the
//! one with the most recent `updated` timestamp and fetches its value. When two
//! versions share the latest timestamp, which one is selected is unspecified.

use crate::{
    errors::ConfigsError,
    fields::{TestConfig, described, described_mut},
};
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;
use tracing::{debug, error};

/// Errors reported by a [`SecretStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreError {
    #[error("vault {vault} is unreachable: {reason}")]
    VaultUnreachable { vault: String, reason: String },

    #[error("secret {secret} was not found in vault {vault}")]
    SecretNotFound { vault: String, secret: String },

    #[error("secret {secret} in vault {vault} has no versions")]
    NoVersions { vault: String, secret: String },

    #[error("version {version} of secret {secret} was not found in vault {vault}")]
    VersionNotFound {
        vault: String,
        secret: String,
        version: String,
    },
}

/// One immutable, timestamped snapshot of a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersion {
    pub id: String,
    pub updated: DateTime<Utc>,
}

/// Returns the version with the latest `updated` timestamp.
///
/// Ties are broken arbitrarily; callers must not rely on which of several
/// equally recent versions is returned.
pub fn latest_version(versions: &[SecretVersion]) -> Option<&SecretVersion> {
    versions.iter().max_by_key(|v| v.updated)
}

/// A versioned secret store keyed by vault name and secret name.
pub trait SecretStore {
    /// Lists every version of `secret` in `vault`.
    fn list_versions(
        &self,
        vault: &str,
        secret: &str,
    ) -> Result<Vec<SecretVersion>, SecretStoreError>;

    /// Fetches the value of `secret` at `version`.
    fn get_version(
        &self,
        vault: &str,
        secret: &str,
        version: &str,
    ) -> Result<String, SecretStoreError>;

    /// Fetches the current value of `secret`, i.e. its most recently updated
    /// version.
    fn get_secret(&self, vault: &str, secret: &str) -> Result<String, SecretStoreError> {
        let versions = self.list_versions(vault, secret)?;
        let Some(latest) = latest_version(&versions) else {
            return Err(SecretStoreError::NoVersions {
                vault: vault.to_owned(),
                secret: secret.to_owned(),
            });
        };
        debug!(
            vault = vault,
            secret = secret,
            version = latest.id.as_str(),
            "resolved secret version"
        );
        self.get_version(vault, secret, &latest.id)
    }
}

type SecretKey = (String, String);

/// In-process [`SecretStore`] for tests and local runs.
///
/// Only vaults that received at least one secret exist; lookups in any other
/// vault fail with [`SecretStoreError::VaultUnreachable`].
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: HashMap<SecretKey, Vec<(SecretVersion, String)>>,
    lookups: AtomicUsize,
}

impl InMemorySecretStore {
    pub fn new() -> InMemorySecretStore {
        InMemorySecretStore::default()
    }

    /// Adds `value` as version `version` of `secret` in `vault`.
    pub fn with_secret(
        mut self,
        vault: &str,
        secret: &str,
        version: &str,
        updated: DateTime<Utc>,
        value: &str,
    ) -> Self {
        self.secrets
            .entry((vault.to_owned(), secret.to_owned()))
            .or_default()
            .push((
                SecretVersion {
                    id: version.to_owned(),
                    updated,
                },
                value.to_owned(),
            ));
        self
    }

    /// Number of store calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    fn entries(
        &self,
        vault: &str,
        secret: &str,
    ) -> Result<&[(SecretVersion, String)], SecretStoreError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        if !self.secrets.keys().any(|(v, _)| v == vault) {
            return Err(SecretStoreError::VaultUnreachable {
                vault: vault.to_owned(),
                reason: "unknown vault".to_owned(),
            });
        }

        self.secrets
            .get(&(vault.to_owned(), secret.to_owned()))
            .map(Vec::as_slice)
            .ok_or_else(|| SecretStoreError::SecretNotFound {
                vault: vault.to_owned(),
                secret: secret.to_owned(),
            })
    }
}

impl SecretStore for InMemorySecretStore {
    fn list_versions(
        &self,
        vault: &str,
        secret: &str,
    ) -> Result<Vec<SecretVersion>, SecretStoreError> {
        Ok(self
            .entries(vault, secret)?
            .iter()
            .map(|(version, _)| version.clone())
            .collect())
    }

    fn get_version(
        &self,
        vault: &str,
        secret: &str,
        version: &str,
    ) -> Result<String, SecretStoreError> {
        self.entries(vault, secret)?
            .iter()
            .find(|(v, _)| v.id == version)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| SecretStoreError::VersionNotFound {
                vault: vault.to_owned(),
                secret: secret.to_owned(),
                version: version.to_owned(),
            })
    }
}

/// Returns the vault name held by the first string field tagged `kvname`.
///
/// A `kvname` tag with an empty value does not mark a field.
pub fn vault_name<T>(config: &T) -> Result<String, ConfigsError>
where
    T: TestConfig,
{
    resolve_vault(config).map(|(_, name)| name)
}

/// Like [`vault_name`], also returning the position of the vault field.
fn resolve_vault<T>(config: &T) -> Result<(usize, String), ConfigsError>
where
    T: TestConfig,
{
    let struct_name = T::struct_name();
    let found = described(config)
        .enumerate()
        .find_map(|(index, (descriptor, field))| {
            descriptor.tags().kvname().filter(|v| !v.is_empty())?;
            field.as_str().map(|name| (index, descriptor.name(), name))
        });

    match found {
        None => Err(ConfigsError::VaultNameNotFound {
            struct_name: struct_name.to_owned(),
        }),
        Some((_, field, "")) => Err(ConfigsError::EmptyVaultName {
            struct_name: struct_name.to_owned(),
            field: field.to_owned(),
        }),
        Some((index, _, name)) => Ok((index, name.to_owned())),
    }
}

/// Fills every string field carrying a non-empty `kv` tag from `store`.
///
/// The vault is resolved with [`vault_name`] before the store is contacted. The
/// vault field itself keeps its value even when it also carries `kv`.
pub fn fill_from_secrets<'c, T, S>(
    config: &'c mut T,
    store: &S,
) -> Result<&'c mut T, ConfigsError>
where
    T: TestConfig,
    S: SecretStore + ?Sized,
{
    let (vault_index, vault) = resolve_vault(&*config)?;

    for (index, (descriptor, field)) in described_mut(config).enumerate() {
        if index == vault_index {
            continue;
        }
        let Some(secret) = descriptor.secret_name() else {
            continue;
        };
        let Some(slot) = field.as_mut_string() else {
            continue;
        };

        *slot = store.get_secret(&vault, secret).map_err(|err| {
            error!(
                field = descriptor.name(),
                vault = vault.as_str(),
                secret = secret,
                error = err.to_string(),
                "failed to load secret"
            );
            err
        })?;
        debug!(field = descriptor.name(), secret = secret, "filled field from secret store");
    }

    Ok(config)
}
