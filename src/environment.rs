// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Environment
//!
//! An explicit snapshot of environment variables handed to the field filler, and
//! the helpers that load a test `.env` file before the snapshot is taken.
//!
//! The `.env` file to load is named by the `TEST_ENV_FILE_PATH` environment
//! variable and defaults to `./.env`. A missing file is not fatal for test setup:
//! values the test relies on are checked later by validation.

use crate::{
    env_keys::{DEFAULT_ENV_FILE_NAME, TEST_ENV_FILE_PATH},
    errors::ConfigsError,
};
use dotenvy::{from_filename, from_filename_iter};
use std::{collections::BTreeMap, env, path::Path};
use tracing::{debug, warn};

/// Read-only key-value view of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Captures the current process environment. Variables that are not valid
    /// unicode are skipped.
    pub fn from_process() -> Environment {
        Environment {
            vars: env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Loads the test `.env` file into the process (see [`load_env_file`]) and
    /// then captures the process environment. A load failure is logged only.
    pub fn from_process_with_env_file() -> Environment {
        setup_test_case();
        Environment::from_process()
    }

    /// Builds a snapshot from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Environment
    where
        K: Into<String>,
        V: Into<String>,
    {
        Environment {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reads a `.env` file into a snapshot without touching the process
    /// environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Environment, ConfigsError> {
        let path = path.as_ref();
        let err = || ConfigsError::EnvFileLoading {
            path: path.display().to_string(),
        };

        let mut vars = BTreeMap::new();
        for item in from_filename_iter(path).map_err(|_| err())? {
            let (key, value) = item.map_err(|_| err())?;
            vars.insert(key, value);
        }
        Ok(Environment { vars })
    }

    /// Value of `key`, or `None` when unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key`, or an empty string when unset.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Overlays `other` on top of this snapshot; `other` wins on conflicts.
    pub fn merge(mut self, other: Environment) -> Environment {
        self.vars.extend(other.vars);
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Path of the test `.env` file: `TEST_ENV_FILE_PATH` or `./.env`.
pub fn env_file_path() -> String {
    match env::var(TEST_ENV_FILE_PATH) {
        Ok(path) if !path.is_empty() => path,
        _ => DEFAULT_ENV_FILE_NAME.to_owned(),
    }
}

/// Loads the test `.env` file into the process environment.
///
/// Variables already present in the process are not overridden.
pub fn load_env_file() -> Result<(), ConfigsError> {
    let path = env_file_path();
    match from_filename(&path) {
        Ok(_) => {
            debug!(path = path.as_str(), "loaded test env file");
            Ok(())
        }
        Err(err) => {
            warn!(path = path.as_str(), error = err.to_string(), "can not read .env file");
            Err(ConfigsError::EnvFileLoading { path })
        }
    }
}

/// Prepares the process environment for a test.
///
/// A missing `.env` file does not fail the test; if required variables are
/// absent, validation of the test configuration reports them.
pub fn setup_test_case() {
    load_env_file().ok();
}
