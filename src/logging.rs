// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Logging
//!
//! Installs a `tracing` subscriber so field diagnostics show up in test output.
//! The filter is read from `RUST_LOG` and defaults to `info`.

use crate::{env_keys::DEFAULT_LOG_FILTER, errors::ConfigsError};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. Calling it again after a successful install
/// is a no-op.
///
/// The crate's unit tests capture logs with `tracing-test`, which owns the
/// global subscriber of that test binary, so `install` is covered from
/// `tests/populate.rs` instead.
pub fn install() -> Result<(), ConfigsError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .map_err(|err| {
            error!(error = err.to_string(), "invalid log filter");
            ConfigsError::LoggingSetupError
        })?;

    match fmt().with_env_filter(filter).with_test_writer().try_init() {
        Ok(()) => Ok(()),
        Err(err) if tracing::dispatcher::has_been_set() => {
            tracing::debug!(error = err.to_string(), "logging already installed");
            Ok(())
        }
        Err(_) => Err(ConfigsError::LoggingSetupError),
    }
}
