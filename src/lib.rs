// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Test Configs Builder
//!
//! `test_configs_builder` populates and validates the configuration records used
//! by infrastructure integration tests.
//!
//! A record declares, per field, where its value comes from using tags:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `env` | environment variable supplying the value |
//! | `property` | with `env`, the key to extract from a `key="value"` sequence |
//! | `kv` | secret name to fetch from the secret store |
//! | `kvname` | the field whose value names the vault used for `kv` fields |
//! | `val` | value is required but produced by the test (must be `"true"`) |
//! | `generated` | value is produced later by infrastructure (must be `"true"`) |
//!
//! ## Features
//!
//! - Environment filling from an explicit snapshot or the process environment
//! - `.env` loading from `TEST_ENV_FILE_PATH`
//! - Versioned secret lookup, latest version wins
//! - Validation with per-field diagnostics through `tracing`
//! - YAML value files
//!
//! ## Example
//!
//! ```rust
//! use test_configs_builder::{Environment, fill_from_env, test_config, validate};
//!
//! test_config! {
//!     pub struct NetworkTestConfig {
//!         #[tags(env = "RESOURCE_GROUP")]
//!         pub resource_group: String,
//!         #[tags(env = "VNET_OUTPUTS", property = "vnet_name")]
//!         pub vnet_name: String,
//!     }
//! }
//!
//! let env = Environment::from_pairs([
//!     ("RESOURCE_GROUP", "rg-network"),
//!     ("VNET_OUTPUTS", r#"vnet_name="vnet-hub" address_space="10.0.0.0/16""#),
//! ]);
//!
//! let mut cfg = NetworkTestConfig::default();
//! fill_from_env(&mut cfg, &env);
//! assert_eq!(cfg.vnet_name, "vnet-hub");
//! assert!(validate(&cfg, false));
//! ```

mod configs_builder;
pub mod env_keys;
pub mod environment;
pub mod errors;
pub mod fields;
pub mod filler;
pub mod logging;
pub mod properties;
pub mod secrets;
pub mod validation;
pub mod yaml;

pub use configs_builder::ConfigBuilder;
pub use environment::{Environment, setup_test_case};
pub use errors::ConfigsError;
pub use fields::{
    ConfigField, FieldDescriptor, FieldKind, FieldSource, FieldTags, RequiredPolicy, TestConfig,
};
pub use filler::fill_from_env;
pub use secrets::{
    InMemorySecretStore, SecretStore, SecretStoreError, SecretVersion, fill_from_secrets,
};
pub use validation::{validate, validate_report};
pub use yaml::load_yaml;
