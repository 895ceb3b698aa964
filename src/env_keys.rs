// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Environment Keys
//!
//! Environment variable keys and field tag names shared across the crate.

/// Environment variable holding the path of the `.env` file loaded before a test.
pub const TEST_ENV_FILE_PATH: &str = "TEST_ENV_FILE_PATH";

/// File loaded when `TEST_ENV_FILE_PATH` is not set.
pub const DEFAULT_ENV_FILE_NAME: &str = "./.env";

/// Filter directive used by the logging subscriber when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Field tag names
pub const ENV_TAG: &str = "env";
pub const PROPERTY_TAG: &str = "property";
pub const KV_TAG: &str = "kv";
pub const KV_NAME_TAG: &str = "kvname";
pub const VAL_TAG: &str = "val";
pub const GENERATED_TAG: &str = "generated";

/// The only accepted value for the `val` and `generated` tags.
pub const TRUE_TAG_VALUE: &str = "true";
