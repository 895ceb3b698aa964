// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Filler
//!
//! Populates the string fields of a test configuration from an [`Environment`].
//!
//! Filling is best effort: an unset variable yields an empty field and a missing
//! `property` yields an empty field plus a warning. Gaps are left for
//! [`validate`](crate::validation::validate) to report.

use crate::{
    environment::Environment,
    fields::{FieldSource, TestConfig, described_mut},
    properties::property_value,
};
use tracing::{debug, warn};

/// Fills every string field tagged `env` from `env`.
///
/// With a `property` tag, the variable is read as a `key="value"` sequence and
/// only the named property is stored. Fields without an `env` tag, and fields
/// that are not strings, are left untouched.
pub fn fill_from_env<'c, T>(config: &'c mut T, env: &Environment) -> &'c mut T
where
    T: TestConfig,
{
    for (descriptor, field) in described_mut(config) {
        let (key, property) = match descriptor.env_source() {
            Some(FieldSource::Env { var }) => (var, None),
            Some(FieldSource::EnvProperty { var, property }) => (var, Some(property)),
            _ => continue,
        };
        let Some(slot) = field.as_mut_string() else {
            continue;
        };

        let raw = env.get_or_empty(key);
        *slot = match property {
            None => raw.to_owned(),
            Some(property) => property_value(raw, property).unwrap_or_else(|| {
                warn!(
                    field = descriptor.name(),
                    env = key,
                    property = property,
                    "could not find property in environment value"
                );
                String::new()
            }),
        };
        debug!(field = descriptor.name(), env = key, "filled field from environment");
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_config;
    use tracing_test::traced_test;

    test_config! {
        struct StorageConfig {
            #[tags(env = "RESOURCE_GROUP")]
            resource_group: String,
            #[tags(env = "STORAGE_OUTPUTS", property = "key2")]
            second: String,
            #[tags(env = "STORAGE_OUTPUTS", property = "missing")]
            missing: String,
            #[tags(env = "UNSET_VARIABLE")]
            unset: String,
            #[tags(kv = "storage-key")]
            untagged_env: String,
            #[tags(env = "RETRIES")]
            retries: i32,
        }
    }

    fn environment() -> Environment {
        Environment::from_pairs([
            ("RESOURCE_GROUP", "rg-integration"),
            ("STORAGE_OUTPUTS", r#"key1="A" key2="B""#),
            ("RETRIES", "3"),
        ])
    }

    #[test]
    fn copies_env_values_verbatim() {
        let mut cfg = StorageConfig::default();
        fill_from_env(&mut cfg, &environment());
        assert_eq!(cfg.resource_group, "rg-integration");
    }

    #[test]
    #[traced_test]
    fn extracts_properties() {
        let mut cfg = StorageConfig::default();
        fill_from_env(&mut cfg, &environment());
        assert_eq!(cfg.second, "B");
        assert_eq!(cfg.missing, "");
        assert!(logs_contain("could not find property in environment value"));
        assert!(logs_contain("property=\"missing\""));
    }

    #[test]
    #[traced_test]
    fn found_properties_are_not_warned_about() {
        let mut cfg = StorageConfig::default();
        let env = Environment::from_pairs([("STORAGE_OUTPUTS", r#"key2="B" missing="M""#)]);
        fill_from_env(&mut cfg, &env);
        assert_eq!(cfg.missing, "M");
        assert!(!logs_contain("could not find property"));
    }

    #[test]
    fn unset_variables_clear_the_field() {
        let mut cfg = StorageConfig {
            unset: "stale".into(),
            ..Default::default()
        };
        fill_from_env(&mut cfg, &environment());
        assert_eq!(cfg.unset, "");
    }

    #[test]
    fn leaves_untagged_and_non_string_fields_alone() {
        let mut cfg = StorageConfig {
            untagged_env: "from-before".into(),
            ..Default::default()
        };
        let filled = fill_from_env(&mut cfg, &environment());
        assert_eq!(filled.untagged_env, "from-before");
        assert_eq!(filled.retries, 0);
    }
}
