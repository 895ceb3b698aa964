// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Validation
//!
//! Checks that a populated test configuration holds every value it requires.
//!
//! Validation never fails: it returns a verdict and logs a warning for each
//! field found wanting. Whether a negative verdict fails the test is up to the
//! caller.
//!
//! Per field, in declaration order:
//!
//! | Field | Outcome |
//! |-------|---------|
//! | `val`/`generated` tag not `"true"` | invalid |
//! | empty string without `env`, `kv` or `val` | optional, ignored |
//! | empty string, `generated` with `env` or `kv`, skipping generated | skipped |
//! | empty string otherwise | invalid |
//! | `None` map or sequence | invalid unless tagged `val` |
//! | bool, fixed-width integer | valid |
//! | anything else | whole record invalid, stop |

use crate::fields::{
    ConfigField, FieldDescriptor, FieldKind, RequiredPolicy, TestConfig, described,
};
use tracing::warn;

/// Why a field was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    InvalidTag { tag: &'static str, value: String },
    /// Empty `generated` field tolerated because generated fields are skipped.
    SkippedGenerated,
    MissingSecret { secret: String },
    MissingValue,
    MissingEnv { env: String },
    /// Unset map or sequence. `tolerated` is true for `val`-tagged fields.
    NilCollection { tolerated: bool },
    UnsupportedKind { type_name: &'static str },
}

impl IssueKind {
    /// Whether this issue makes the verdict negative.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            IssueKind::SkippedGenerated | IssueKind::NilCollection { tolerated: true }
        )
    }
}

/// A diagnostic for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub kind: IssueKind,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<FieldIssue>,
}

/// Returns whether every required field of `config` is populated.
///
/// With `skip_generated`, empty fields tagged `generated` (together with `env`
/// or `kv`) are tolerated.
pub fn validate<T>(config: &T, skip_generated: bool) -> bool
where
    T: TestConfig,
{
    validate_report(config, skip_generated).valid
}

/// Same as [`validate`], also returning the per-field diagnostics.
pub fn validate_report<T>(config: &T, skip_generated: bool) -> ValidationReport
where
    T: TestConfig,
{
    let mut report = ValidationReport {
        valid: true,
        issues: Vec::new(),
    };

    for (descriptor, field) in described(config) {
        let Some(kind) = check_field(descriptor, field, skip_generated) else {
            continue;
        };

        log_issue(T::struct_name(), descriptor, &kind);
        let unsupported = matches!(kind, IssueKind::UnsupportedKind { .. });
        report.valid &= !kind.is_failure();
        report.issues.push(FieldIssue {
            field: descriptor.name(),
            kind,
        });

        if unsupported {
            break;
        }
    }

    report
}

fn check_field(
    descriptor: &FieldDescriptor,
    field: &dyn ConfigField,
    skip_generated: bool,
) -> Option<IssueKind> {
    let tags = descriptor.tags();

    if let Some((tag, value)) = tags.invalid_tag() {
        return Some(IssueKind::InvalidTag {
            tag,
            value: value.to_owned(),
        });
    }

    match field.kind() {
        FieldKind::String => {
            if !field.as_str().is_some_and(str::is_empty) || !tags.any_source() {
                return None;
            }

            if skip_generated && descriptor.required_policy() == RequiredPolicy::Generated {
                Some(IssueKind::SkippedGenerated)
            } else if let Some(secret) = tags.kv() {
                Some(IssueKind::MissingSecret {
                    secret: secret.to_owned(),
                })
            } else if tags.is_val() {
                Some(IssueKind::MissingValue)
            } else {
                Some(IssueKind::MissingEnv {
                    env: tags.env().unwrap_or_default().to_owned(),
                })
            }
        }
        FieldKind::Map | FieldKind::Sequence => field.is_nil().then(|| IssueKind::NilCollection {
            tolerated: tags.is_val(),
        }),
        FieldKind::Bool | FieldKind::Integer => None,
        FieldKind::Unsupported(type_name) => Some(IssueKind::UnsupportedKind { type_name }),
    }
}

fn log_issue(struct_name: &str, descriptor: &FieldDescriptor, kind: &IssueKind) {
    let field = descriptor.name();
    match kind {
        IssueKind::InvalidTag { tag, value } => warn!(
            config = struct_name,
            field = field,
            tag = *tag,
            value = value.as_str(),
            "field has an invalid tag, value should be true"
        ),
        IssueKind::SkippedGenerated => warn!(
            config = struct_name,
            field = field,
            "field doesn't have any value (generated, skipped)"
        ),
        IssueKind::MissingSecret { secret } => warn!(
            config = struct_name,
            field = field,
            kv = secret.as_str(),
            "field doesn't have any value"
        ),
        IssueKind::MissingValue => {
            warn!(config = struct_name, field = field, "field doesn't have any value")
        }
        IssueKind::MissingEnv { env } => warn!(
            config = struct_name,
            field = field,
            env = env.as_str(),
            "field doesn't have any value"
        ),
        IssueKind::NilCollection { .. } => {
            warn!(config = struct_name, field = field, "collection field doesn't have any value")
        }
        IssueKind::UnsupportedKind { type_name } => warn!(
            config = struct_name,
            field = field,
            kind = *type_name,
            "field kind is not allowed in test configurations"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_config;
    use std::collections::HashMap;

    test_config! {
        struct GeneratedConfig {
            #[tags(env = "AKS_NAME", generated = "true")]
            cluster: String,
        }
    }

    test_config! {
        struct GeneratedSecretConfig {
            #[tags(kv = "admin-password", generated = "true")]
            password: String,
        }
    }

    test_config! {
        struct OptionalConfig {
            notes: String,
            enabled: bool,
            node_count: i32,
            max_pods: i64,
        }
    }

    test_config! {
        struct MapConfig {
            labels: Option<HashMap<String, String>>,
        }
    }

    test_config! {
        struct TolerantMapConfig {
            #[tags(val = "true")]
            labels: Option<HashMap<String, String>>,
            #[tags(val = "true")]
            zones: Option<Vec<String>>,
        }
    }

    test_config! {
        struct FloatConfig {
            #[tags(env = "NAME")]
            name: String,
            ratio: f64,
            #[tags(env = "LATER")]
            later: String,
        }
    }

    test_config! {
        struct BadTagConfig {
            #[tags(env = "NAME", val = "false")]
            name: String,
        }
    }

    test_config! {
        struct MixedConfig {
            #[tags(env = "ENV_VALUE")]
            from_env: String,
            #[tags(kv = "secret")]
            from_kv: String,
            #[tags(val = "true")]
            computed: String,
            zones: Option<Vec<String>>,
            #[tags(val = "true")]
            tolerated: Option<Vec<String>>,
        }
    }

    #[test]
    fn generated_env_field_is_skipped_only_when_requested() {
        let cfg = GeneratedConfig::default();

        let report = validate_report(&cfg, true);
        assert!(report.valid);
        assert_eq!(report.issues[0].kind, IssueKind::SkippedGenerated);

        let report = validate_report(&cfg, false);
        assert!(!report.valid);
        assert_eq!(
            report.issues[0].kind,
            IssueKind::MissingEnv {
                env: "AKS_NAME".into()
            }
        );
    }

    #[test]
    fn generated_secret_field_is_skipped_only_when_requested() {
        let cfg = GeneratedSecretConfig::default();
        assert!(validate(&cfg, true));
        assert!(!validate(&cfg, false));
    }

    #[test]
    fn untagged_and_scalar_fields_are_always_valid() {
        let report = validate_report(&OptionalConfig::default(), false);
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn nil_map_fails_unless_tagged_val() {
        assert!(!validate(&MapConfig::default(), false));
        assert!(validate(&TolerantMapConfig::default(), false));
        assert!(validate(
            &MapConfig {
                labels: Some(HashMap::new())
            },
            false
        ));
    }

    #[test]
    fn unsupported_kind_stops_validation() {
        let cfg = FloatConfig {
            name: "set".into(),
            ..Default::default()
        };
        let report = validate_report(&cfg, false);
        assert!(!report.valid);
        assert_eq!(
            report.issues,
            vec![FieldIssue {
                field: "ratio",
                kind: IssueKind::UnsupportedKind { type_name: "f64" },
            }]
        );
    }

    #[test]
    fn invalid_tag_fails_regardless_of_value() {
        let cfg = BadTagConfig {
            name: "populated".into(),
        };
        let report = validate_report(&cfg, true);
        assert!(!report.valid);
        assert_eq!(
            report.issues[0].kind,
            IssueKind::InvalidTag {
                tag: "val",
                value: "false".into()
            }
        );
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let report = validate_report(&MixedConfig::default(), false);
        assert!(!report.valid);
        let kinds: Vec<_> = report.issues.into_iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingEnv {
                    env: "ENV_VALUE".into()
                },
                IssueKind::MissingSecret {
                    secret: "secret".into()
                },
                IssueKind::MissingValue,
                IssueKind::NilCollection { tolerated: false },
                IssueKind::NilCollection { tolerated: true },
            ]
        );
    }

    #[test]
    fn tolerated_field_does_not_reset_earlier_failure() {
        let cfg = MixedConfig {
            from_env: "a".into(),
            from_kv: "b".into(),
            computed: "c".into(),
            zones: None,
            tolerated: None,
        };
        assert!(!validate(&cfg, false));
    }

    #[test]
    fn populated_config_is_valid() {
        let cfg = MixedConfig {
            from_env: "a".into(),
            from_kv: "b".into(),
            computed: "c".into(),
            zones: Some(vec![]),
            tolerated: None,
        };
        assert!(validate(&cfg, false));
    }
}
