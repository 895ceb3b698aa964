// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Fields
//!
//! Field introspection for test configuration records.
//!
//! A configuration record exposes its fields through the [`TestConfig`] trait: a
//! descriptor list (field name plus [`FieldTags`]) built once per type, and a view
//! of every field value in declaration order. Field values implement
//! [`ConfigField`], which reports the [`FieldKind`] and, for strings, gives access
//! to the underlying `String`.
//!
//! The [`test_config!`](crate::test_config) macro declares a record and generates
//! the trait implementation:
//!
//! ```rust
//! use test_configs_builder::test_config;
//!
//! test_config! {
//!     pub struct StorageTestConfig {
//!         #[tags(env = "RESOURCE_GROUP")]
//!         pub resource_group: String,
//!         #[tags(env = "STORAGE_OUTPUTS", property = "account_name")]
//!         pub account_name: String,
//!         #[tags(env = "KEY_VAULT_NAME", kvname = "true")]
//!         pub key_vault: String,
//!         #[tags(kv = "storage-key", generated = "true")]
//!         pub account_key: String,
//!     }
//! }
//! ```

use crate::env_keys::{
    ENV_TAG, GENERATED_TAG, KV_NAME_TAG, KV_TAG, PROPERTY_TAG, TRUE_TAG_VALUE, VAL_TAG,
};
use std::collections::{BTreeMap, HashMap};

/// The kind of value a configuration field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Map,
    Sequence,
    Bool,
    Integer,
    /// Any kind the populator does not accept. Carries the Rust type name.
    Unsupported(&'static str),
}

/// A value stored in a configuration record.
///
/// Mapping and sequence fields are modelled as `Option<..>`, `None` being the
/// "not populated" state.
pub trait ConfigField {
    fn kind(&self) -> FieldKind;

    /// Whether a mapping or sequence field is unset.
    fn is_nil(&self) -> bool {
        false
    }

    fn as_str(&self) -> Option<&str> {
        None
    }

    fn as_mut_string(&mut self) -> Option<&mut String> {
        None
    }
}

impl ConfigField for String {
    fn kind(&self) -> FieldKind {
        FieldKind::String
    }

    fn as_str(&self) -> Option<&str> {
        Some(String::as_str(self))
    }

    fn as_mut_string(&mut self) -> Option<&mut String> {
        Some(self)
    }
}

impl<K, V, S> ConfigField for Option<HashMap<K, V, S>> {
    fn kind(&self) -> FieldKind {
        FieldKind::Map
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<K, V> ConfigField for Option<BTreeMap<K, V>> {
    fn kind(&self) -> FieldKind {
        FieldKind::Map
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T> ConfigField for Option<Vec<T>> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence
    }

    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl ConfigField for bool {
    fn kind(&self) -> FieldKind {
        FieldKind::Bool
    }
}

macro_rules! impl_config_field {
    ($kind:expr => $($ty:ty),+) => {
        $(
            impl ConfigField for $ty {
                fn kind(&self) -> FieldKind {
                    $kind
                }
            }
        )+
    };
}

impl_config_field!(FieldKind::Integer => i8, i16, i32, i64, u8, u16, u32, u64);
impl_config_field!(FieldKind::Unsupported("f32") => f32);
impl_config_field!(FieldKind::Unsupported("f64") => f64);
impl_config_field!(FieldKind::Unsupported("char") => char);
impl_config_field!(FieldKind::Unsupported("isize") => isize);
impl_config_field!(FieldKind::Unsupported("usize") => usize);

/// The tags attached to a single field.
///
/// Tag values are kept verbatim so that invalid values (e.g. `val = "yes"`)
/// can be reported by the validator instead of being rejected at declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    env: Option<String>,
    property: Option<String>,
    kv: Option<String>,
    kvname: Option<String>,
    val: Option<String>,
    generated: Option<String>,
}

impl FieldTags {
    pub fn new() -> FieldTags {
        FieldTags::default()
    }

    /// Sets the tag `name` to `value`. Unknown tag names are ignored.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        let value = Some(value.to_owned());
        match name {
            ENV_TAG => self.env = value,
            PROPERTY_TAG => self.property = value,
            KV_TAG => self.kv = value,
            KV_NAME_TAG => self.kvname = value,
            VAL_TAG => self.val = value,
            GENERATED_TAG => self.generated = value,
            _ => {}
        }
        self
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn kv(&self) -> Option<&str> {
        self.kv.as_deref()
    }

    pub fn kvname(&self) -> Option<&str> {
        self.kvname.as_deref()
    }

    pub fn is_val(&self) -> bool {
        self.val.is_some()
    }

    pub fn is_generated(&self) -> bool {
        self.generated.is_some()
    }

    /// Whether the field declares a source or a validation requirement.
    pub fn any_source(&self) -> bool {
        self.env.is_some() || self.kv.is_some() || self.val.is_some()
    }

    /// Returns the first tag whose value is not the literal `"true"`, among the
    /// flag-like tags `val` and `generated`.
    pub fn invalid_tag(&self) -> Option<(&'static str, &str)> {
        [(VAL_TAG, &self.val), (GENERATED_TAG, &self.generated)]
            .into_iter()
            .find_map(|(name, value)| match value.as_deref() {
                Some(v) if v != TRUE_TAG_VALUE => Some((name, v)),
                _ => None,
            })
    }
}

/// One place a field's value comes from. A field may have several, see
/// [`FieldDescriptor::sources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource<'t> {
    Env { var: &'t str },
    /// A property of the `key="value"` sequence held by `var`.
    EnvProperty { var: &'t str, property: &'t str },
    Secret { name: &'t str },
    /// Validated but produced by the test itself (`val` tag).
    Computed,
}

/// How the validator treats an empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredPolicy {
    Optional,
    Required,
    /// Empty values are tolerated when validation skips generated fields.
    Generated,
    InvalidTag,
}

/// Static description of one field of a configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    tags: FieldTags,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, tags: FieldTags) -> FieldDescriptor {
        FieldDescriptor { name, tags }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tags(&self) -> &FieldTags {
        &self.tags
    }

    /// Sources in the order the fillers apply them: environment first, then the
    /// secret store. A field tagged with both `env` and `kv` ends up holding
    /// the secret. An empty list means the field is never written.
    pub fn sources(&self) -> Vec<FieldSource<'_>> {
        let tags = &self.tags;
        let mut sources = Vec::with_capacity(2);
        match (tags.env(), tags.property()) {
            (Some(var), Some(property)) => sources.push(FieldSource::EnvProperty { var, property }),
            (Some(var), None) => sources.push(FieldSource::Env { var }),
            _ => {}
        }
        if let Some(name) = tags.kv().filter(|kv| !kv.is_empty()) {
            sources.push(FieldSource::Secret { name });
        }
        if sources.is_empty() && tags.is_val() {
            sources.push(FieldSource::Computed);
        }
        sources
    }

    /// The environment source of the field, if any.
    pub fn env_source(&self) -> Option<FieldSource<'_>> {
        self.sources().into_iter().find(|source| {
            matches!(
                source,
                FieldSource::Env { .. } | FieldSource::EnvProperty { .. }
            )
        })
    }

    /// The secret name of the field, if it has a non-empty `kv` tag.
    pub fn secret_name(&self) -> Option<&str> {
        self.sources().into_iter().find_map(|source| match source {
            FieldSource::Secret { name } => Some(name),
            _ => None,
        })
    }

    pub fn required_policy(&self) -> RequiredPolicy {
        let tags = &self.tags;
        if tags.invalid_tag().is_some() {
            RequiredPolicy::InvalidTag
        } else if !tags.any_source() {
            RequiredPolicy::Optional
        } else if tags.is_generated() && (tags.env().is_some() || tags.kv().is_some()) {
            RequiredPolicy::Generated
        } else {
            RequiredPolicy::Required
        }
    }
}

/// A configuration record that can be populated and validated.
///
/// `descriptors`, `fields` and `fields_mut` must list the same fields in the
/// same (declaration) order. Use [`test_config!`](crate::test_config) rather
/// than implementing this by hand.
pub trait TestConfig {
    fn struct_name() -> &'static str;

    fn descriptors() -> &'static [FieldDescriptor];

    fn fields(&self) -> Vec<&dyn ConfigField>;

    fn fields_mut(&mut self) -> Vec<&mut dyn ConfigField>;
}

/// Pairs each descriptor of `T` with the matching field of `config`.
pub(crate) fn described<T: TestConfig>(
    config: &T,
) -> impl Iterator<Item = (&'static FieldDescriptor, &dyn ConfigField)> {
    T::descriptors().iter().zip(config.fields())
}

/// Mutable counterpart of [`described`].
pub(crate) fn described_mut<T: TestConfig>(
    config: &mut T,
) -> impl Iterator<Item = (&'static FieldDescriptor, &mut dyn ConfigField)> {
    T::descriptors().iter().zip(config.fields_mut())
}

/// Declares a configuration record and implements [`TestConfig`] for it.
///
/// Each field may carry one `#[tags(..)]` attribute listing `name = "value"`
/// pairs from the tag vocabulary: `env`, `property`, `kv`, `kvname`, `val`,
/// `generated`. The record also derives `Debug`, `Clone` and `Default`.
#[macro_export]
macro_rules! test_config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[tags($($tag:ident = $value:literal),* $(,)?)])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::TestConfig for $name {
            fn struct_name() -> &'static str {
                stringify!($name)
            }

            fn descriptors() -> &'static [$crate::FieldDescriptor] {
                static DESCRIPTORS: ::std::sync::OnceLock<::std::vec::Vec<$crate::FieldDescriptor>> =
                    ::std::sync::OnceLock::new();
                DESCRIPTORS.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::FieldDescriptor::new(
                                stringify!($field),
                                $crate::FieldTags::new()
                                    $($(.with(stringify!($tag), $value))*)?,
                            ),
                        )*
                    ]
                })
            }

            fn fields(&self) -> ::std::vec::Vec<&dyn $crate::ConfigField> {
                ::std::vec![$(&self.$field as &dyn $crate::ConfigField),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::ConfigField> {
                ::std::vec![$(&mut self.$field as &mut dyn $crate::ConfigField),*]
            }
        }
    };
}
