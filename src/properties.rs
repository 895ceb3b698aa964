// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Properties
//!
//! Parser for flat `key="value"` sequences, the format deployment pipelines use
//! to flatten an output object into a single environment variable, e.g.
//!
//! ```text
//! { account_name="stgtest01" primary_endpoint="https://stgtest01.blob.core.windows.net/" }
//! ```
//!
//! Keys are runs of ASCII alphanumerics, `_`, `-` and `.` immediately followed by
//! `="`. The value is everything up to the next `"`. Anything between pairs
//! (braces, commas, whitespace) is skipped. When a key occurs more than once the
//! first occurrence wins.

use std::collections::HashMap;

/// Lookup table built from a `key="value"` sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Case-sensitive lookup of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Keys run up to whitespace, `=`, a quote or the `{`, `}` and `,` separators.
/// Non-ASCII bytes are key bytes, so keys always end on a char boundary.
fn is_key_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'"' | b'{' | b'}' | b',')
}

/// Parses every `key="value"` pair found in `input`.
pub fn parse_properties(input: &str) -> Properties {
    let bytes = input.as_bytes();
    let mut values = HashMap::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if !is_key_byte(bytes[pos]) {
            pos += 1;
            continue;
        }

        let key_start = pos;
        while pos < bytes.len() && is_key_byte(bytes[pos]) {
            pos += 1;
        }
        let key = &input[key_start..pos];

        if !input[pos..].starts_with("=\"") {
            continue;
        }
        let value_start = pos + 2;

        // An unterminated value is not a pair; stop scanning.
        let Some(len) = input[value_start..].find('"') else {
            break;
        };
        let value = &input[value_start..value_start + len];
        values
            .entry(key.to_owned())
            .or_insert_with(|| value.to_owned());
        pos = value_start + len + 1;
    }

    Properties { values }
}

/// Returns the value of `key` inside `input`, if present.
pub fn property_value(input: &str, key: &str) -> Option<String> {
    parse_properties(input).get(key).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_separated_pairs() {
        let props = parse_properties(r#"key1="A" key2="B""#);
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("key1"), Some("A"));
        assert_eq!(props.get("key2"), Some("B"));
    }

    #[test]
    fn skips_braces_and_commas() {
        let props = parse_properties(r#"{ name="stg01", endpoint="https://stg01.blob/" }"#);
        assert_eq!(props.get("name"), Some("stg01"));
        assert_eq!(props.get("endpoint"), Some("https://stg01.blob/"));
    }

    #[test]
    fn values_may_contain_spaces_and_equals() {
        let props = parse_properties(r#"conn="Server=tcp:db;User Id=admin" port="1433""#);
        assert_eq!(props.get("conn"), Some("Server=tcp:db;User Id=admin"));
        assert_eq!(props.get("port"), Some("1433"));
    }

    #[test]
    fn first_occurrence_wins() {
        let props = parse_properties(r#"id="first" id="second""#);
        assert_eq!(props.get("id"), Some("first"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let props = parse_properties(r#"Name="upper""#);
        assert_eq!(props.get("name"), None);
        assert_eq!(props.get("Name"), Some("upper"));
    }

    #[test]
    fn keys_are_matched_whole() {
        assert_eq!(property_value(r#"account_name="x""#, "name"), None);
    }

    #[test]
    fn keys_may_hold_punctuation_and_non_ascii() {
        let props = parse_properties(r#"primary:endpoint="https://x" größe="klein" a/b="c""#);
        assert_eq!(props.get("primary:endpoint"), Some("https://x"));
        assert_eq!(props.get("größe"), Some("klein"));
        assert_eq!(props.get("a/b"), Some("c"));
        assert_eq!(property_value(r#"primary:endpoint="https://x""#, "endpoint"), None);
    }

    #[test]
    fn empty_value_is_a_value() {
        assert_eq!(property_value(r#"empty="" other="y""#, "empty"), Some(String::new()));
    }

    #[test]
    fn unquoted_and_unterminated_pairs_are_ignored() {
        let props = parse_properties(r#"plain=value broken="no end"#);
        assert!(props.is_empty());
        assert!(parse_properties("").is_empty());
    }
}
