//! Validated configuration mapping.
//!
//! [`ValidatedConfig`] is a mapping from key to typed value where every
//! insertion routes through the validator registered for that key in a
//! static [`Schema`]. Writing an unregistered key or a rejected value
//! fails; values already stored are always typed and consistent.
//!
//! Iteration order is sorted key order. This is an invariant, not an
//! implementation detail: configuration dumps must be deterministic.

use crate::drs::ProjectData;
use crate::error::{ConfigError, ConfigResult};
use crate::schema::Schema;
use crate::validators::Validator;
use crate::value::ConfigValue;
use regex_lite::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A mapping that validates values on the way in.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    schema: &'static Schema,
    values: BTreeMap<String, ConfigValue>,
}

impl ValidatedConfig {
    /// Create an empty mapping over the given schema.
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    /// The schema this mapping validates against.
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Validate and store one entry.
    ///
    /// Fails with [`ConfigError::UnknownKey`] when the key has no
    /// registered validator and [`ConfigError::InvalidValue`] when the
    /// validator rejects the raw value. Project keys are converted to
    /// [`ProjectData`] here, so a stored project entry is never raw.
    pub fn set(&mut self, key: &str, raw: &Value) -> ConfigResult<()> {
        let validator = self
            .schema
            .validator(key)
            .ok_or_else(|| ConfigError::UnknownKey { key: key.to_string() })?;

        let value = match validator {
            Validator::Project => ConfigValue::Project(ProjectData::from_value(key, raw)?),
            other => other
                .validate(raw)
                .map_err(|source| ConfigError::InvalidValue {
                    key: key.to_string(),
                    source,
                })?,
        };

        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Validate and store every entry of a raw document, failing fast on
    /// the first unknown key or rejected value.
    pub fn extend_validated(&mut self, raw: &Map<String, Value>) -> ConfigResult<()> {
        for (key, value) in raw {
            self.set(key, value)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The subset of entries whose key matches `pattern` (searched, not
    /// anchored), as a new independent mapping over the same schema.
    ///
    /// Changes to the returned mapping are not propagated back.
    pub fn find_all(&self, pattern: &str) -> ConfigResult<ValidatedConfig> {
        let re = Regex::new(pattern)?;
        Ok(Self {
            schema: self.schema,
            values: self
                .values
                .iter()
                .filter(|(key, _)| re.is_match(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    /// Entries under `group.`, with the prefix stripped, as a plain
    /// independent mapping. Keys outside the group are excluded.
    pub fn select_group(&self, group: &str) -> BTreeMap<String, ConfigValue> {
        let prefix = format!("{group}.");
        self.values
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect()
    }

    /// Replace this mapping's contents with another's, in place.
    ///
    /// Existing references to this mapping observe the new contents; the
    /// mapping's identity never changes across a reload.
    pub fn replace_with(&mut self, other: ValidatedConfig) {
        self.values.clear();
        self.values.extend(other.values);
    }

    // Convenience accessors for common lookups.

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn path_value(&self, key: &str) -> Option<&Path> {
        self.get(key).and_then(ConfigValue::as_path)
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    /// The resolved project entry for a project key, if loaded.
    pub fn project(&self, key: &str) -> Option<&ProjectData> {
        self.get(key).and_then(ConfigValue::as_project)
    }
}

impl Serialize for ValidatedConfig {
    /// Serializes as a plain map in sorted key order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl PartialEq for ValidatedConfig {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl fmt::Display for ValidatedConfig {
    /// Sorted `key: value` lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}
