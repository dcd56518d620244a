//! Raw configuration document reading.
//!
//! Documents are YAML mappings, parsed into `serde_json::Value` trees so
//! that merging and validation share one in-memory model. Two pre-
//! processing keys are consumed here, before any validation:
//!
//! - `site: <name>` is shorthand for `include: <base>/config-<name>.yml`,
//!   where `<base>` is the default document's directory.
//! - `include: <path>` loads another document of the same shape and
//!   merges it at lower precedence: the included file's keys are
//!   established first, then the including document's keys overwrite
//!   them. Includes nest recursively.

use crate::error::{ConfigError, ConfigResult};
use crate::merge;
use crate::paths::{absolutize, expand_user};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve an include path: first the path as given, expanded to an
/// absolute path; if that does not exist, relative to the base
/// directory. Exactly two candidates.
fn resolve_include(include: &Path, base_dir: &Path) -> PathBuf {
    let as_given = absolutize(&expand_user(include));
    if as_given.exists() {
        return as_given;
    }
    let sibling = base_dir.join(include);
    if sibling.exists() {
        return sibling;
    }
    // neither exists; the recursive read reports the missing file
    as_given
}

/// Read a configuration document into a raw root mapping.
///
/// `base_dir` is the default document's directory, used to resolve
/// `site` shorthands and relative `include` paths.
pub fn read_config_file(path: &Path, base_dir: &Path) -> ConfigResult<Map<String, Value>> {
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Value =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut raw = match parsed {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(ConfigError::InvalidDocument {
                path: path.to_path_buf(),
                reason: format!(
                    "top level must be a mapping, got {}",
                    crate::validators::value_kind(&other)
                ),
            });
        }
    };

    // site shorthand becomes an include of the sibling site file
    if let Some(site) = raw.remove("site") {
        let Value::String(site) = site else {
            return Err(ConfigError::InvalidDocument {
                path: path.to_path_buf(),
                reason: "`site` must be a name string".to_string(),
            });
        };
        raw.insert(
            "include".to_string(),
            Value::String(
                base_dir
                    .join(format!("config-{site}.yml"))
                    .to_string_lossy()
                    .into_owned(),
            ),
        );
    }

    if let Some(include) = raw.remove("include") {
        let Value::String(include) = include else {
            return Err(ConfigError::InvalidDocument {
                path: path.to_path_buf(),
                reason: "`include` must be a path string".to_string(),
            });
        };
        let include = resolve_include(Path::new(&include), base_dir);
        debug!(include = %include.display(), from = %path.display(), "loading included configuration");
        let included = read_config_file(&include, base_dir)?;
        // included keys are lower precedence than the current level
        raw = merge::overlay(included, raw);
    }

    Ok(raw)
}
