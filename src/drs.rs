//! Data reference syntax records and project data.
//!
//! A [`DrsRecord`] describes how one data source of a project lays out
//! files: a root path plus `{facet}`-parameterized directory and filename
//! templates. A [`ProjectData`] bundles a project's output-filename
//! template with one record per declared root path.

use crate::error::{ConfigError, ConfigResult};
use crate::mapping::ValidatedConfig;
use crate::schema;
use crate::validators::{ValidationError, value_kind};
use crate::value::ConfigValue;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Facet values used to fill `{placeholder}` tokens in templates.
pub type FacetMap = BTreeMap<String, String>;

/// Keys every data reference syntax entry must carry.
const REQUIRED_KEYS: [&str; 3] = ["rootpath", "input_dir", "input_file"];

/// Fill `{facet}` tokens in a template from the given facet map.
///
/// An unknown facet is an error; an unmatched `{` is kept verbatim so
/// that glob characters and stray braces survive untouched.
pub fn fill_template(template: &str, facets: &FacetMap) -> ConfigResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let facet = &after[..end];
                match facets.get(facet) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(ConfigError::MissingFacet {
                            template: template.to_string(),
                            facet: facet.to_string(),
                        });
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// One data source of a project: a validated mapping over the DRS schema.
///
/// Construction is atomic. A record either has every provided key
/// validated and all required keys present, or it does not exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DrsRecord {
    inner: ValidatedConfig,
}

impl DrsRecord {
    /// Build a record from a raw document substructure.
    pub fn from_value(raw: &Value) -> ConfigResult<Self> {
        let Value::Object(entries) = raw else {
            return Err(ConfigError::InvalidValue {
                key: "data".to_string(),
                source: ValidationError::WrongType {
                    expected: "a mapping",
                    found: value_kind(raw),
                },
            });
        };

        let mut inner = ValidatedConfig::new(&schema::DRS);
        inner.extend_validated(entries)?;

        for key in REQUIRED_KEYS {
            if !inner.contains_key(key) {
                return Err(ConfigError::MissingKey {
                    key,
                    context: schema::DRS.name().to_string(),
                });
            }
        }

        Ok(Self { inner })
    }

    /// The absolute root path of this data source.
    pub fn rootpath(&self) -> &Path {
        match self.inner.get("rootpath") {
            Some(ConfigValue::Path(p)) => p,
            _ => unreachable!("rootpath is validated at construction"),
        }
    }

    /// Directory template below the root path. May be empty.
    pub fn input_dir(&self) -> &str {
        self.inner
            .str_value("input_dir")
            .unwrap_or_else(|| unreachable!("input_dir is validated at construction"))
    }

    /// Filename template; usually ends in a glob such as `*.nc`.
    pub fn input_file(&self) -> &str {
        self.inner
            .str_value("input_file")
            .unwrap_or_else(|| unreachable!("input_file is validated at construction"))
    }

    pub fn project(&self) -> Option<&str> {
        self.inner.str_value("project")
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.str_value("name")
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.inner.get(key)
    }

    /// The directory holding this source's files for the given facets.
    pub fn resolve_dir(&self, facets: &FacetMap) -> ConfigResult<PathBuf> {
        let dir = fill_template(self.input_dir(), facets)?;
        if dir.is_empty() {
            Ok(self.rootpath().to_path_buf())
        } else {
            Ok(self.rootpath().join(dir))
        }
    }

    /// The filename (or glob) matching this source's files for the given
    /// facets.
    pub fn resolve_filename(&self, facets: &FacetMap) -> ConfigResult<String> {
        fill_template(self.input_file(), facets)
    }
}

/// A project's resolved data description.
///
/// The data list is never empty: a project without at least one data
/// reference syntax entry cannot resolve any file path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectData {
    name: String,
    output_file: String,
    data: Vec<DrsRecord>,
}

impl ProjectData {
    /// Build a project entry from its raw `output_file`/`data`
    /// substructure.
    pub fn from_value(name: &str, raw: &Value) -> ConfigResult<Self> {
        let Value::Object(entries) = raw else {
            return Err(ConfigError::InvalidValue {
                key: name.to_string(),
                source: ValidationError::WrongType {
                    expected: "a mapping",
                    found: value_kind(raw),
                },
            });
        };

        let output_file = match entries.get("output_file") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: format!("{name}.output_file"),
                    source: ValidationError::WrongType {
                        expected: "a string",
                        found: value_kind(other),
                    },
                });
            }
            None => {
                return Err(ConfigError::MissingKey {
                    key: "output_file",
                    context: format!("project `{name}`"),
                });
            }
        };

        let items = match entries.get("data") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: format!("{name}.data"),
                    source: ValidationError::WrongType {
                        expected: "a list",
                        found: value_kind(other),
                    },
                });
            }
            None => {
                return Err(ConfigError::MissingKey {
                    key: "data",
                    context: format!("project `{name}`"),
                });
            }
        };

        if items.is_empty() {
            return Err(ConfigError::EmptyProjectData {
                project: name.to_string(),
            });
        }

        let data = items
            .iter()
            .map(DrsRecord::from_value)
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            output_file,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The output-filename template for this project.
    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    pub fn data(&self) -> &[DrsRecord] {
        &self.data
    }

    /// Root paths of all data sources, in declaration order.
    pub fn rootpaths(&self) -> impl Iterator<Item = &Path> {
        self.data.iter().map(DrsRecord::rootpath)
    }

    /// The output base name for the given facets.
    pub fn output_basename(&self, facets: &FacetMap) -> ConfigResult<String> {
        fill_template(&self.output_file, facets)
    }
}
