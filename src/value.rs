//! Typed configuration values.

use crate::drs::ProjectData;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// A validated configuration value.
///
/// Every entry of a validated mapping holds one of these; raw document
/// values never reach consumers directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Explicitly unset (`null` in the document).
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    /// Sorted set of diagnostic path patterns.
    StrSet(BTreeSet<String>),
    /// An absolute, `~`-expanded filesystem path.
    Path(PathBuf),
    /// A fully resolved project entry.
    Project(ProjectData),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ConfigValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::StrList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectData> {
        match self {
            ConfigValue::Project(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this entry is the explicit `null` value.
    pub fn is_none(&self) -> bool {
        matches!(self, ConfigValue::None)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::None => serializer.serialize_none(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Int(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(v) => serializer.serialize_f64(*v),
            ConfigValue::Str(s) => serializer.serialize_str(s),
            ConfigValue::StrList(v) => v.serialize(serializer),
            ConfigValue::IntList(v) => v.serialize(serializer),
            ConfigValue::FloatList(v) => v.serialize(serializer),
            ConfigValue::StrSet(v) => v.serialize(serializer),
            ConfigValue::Path(p) => p.serialize(serializer),
            ConfigValue::Project(p) => p.serialize(serializer),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = T>) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::None => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(s) => write!(f, "{s}"),
            ConfigValue::StrList(v) => write_list(f, v.iter()),
            ConfigValue::IntList(v) => write_list(f, v.iter()),
            ConfigValue::FloatList(v) => write_list(f, v.iter()),
            ConfigValue::StrSet(v) => write_list(f, v.iter()),
            ConfigValue::Path(p) => write!(f, "{}", p.display()),
            ConfigValue::Project(p) => {
                write!(f, "ProjectData({}, {} data roots)", p.name(), p.data().len())
            }
        }
    }
}
