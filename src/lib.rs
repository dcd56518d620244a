//! Layered, validated configuration and data reference syntax (DRS)
//! resolution for climate-model data archives.
//!
//! Configuration is loaded from a default document plus an optional
//! user document (with `site`/`include` layers), merged in a fixed
//! precedence order, and validated fail-fast against a static schema.
//! After a successful load, every well-known project key (`CMIP6`,
//! `OBS`, ...) resolves to a [`ProjectData`] describing that project's
//! root paths and filename templates.

pub mod cli;
pub mod drs;
pub mod error;
pub mod mapping;
pub mod merge;
pub mod paths;
pub mod reader;
pub mod schema;
pub mod service;
pub mod validators;
pub mod value;

pub use drs::{DrsRecord, FacetMap, ProjectData};
pub use error::{ConfigError, ConfigResult};
pub use mapping::ValidatedConfig;
pub use service::{ConfigPaths, ConfigService};
pub use value::ConfigValue;
