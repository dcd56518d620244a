//! Configuration service: discovery, loading, and lifecycle.
//!
//! The service owns the process-wide configuration state that the rest
//! of a processing toolkit reads: a validated live mapping, the default
//! baseline it was built from, and the post-load snapshot used for
//! reference and reset. Loading is fail-fast and transactional — a
//! failed load or reload leaves the live configuration exactly as it
//! was.
//!
//! Configuration sources, lowest to highest precedence:
//! 1. The default document (required; loading fails without it).
//! 2. An optional user document, which may pull in `site`/`include`
//!    layers of its own (see [`crate::reader`]).
//!
//! ## Environment variables
//! - `DRS_CONFIG_DEFAULT_FILE` — default document path
//!   (default: `config/config-default.yml`)
//! - `DRS_CONFIG_USER_FILE` — user document path
//!   (default: `~/.drs-config/config-user.yml`)

use crate::error::{ConfigError, ConfigResult};
use crate::mapping::ValidatedConfig;
use crate::paths::{absolutize, expand_user};
use crate::reader::read_config_file;
use crate::{merge, schema};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locations of the configuration source documents.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// The default document. Required at load time.
    pub default_file: PathBuf,
    /// The user document. Optional; a missing file falls back to the
    /// defaults unless the load is strict.
    pub user_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from the environment and defaults.
    pub fn discover() -> Self {
        let default_file = std::env::var("DRS_CONFIG_DEFAULT_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/config-default.yml"));

        let user_file = std::env::var("DRS_CONFIG_USER_FILE")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Self::user_config_dir().map(|dir| dir.join("config-user.yml")));

        Self {
            default_file,
            user_file,
        }
    }

    /// Paths with explicit files, for tests and embedding callers.
    pub fn with_files(default_file: PathBuf, user_file: Option<PathBuf>) -> Self {
        Self {
            default_file,
            user_file,
        }
    }

    /// The per-user configuration directory (`~/.drs-config`).
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".drs-config"))
    }

    /// The directory of the default document; `site` shorthands and
    /// relative includes resolve against it.
    pub fn base_dir(&self) -> &Path {
        self.default_file.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

/// The loaded configuration and its lifecycle.
#[derive(Debug)]
pub struct ConfigService {
    paths: ConfigPaths,
    /// Raw default document, kept for re-merging on user reloads.
    defaults_raw: Map<String, Value>,
    /// Validated defaults-only configuration.
    baseline: ValidatedConfig,
    /// The live configuration everything reads.
    current: ValidatedConfig,
    /// Snapshot taken at the end of the last successful load.
    original: ValidatedConfig,
}

impl ConfigService {
    /// Load configuration from the given paths.
    ///
    /// A missing default document is fatal. A missing user document
    /// falls back to the defaults with a warning; use
    /// [`ConfigService::init_strict`] to escalate that to an error.
    pub fn init(paths: ConfigPaths) -> ConfigResult<Self> {
        Self::init_with(paths, false)
    }

    /// Load configuration, treating a missing user document as fatal.
    pub fn init_strict(paths: ConfigPaths) -> ConfigResult<Self> {
        Self::init_with(paths, true)
    }

    fn init_with(paths: ConfigPaths, strict_user: bool) -> ConfigResult<Self> {
        let defaults_raw = read_config_file(&paths.default_file, paths.base_dir())?;

        let mut baseline = ValidatedConfig::new(&schema::ROOT);
        baseline.extend_validated(&defaults_raw)?;

        let user = match &paths.user_file {
            Some(path) => read_user_document(path, paths.base_dir(), strict_user)?,
            None => Map::new(),
        };

        let mut current = ValidatedConfig::new(&schema::ROOT);
        current.extend_validated(&merge::overlay(defaults_raw.clone(), user))?;
        debug!(
            default = %paths.default_file.display(),
            keys = current.len(),
            "configuration loaded"
        );

        let original = current.clone();
        Ok(Self {
            paths,
            defaults_raw,
            baseline,
            current,
            original,
        })
    }

    /// The live configuration.
    pub fn config(&self) -> &ValidatedConfig {
        &self.current
    }

    /// Mutable access to the live configuration, for session-style
    /// overrides. [`ConfigService::reset`] undoes them.
    pub fn config_mut(&mut self) -> &mut ValidatedConfig {
        &mut self.current
    }

    /// The validated defaults-only baseline.
    pub fn baseline(&self) -> &ValidatedConfig {
        &self.baseline
    }

    /// The unmodified snapshot from the last successful load.
    pub fn original(&self) -> &ValidatedConfig {
        &self.original
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Shorthand for a lookup in the live configuration.
    pub fn get(&self, key: &str) -> Option<&crate::value::ConfigValue> {
        self.current.get(key)
    }

    /// The resolved project entry for a project key, if loaded.
    pub fn project(&self, key: &str) -> Option<&crate::drs::ProjectData> {
        self.current.project(key)
    }

    /// Build the merged, validated configuration for a user document.
    fn rebuild(&self, user: Map<String, Value>) -> ConfigResult<ValidatedConfig> {
        let merged = merge::overlay(self.defaults_raw.clone(), user);
        let mut fresh = ValidatedConfig::new(&schema::ROOT);
        fresh.extend_validated(&merged)?;
        Ok(fresh)
    }

    /// Load a user document over the defaults, replacing the live
    /// configuration's contents in place.
    ///
    /// Validation happens on a fresh mapping; on any failure the live
    /// configuration is untouched.
    pub fn load_user_file(&mut self, path: &Path, strict: bool) -> ConfigResult<()> {
        let user = read_user_document(path, self.paths.base_dir(), strict)?;
        let fresh = self.rebuild(user)?;

        self.paths.user_file = Some(path.to_path_buf());
        self.current.replace_with(fresh);
        self.original = self.current.clone();
        Ok(())
    }

    /// Load a user document by name, trying the `~`-expanded path first
    /// and then the user configuration directory. The file must exist.
    pub fn load_from_file(&mut self, filename: &Path) -> ConfigResult<()> {
        let expanded = expand_user(filename);
        let path = if expanded.exists() {
            absolutize(&expanded)
        } else {
            match ConfigPaths::user_config_dir().map(|dir| dir.join(filename)) {
                Some(fallback) if fallback.exists() => fallback,
                _ => {
                    return Err(ConfigError::MissingFile {
                        path: filename.to_path_buf(),
                    });
                }
            }
        };
        self.load_user_file(&path, true)
    }

    /// Re-read every configured source and replace the live
    /// configuration's contents in place.
    ///
    /// Nothing is committed until every source has been read and the
    /// merged result validated.
    pub fn reload(&mut self) -> ConfigResult<()> {
        let defaults_raw = read_config_file(&self.paths.default_file, self.paths.base_dir())?;

        let mut baseline = ValidatedConfig::new(&schema::ROOT);
        baseline.extend_validated(&defaults_raw)?;

        let user = match &self.paths.user_file {
            Some(path) => read_user_document(path, self.paths.base_dir(), false)?,
            None => Map::new(),
        };

        let mut fresh = ValidatedConfig::new(&schema::ROOT);
        fresh.extend_validated(&merge::overlay(defaults_raw.clone(), user))?;

        self.defaults_raw = defaults_raw;
        self.baseline = baseline;
        self.current.replace_with(fresh);
        self.original = self.current.clone();
        Ok(())
    }

    /// Restore the live configuration from the last load's snapshot,
    /// discarding any in-place overrides.
    pub fn reset(&mut self) {
        let snapshot = self.original.clone();
        self.current.replace_with(snapshot);
    }
}

/// Read the user document, tolerating a missing file unless strict.
fn read_user_document(
    path: &Path,
    base_dir: &Path,
    strict: bool,
) -> ConfigResult<Map<String, Value>> {
    match read_config_file(path, base_dir) {
        Ok(raw) => Ok(raw),
        Err(ConfigError::MissingFile { path }) if !strict => {
            warn!(
                path = %path.display(),
                "user configuration not found, falling back to defaults"
            );
            Ok(Map::new())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL_DEFAULT: &str = r#"
output_dir: /tmp/default
log_level: info
exit_on_warning: false
CMIP6:
  output_file: "{project}_{dataset}_{short_name}"
  data:
    - rootpath: /data/CMIP6
      input_dir: "{dataset}"
      input_file: "{short_name}*.nc"
"#;

    fn write_default(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("config-default.yml");
        std::fs::write(&path, MINIMAL_DEFAULT).unwrap();
        path
    }

    #[test]
    fn test_missing_default_is_fatal() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_files(temp.path().join("gone.yml"), None);
        assert!(matches!(
            ConfigService::init(paths),
            Err(ConfigError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_missing_user_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let default = write_default(&temp);
        let paths = ConfigPaths::with_files(default, Some(temp.path().join("gone.yml")));

        let service = ConfigService::init(paths).unwrap();
        assert_eq!(service.config().str_value("log_level"), Some("info"));
    }

    #[test]
    fn test_missing_user_is_fatal_when_strict() {
        let temp = TempDir::new().unwrap();
        let default = write_default(&temp);
        let paths = ConfigPaths::with_files(default, Some(temp.path().join("gone.yml")));
        assert!(matches!(
            ConfigService::init_strict(paths),
            Err(ConfigError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_baseline_and_original_snapshots() {
        let temp = TempDir::new().unwrap();
        let default = write_default(&temp);
        let user = temp.path().join("user.yml");
        std::fs::write(&user, "log_level: debug\n").unwrap();

        let paths = ConfigPaths::with_files(default, Some(user));
        let service = ConfigService::init(paths).unwrap();

        assert_eq!(service.baseline().str_value("log_level"), Some("info"));
        assert_eq!(service.config().str_value("log_level"), Some("debug"));
        assert_eq!(service.original(), service.config());
    }

    #[test]
    fn test_reset_restores_snapshot() {
        let temp = TempDir::new().unwrap();
        let default = write_default(&temp);
        let paths = ConfigPaths::with_files(default, None);
        let mut service = ConfigService::init(paths).unwrap();

        service
            .config_mut()
            .set("log_level", &serde_json::json!("debug"))
            .unwrap();
        assert_eq!(service.config().str_value("log_level"), Some("debug"));

        service.reset();
        assert_eq!(service.config().str_value("log_level"), Some("info"));
    }

    #[test]
    fn test_load_from_file_requires_existing_file() {
        let temp = TempDir::new().unwrap();
        let default = write_default(&temp);
        let paths = ConfigPaths::with_files(default, None);
        let mut service = ConfigService::init(paths).unwrap();

        let err = service
            .load_from_file(Path::new("no-such-config.yml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let temp = TempDir::new().unwrap();
        let default = write_default(&temp);
        let user = temp.path().join("user.yml");
        std::fs::write(&user, "log_level: debug\n").unwrap();

        let paths = ConfigPaths::with_files(default, Some(user.clone()));
        let mut service = ConfigService::init(paths).unwrap();
        assert_eq!(service.config().str_value("log_level"), Some("debug"));

        std::fs::write(&user, "log_level: warning\n").unwrap();
        service.reload().unwrap();
        assert_eq!(service.config().str_value("log_level"), Some("warning"));
    }
}
