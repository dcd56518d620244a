//! End-to-end configuration loading scenarios.
//!
//! These exercise the full pipeline: document reading, site/include
//! resolution, default/user merging, validation, and project data
//! conversion.

use drs_config::error::ConfigError;
use drs_config::schema::PROJECT_KEYS;
use drs_config::service::{ConfigPaths, ConfigService};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DEFAULT_DOC: &str = r#"
output_dir: /tmp/default
auxiliary_data_dir: /tmp/aux
log_level: info
exit_on_warning: false
output_file_type: png
check_level: default
max_parallel_tasks: null

CMIP6:
  output_file: "{project}_{dataset}_{mip}_{exp}_{ensemble}_{short_name}"
  data:
    - rootpath: /archive/CMIP6
      input_dir: "{institute}/{dataset}/{exp}"
      input_file: "{short_name}_{mip}_{dataset}_{exp}_{ensemble}*.nc"

OBS:
  output_file: "{project}_{dataset}_{type}_{version}_{mip}_{short_name}"
  data:
    - rootpath: /archive/OBS
      input_dir: "Tier{tier}/{dataset}"
      input_file: "{project}_{dataset}*.nc"
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn default_paths(temp: &TempDir) -> ConfigPaths {
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    ConfigPaths::with_files(default, None)
}

#[test]
fn test_defaults_only_load() {
    let temp = TempDir::new().unwrap();
    let service = ConfigService::init(default_paths(&temp)).unwrap();

    let config = service.config();
    assert_eq!(config.path_value("output_dir"), Some(Path::new("/tmp/default")));
    assert_eq!(config.str_value("output_file_type"), Some("png"));
    // named check level resolves to its integer
    assert_eq!(config.get("check_level").and_then(|v| v.as_int()), Some(3));
    // explicit null round-trips as an unset value
    assert!(config.get("max_parallel_tasks").unwrap().is_none());
}

#[test]
fn test_user_value_wins_over_default() {
    let temp = TempDir::new().unwrap();
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    let user = write(temp.path(), "config-user.yml", "output_dir: /tmp/user\n");

    let service = ConfigService::init(ConfigPaths::with_files(default, Some(user))).unwrap();
    assert_eq!(
        service.config().path_value("output_dir"),
        Some(Path::new("/tmp/user"))
    );
    // untouched defaults survive the merge
    assert_eq!(service.config().str_value("log_level"), Some("info"));
}

#[test]
fn test_user_project_becomes_project_data_with_expanded_rootpath() {
    let temp = TempDir::new().unwrap();
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    let user = write(
        temp.path(),
        "config-user.yml",
        r#"
CMIP6:
  output_file: "{project}_{dataset}"
  data:
    - rootpath: ~/data/CMIP6
      input_dir: ""
      input_file: "{short_name}*.nc"
"#,
    );

    let service = ConfigService::init(ConfigPaths::with_files(default, Some(user))).unwrap();
    let project = service.project("CMIP6").expect("CMIP6 must resolve to project data");

    assert_eq!(project.output_file(), "{project}_{dataset}");
    assert_eq!(project.data().len(), 1);
    let home = dirs::home_dir().unwrap();
    assert_eq!(project.data()[0].rootpath(), home.join("data").join("CMIP6"));
}

#[test]
fn test_unknown_key_fails_and_keeps_last_known_good_state() {
    let temp = TempDir::new().unwrap();
    let mut service = ConfigService::init(default_paths(&temp)).unwrap();
    assert_eq!(service.config().str_value("log_level"), Some("info"));

    let bad = write(temp.path(), "bad.yml", "foo_bar: 1\nlog_level: debug\n");
    let err = service.load_user_file(&bad, true).unwrap_err();
    match err {
        ConfigError::UnknownKey { key } => assert_eq!(key, "foo_bar"),
        other => panic!("expected UnknownKey, got {other:?}"),
    }

    // no partial configuration: the earlier load is still in effect
    assert_eq!(service.config().str_value("log_level"), Some("info"));
    assert!(service.project("CMIP6").is_some());
}

#[test]
fn test_empty_project_data_fails_naming_the_project() {
    let temp = TempDir::new().unwrap();
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    let user = write(
        temp.path(),
        "config-user.yml",
        "OBS:\n  output_file: \"{dataset}\"\n  data: []\n",
    );

    let err = ConfigService::init(ConfigPaths::with_files(default, Some(user))).unwrap_err();
    match err {
        ConfigError::EmptyProjectData { project } => assert_eq!(project, "OBS"),
        other => panic!("expected EmptyProjectData, got {other:?}"),
    }
}

#[test]
fn test_invalid_value_fails_the_whole_load() {
    let temp = TempDir::new().unwrap();
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    let user = write(temp.path(), "config-user.yml", "check_level: 6\n");

    let err = ConfigService::init(ConfigPaths::with_files(default, Some(user))).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "check_level"));
}

#[test]
fn test_include_provides_lower_precedence_defaults() {
    let temp = TempDir::new().unwrap();
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    write(
        temp.path(),
        "config-site.yml",
        "output_dir: /site/output\nlog_level: debug\n",
    );
    let user = write(
        temp.path(),
        "config-user.yml",
        "include: config-site.yml\noutput_dir: /tmp/user\n",
    );

    let service = ConfigService::init(ConfigPaths::with_files(default, Some(user))).unwrap();
    // the user file overwrites its include
    assert_eq!(
        service.config().path_value("output_dir"),
        Some(Path::new("/tmp/user"))
    );
    // the include overwrites the defaults
    assert_eq!(service.config().str_value("log_level"), Some("debug"));
}

#[test]
fn test_site_shorthand_pulls_in_sibling_site_file() {
    let temp = TempDir::new().unwrap();
    let default = write(temp.path(), "config-default.yml", DEFAULT_DOC);
    write(
        temp.path(),
        "config-levante.yml",
        r#"
CMIP6:
  output_file: "{project}_{dataset}"
  data:
    - rootpath: /work/archive/CMIP6
      input_dir: "{dataset}"
      input_file: "{short_name}*.nc"
"#,
    );
    let user = write(temp.path(), "config-user.yml", "site: levante\n");

    let service = ConfigService::init(ConfigPaths::with_files(default, Some(user))).unwrap();
    let project = service.project("CMIP6").unwrap();
    assert_eq!(project.data()[0].rootpath(), Path::new("/work/archive/CMIP6"));
}

#[test]
fn test_shipped_default_configuration_is_valid() {
    let default = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/config-default.yml");
    let service = ConfigService::init(ConfigPaths::with_files(default, None)).unwrap();

    for key in PROJECT_KEYS {
        let project = service
            .project(key)
            .unwrap_or_else(|| panic!("shipped defaults must define project {key}"));
        assert!(!project.data().is_empty());
    }
    assert_eq!(service.config().get("check_level").and_then(|v| v.as_int()), Some(3));
}

#[test]
fn test_shipped_site_file_loads_through_site_shorthand() {
    let temp = TempDir::new().unwrap();
    let shipped_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    // run against the shipped defaults with a user file next to nothing;
    // the site shorthand must resolve against the default file's dir
    let user = write(temp.path(), "config-user.yml", "site: levante\n");

    let paths = ConfigPaths::with_files(shipped_dir.join("config-default.yml"), Some(user));
    let service = ConfigService::init(paths).unwrap();
    let cmip6 = service.project("CMIP6").unwrap();
    assert_eq!(
        cmip6.data()[0].rootpath(),
        Path::new("/work/ik1017/CMIP6/data/CMIP6")
    );
}
