//! Static configuration schemas.
//!
//! Each schema is a sorted table from key to validator, declared in full
//! here so that an unregistered key is caught by table lookup rather than
//! scattered string checks. Two schemas exist: the root configuration and
//! the smaller set of path/template keys a data reference syntax entry may
//! carry.

use crate::validators::Validator;

/// A static key/validator table.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    entries: &'static [(&'static str, Validator)],
}

impl Schema {
    /// Ad-hoc schema for unit tests; entries must be sorted.
    #[cfg(test)]
    pub(crate) const fn for_tests(entries: &'static [(&'static str, Validator)]) -> Self {
        Self {
            name: "test",
            entries,
        }
    }

    /// Look up the validator for a key.
    pub fn validator(&self, key: &str) -> Option<Validator> {
        self.entries
            .binary_search_by_key(&key, |&(k, _)| k)
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.validator(key).is_some()
    }

    /// All registered keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The well-known project keys, each of which resolves to a
/// [`ProjectData`](crate::drs::ProjectData) entry after load.
pub const PROJECT_KEYS: [&str; 10] = [
    "CMIP3", "CMIP5", "CMIP6", "CORDEX", "EMAC", "OBS", "OBS6", "ana4mips", "native6",
    "obs4mips",
];

/// Root configuration schema.
///
/// Entries must stay sorted by key; lookup is a binary search.
pub static ROOT: Schema = Schema {
    name: "configuration",
    entries: &[
        ("CMIP3", Validator::Project),
        ("CMIP5", Validator::Project),
        ("CMIP6", Validator::Project),
        ("CORDEX", Validator::Project),
        ("EMAC", Validator::Project),
        ("OBS", Validator::Project),
        ("OBS6", Validator::Project),
        ("ana4mips", Validator::Project),
        ("auxiliary_data_dir", Validator::Path),
        ("check_level", Validator::CheckLevel),
        ("compress_netcdf", Validator::Bool),
        ("config_developer_file", Validator::PathOrNone),
        ("diagnostics", Validator::Diagnostics),
        ("exit_on_warning", Validator::Bool),
        ("log_level", Validator::Str),
        ("max_data_filesize", Validator::Positive),
        ("max_datasets", Validator::PositiveIntOrNone),
        ("max_parallel_tasks", Validator::IntOrNone),
        ("max_years", Validator::PositiveIntOrNone),
        ("native6", Validator::Project),
        ("obs4mips", Validator::Project),
        ("output_dir", Validator::Path),
        ("output_file_type", Validator::Str),
        ("profile_diagnostic", Validator::Bool),
        ("remove_preproc_dir", Validator::Bool),
        ("save_intermediary_cubes", Validator::Bool),
    ],
};

/// Data reference syntax schema.
pub static DRS: Schema = Schema {
    name: "data reference syntax entry",
    entries: &[
        ("input_dir", Validator::Str),
        ("input_file", Validator::Str),
        ("name", Validator::Str),
        ("project", Validator::Str),
        ("rootpath", Validator::Path),
    ],
};
