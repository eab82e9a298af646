use std::path::PathBuf;

use crate::paths;

/// Registry location relative to the (possibly empty) offline root.
pub const REGISTRY_SUBDIR: &str = "/usr/lib/opkg/alternatives";

/// Environment variable naming the offline root.
pub const OFFLINE_ROOT_ENV: &str = "OPKG_OFFLINE_ROOT";

/// Settings shared by every operation of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix prepended to registry and link paths; empty means the real root.
    pub offline_root: String,
    /// Directory holding one record file per name.
    pub registry_dir: PathBuf,
}

impl Config {
    pub fn new(offline_root: impl Into<String>) -> Self {
        let offline_root = offline_root.into();
        let registry_dir = paths::under_root(&offline_root, REGISTRY_SUBDIR);
        Self {
            offline_root,
            registry_dir,
        }
    }
}
