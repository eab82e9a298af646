use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::paths;
use crate::resolver::{Reconciled, Resolver};
use crate::store::registry::RegistryStore;

/// Drop `target` from `name` and re-point (or clear) the public link.
/// Removing a target that was never registered is a no-op.
pub fn run(config: &Config, name: &str, target: &str) -> Result<Reconciled> {
    let target = paths::normalize(target, &config.offline_root);
    debug!(name, %target, "removing alternative");

    RegistryStore::new(config).remove_entry(name, &target)?;
    Resolver::new(config).reconcile(name)
}
