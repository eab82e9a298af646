use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::parse_priority;
use crate::output;
use crate::paths;
use crate::resolver::{Reconciled, Resolver};
use crate::store::registry::RegistryStore;

/// Register `target` as an alternative for `name` behind `link`, then
/// point the link at whichever alternative now wins.
///
/// There is no rollback: if reconciliation fails the registry keeps the new
/// entry and the next install or remove for `name` fixes the link.
pub fn run(
    config: &Config,
    link: &str,
    name: &str,
    target: &str,
    priority_text: &str,
) -> Result<Reconciled> {
    let store = RegistryStore::new(config);
    let target = paths::normalize(target, &config.offline_root);
    let priority = parse_priority(priority_text);
    debug!(name, link, %target, priority, "installing alternative");

    store.ensure_dir()?;
    let outcome = store.append_or_init(name, link, &target, priority)?;

    if let Some(registered) = &outcome.registered_link {
        output::error(&format!(
            "cannot register alternative {name} to {link} since it is already registered to {registered}"
        ));
    }
    if outcome.duplicate_priority {
        output::warn(&format!(
            "{name} has multiple providers with the same priority, please check {} for details",
            store.record_path(name)?.display()
        ));
    }

    Resolver::new(config).reconcile(name)
}
