use crate::config::Config;
use crate::error::{AltError, Result};
use crate::output::{self, Format};
use crate::paths;
use crate::resolver::{link_state, select_winner};
use crate::store::registry::RegistryStore;

/// Show the record for `name`, its winner and what is at the link today.
pub fn run(config: &Config, name: &str, format: Format) -> Result<()> {
    let store = RegistryStore::new(config);
    let record = store
        .read(name)?
        .ok_or_else(|| AltError::NotRegistered(name.to_string()))?;

    let link_path = paths::under_root(&config.offline_root, &record.link);
    let state = link_state(&link_path).map_err(|e| AltError::io(&link_path, e))?;
    let best = select_winner(&record.alternatives);

    output::print_display(&output::Display::new(name, &record, best, &state), format)
}
