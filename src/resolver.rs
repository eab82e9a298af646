use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{AltError, Result};
use crate::model::{Alternative, LinkState};
use crate::output;
use crate::paths;
use crate::store::registry::RegistryStore;

/// What a successful reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// No alternatives remain: the record and any symlink are gone.
    Cleared,
    /// The public link now points at `target`.
    Linked { link: PathBuf, target: String },
    /// A winner was chosen but the symlink could not be put in place.
    /// The next install or remove for the name retries.
    LinkFailed { link: PathBuf, target: String },
}

/// Highest priority wins; among equal priorities the entry appearing later
/// in the record wins.
pub fn select_winner(alternatives: &[Alternative]) -> Option<&Alternative> {
    let mut best: Option<&Alternative> = None;
    for alt in alternatives {
        if best.is_none_or(|b| alt.priority >= b.priority) {
            best = Some(alt);
        }
    }
    best
}

/// Inspect the filesystem object at `path` without following symlinks.
pub fn link_state(path: &Path) -> io::Result<LinkState> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            return Ok(LinkState::Absent);
        }
        Err(e) => return Err(e),
    };
    if meta.file_type().is_symlink() {
        let target = fs::read_link(path)?;
        Ok(LinkState::Symlink(target.to_string_lossy().into_owned()))
    } else {
        Ok(LinkState::Foreign)
    }
}

/// Applies the registry's current winner to the public link.
#[derive(Debug, Clone)]
pub struct Resolver {
    store: RegistryStore,
    offline_root: String,
}

impl Resolver {
    pub fn new(config: &Config) -> Self {
        Self {
            store: RegistryStore::new(config),
            offline_root: config.offline_root.clone(),
        }
    }

    pub fn reconcile(&self, name: &str) -> Result<Reconciled> {
        let Some(record) = self.store.read(name)? else {
            debug!(name, "no record, nothing to reconcile");
            return Ok(Reconciled::Cleared);
        };

        let link_path = paths::under_root(&self.offline_root, &record.link);
        let state = link_state(&link_path).map_err(|e| AltError::io(&link_path, e))?;
        debug!(name, link = %link_path.display(), %state, "inspected public link");

        let Some(best) = select_winner(&record.alternatives) else {
            output::info(&format!(
                "removing {} as no more alternatives exist for it",
                link_path.display()
            ));
            self.store.delete(name)?;
            if matches!(state, LinkState::Symlink(_)) {
                fs::remove_file(&link_path).map_err(|e| AltError::io(&link_path, e))?;
                debug!(link = %link_path.display(), "removed public link");
            }
            return Ok(Reconciled::Cleared);
        };

        if state == LinkState::Foreign {
            return Err(AltError::ForeignObject {
                link: link_path.display().to_string(),
                target: best.target.clone(),
            });
        }

        output::info(&format!("Linking {} to {}", link_path.display(), best.target));
        match replace_symlink(&link_path, &best.target, &state) {
            Ok(()) => Ok(Reconciled::Linked {
                link: link_path,
                target: best.target.clone(),
            }),
            Err(e) => {
                output::error(&format!(
                    "symlink {} -> {} failed: {e}",
                    link_path.display(),
                    best.target
                ));
                Ok(Reconciled::LinkFailed {
                    link: link_path,
                    target: best.target.clone(),
                })
            }
        }
    }
}

fn replace_symlink(link: &Path, target: &str, state: &LinkState) -> io::Result<()> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    if matches!(state, LinkState::Symlink(_)) {
        match fs::remove_file(link) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    symlink(target, link)?;
    debug!(link = %link.display(), target, "created symlink");
    Ok(())
}
