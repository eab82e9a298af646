use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AltError, Result};
use crate::model::{self, Alternative, Record};
use crate::output;
use crate::paths;

/// What `append_or_init` noticed while registering an alternative.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Another entry already uses the same priority.
    pub duplicate_priority: bool,
    /// The name was already bound to this (different) link, which was kept.
    pub registered_link: Option<String>,
}

/// Directory of per-name record files.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    dir: PathBuf,
}

impl RegistryStore {
    pub fn new(config: &Config) -> Self {
        Self {
            dir: config.registry_dir.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, name: &str) -> Result<PathBuf> {
        if !paths::is_valid_name(name) {
            return Err(AltError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Create the registry directory and any missing parents.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| AltError::io(&self.dir, e))
    }

    /// Link path stored on line 1, or `None` when there is no record.
    ///
    /// A record that exists but cannot be opened or read yields an empty
    /// header.
    pub fn read_header(&self, name: &str) -> Result<Option<String>> {
        let path = self.record_path(name)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                output::warn(&format!("cannot open {}: {e}", path.display()));
                return Ok(Some(String::new()));
            }
        };

        let mut line = Vec::new();
        match BufReader::new(file).read_until(b'\n', &mut line) {
            Ok(0) => {
                output::warn(&format!("{} has no header line", path.display()));
                Ok(Some(String::new()))
            }
            Ok(_) => {
                let header = String::from_utf8_lossy(&line);
                Ok(Some(model::strip_line_ending(&header).to_string()))
            }
            Err(e) => {
                output::warn(&format!("cannot read {}: {e}", path.display()));
                Ok(Some(String::new()))
            }
        }
    }

    /// Full record, or `None` when there is no record.
    pub fn read(&self, name: &str) -> Result<Option<Record>> {
        let path = self.record_path(name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(Record::parse(&String::from_utf8_lossy(&bytes)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AltError::io(&path, e)),
        }
    }

    /// Drop every entry whose target field is exactly `target`.
    ///
    /// Missing records are left alone.
    pub fn remove_entry(&self, name: &str, target: &str) -> Result<()> {
        let path = self.record_path(name)?;
        self.rewrite(&path, target, None)
    }

    /// Register `target` at `priority`, creating the record bound to `link`
    /// if this is the first alternative for `name`.
    ///
    /// A previous entry for the same target is replaced, and the new entry
    /// goes to the end of the record.
    pub fn append_or_init(
        &self,
        name: &str,
        link: &str,
        target: &str,
        priority: i32,
    ) -> Result<AppendOutcome> {
        self.ensure_dir()?;
        let path = self.record_path(name)?;
        let mut outcome = AppendOutcome::default();

        match self.read_header(name)? {
            Some(existing) if !is_empty_file(&path) => {
                if existing != link {
                    outcome.registered_link = Some(existing);
                }
            }
            _ => {
                debug!(record = %path.display(), link, "creating record");
                fs::write(&path, format!("{link}\n")).map_err(|e| AltError::io(&path, e))?;
            }
        }

        if let Some(record) = self.read(name)? {
            outcome.duplicate_priority = record
                .alternatives
                .iter()
                .any(|alt| alt.target != target && alt.priority == priority);
        }

        let entry = Alternative {
            target: target.to_string(),
            priority,
        };
        self.rewrite(&path, target, Some(&entry))?;
        Ok(outcome)
    }

    /// Remove the record file; an absent record is fine.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.record_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(record = %path.display(), "deleted record");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AltError::io(&path, e)),
        }
    }

    /// Stream the record into a fresh temporary file, skipping entries for
    /// `target` and optionally appending `entry`, then rename it over the
    /// original. The original stays intact until the rename.
    fn rewrite(&self, path: &Path, target: &str, entry: Option<&Alternative>) -> Result<()> {
        let source = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(AltError::io(path, e)),
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = self
            .dir
            .join(format!(".{file_name}.{}.new", Uuid::new_v4()));

        if let Err(e) = copy_filtered(source, &staging, target, entry) {
            let _ = fs::remove_file(&staging);
            return Err(AltError::io(&staging, e));
        }

        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(AltError::io(path, e));
        }
        debug!(record = %path.display(), target, appended = entry.is_some(), "rewrote record");
        Ok(())
    }
}

fn is_empty_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}

fn copy_filtered(
    source: File,
    staging: &Path,
    target: &str,
    entry: Option<&Alternative>,
) -> io::Result<()> {
    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(File::create(staging)?);
    let mut line = Vec::new();
    let mut first = true;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        // Line 1 is the link path and never an entry.
        if !first {
            let text = String::from_utf8_lossy(&line);
            if model::entry_target(&text) == Some(target) {
                continue;
            }
        }
        first = false;
        writer.write_all(&line)?;
        if line.last() != Some(&b'\n') {
            writer.write_all(b"\n")?;
        }
    }

    if let Some(entry) = entry {
        writeln!(writer, "{}", entry.to_line())?;
    }
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()
}
