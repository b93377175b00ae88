// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! File-per-hunt storage primitives.
//!
//! Each treasure hunt lives in `{directory}/{title}{extension}` as pretty
//! printed JSON. These functions perform the I/O directly; the
//! [`PersistenceService`](crate::PersistenceService) runs them on its
//! background workers.

use crate::error::PersistenceError;
use serde::Deserialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use treasure_hunt_domain::TreasureHunt;

/// Default file extension for stored treasure hunts.
pub const DEFAULT_EXTENSION: &str = ".th";

/// Suffix appended to a hunt file while it is being written.
const TEMP_SUFFIX: &str = ".tmp";

/// Where and how treasure hunts are stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per treasure hunt.
    pub directory: PathBuf,
    /// File extension, including the leading dot.
    pub extension: String,
}

impl StorageConfig {
    /// Creates a configuration for `directory` with the default extension.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            extension: String::from(DEFAULT_EXTENSION),
        }
    }

    /// Path of the file storing the hunt titled `title`.
    #[must_use]
    pub fn hunt_path(&self, title: &str) -> PathBuf {
        self.directory.join(format!("{title}{}", self.extension))
    }

    fn is_hunt_file(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(self.extension.as_str()))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("treasure-hunts")
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Writes `hunt` to its file, then deletes the file of `old_title` if given.
///
/// The hunt is written to a temporary file and renamed into place. Renaming
/// a hunt is write-new-then-delete-old and not atomic: a crash between the
/// two steps leaves both files on disk.
///
/// # Errors
///
/// Returns an error if serialization fails or any filesystem step fails. If
/// the old file cannot be deleted the new file has already been written.
pub async fn save_to_dir(
    config: &StorageConfig,
    hunt: &TreasureHunt,
    old_title: Option<&str>,
) -> Result<(), PersistenceError> {
    fs::create_dir_all(&config.directory)
        .await
        .map_err(|e| PersistenceError::io(&config.directory, &e))?;

    let path: PathBuf = config.hunt_path(&hunt.title);
    let staging: PathBuf = temp_path(&path);
    let bytes: Vec<u8> = serde_json::to_vec_pretty(hunt)?;

    fs::write(&staging, &bytes)
        .await
        .map_err(|e| PersistenceError::io(&staging, &e))?;
    fs::rename(&staging, &path)
        .await
        .map_err(|e| PersistenceError::io(&path, &e))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    let Some(old_title) = old_title.filter(|old| *old != hunt.title) else {
        return Ok(());
    };
    if old_title.to_lowercase() == hunt.title.to_lowercase()
        && !has_both_entries(config, old_title, &hunt.title).await?
    {
        debug!(
            "'{}' and '{}' name the same file; nothing to delete",
            old_title, hunt.title
        );
        return Ok(());
    }
    if remove_from_dir(config, old_title).await? {
        info!("Renamed treasure hunt '{}' to '{}'", old_title, hunt.title);
    }

    Ok(())
}

/// Returns true if the storage directory lists a file for each title under
/// its exact name. On a case-insensitive filesystem titles differing only in
/// case share one entry.
async fn has_both_entries(
    config: &StorageConfig,
    old_title: &str,
    new_title: &str,
) -> Result<bool, PersistenceError> {
    let wanted: [PathBuf; 2] = [config.hunt_path(old_title), config.hunt_path(new_title)];
    let mut seen: [bool; 2] = [false, false];
    let mut entries: fs::ReadDir = fs::read_dir(&config.directory)
        .await
        .map_err(|e| PersistenceError::io(&config.directory, &e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PersistenceError::io(&config.directory, &e))?
    {
        let name: OsString = entry.file_name();
        for (path, seen) in wanted.iter().zip(seen.iter_mut()) {
            if path.file_name() == Some(name.as_os_str()) {
                *seen = true;
            }
        }
    }
    Ok(seen == [true, true])
}

/// Reads and checks a single hunt file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid hunt, or
/// fails the integrity check.
pub async fn read_hunt_file(path: &Path) -> Result<TreasureHunt, PersistenceError> {
    let bytes: Vec<u8> = fs::read(path)
        .await
        .map_err(|e| PersistenceError::io(path, &e))?;
    let hunt: TreasureHunt = serde_json::from_slice(&bytes)?;
    hunt.check_integrity()?;
    Ok(hunt)
}

/// Loads every hunt file in the storage directory, sorted by title.
///
/// Files that cannot be read or parsed are logged and skipped. Titles are
/// unique: when several files hold the same title, the file named after it
/// is kept, otherwise the first by file name. A missing directory yields an
/// empty list.
///
/// # Errors
///
/// Returns an error only if the directory exists but cannot be listed.
pub async fn load_from_dir(config: &StorageConfig) -> Result<Vec<TreasureHunt>, PersistenceError> {
    let mut entries: fs::ReadDir = match fs::read_dir(&config.directory).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(
                "Storage directory {} does not exist yet",
                config.directory.display()
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(PersistenceError::io(&config.directory, &e)),
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    loop {
        let entry: fs::DirEntry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => return Err(PersistenceError::io(&config.directory, &e)),
        };
        let path: PathBuf = entry.path();
        if config.is_hunt_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut found: Vec<(PathBuf, TreasureHunt)> = Vec::with_capacity(paths.len());
    for path in paths {
        match read_hunt_file(&path).await {
            Ok(hunt) => found.push((path, hunt)),
            Err(e) => {
                warn!("Skipping unreadable treasure hunt {}: {}", path.display(), e);
            }
        }
    }

    // A file named after its title wins over stray copies holding the same title
    found.sort_by_key(|(path, hunt)| *path != config.hunt_path(&hunt.title));

    let mut titles: HashSet<String> = HashSet::with_capacity(found.len());
    let mut hunts: Vec<TreasureHunt> = Vec::with_capacity(found.len());
    for (path, hunt) in found {
        if !titles.insert(hunt.title.clone()) {
            warn!(
                "Skipping {}: treasure hunt '{}' is already loaded from another file",
                path.display(),
                hunt.title
            );
            continue;
        }
        if config.hunt_path(&hunt.title) != path {
            warn!(
                "File {} holds treasure hunt '{}'; it will be saved under its title",
                path.display(),
                hunt.title
            );
        }
        hunts.push(hunt);
    }

    hunts.sort_by(|a, b| a.title.cmp(&b.title));
    info!(
        "Loaded {} treasure hunts from {}",
        hunts.len(),
        config.directory.display()
    );
    Ok(hunts)
}

/// Deletes the file of the hunt titled `title`.
///
/// Returns `Ok(false)` if no such file exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be deleted.
pub async fn remove_from_dir(config: &StorageConfig, title: &str) -> Result<bool, PersistenceError> {
    let path: PathBuf = config.hunt_path(title);
    match fs::remove_file(&path).await {
        Ok(()) => {
            debug!("Deleted {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PersistenceError::io(&path, &e)),
    }
}
