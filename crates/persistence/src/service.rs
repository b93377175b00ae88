// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::store::{StorageConfig, load_from_dir, remove_from_dir, save_to_dir};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use treasure_hunt_domain::TreasureHunt;

/// Completion notice for a background persistence operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceEvent {
    /// A treasure hunt was written.
    Saved {
        /// The title the hunt was saved under.
        title: String,
    },
    /// Writing a treasure hunt failed. Nothing is retried.
    SaveFailed {
        /// The title of the hunt that failed to save.
        title: String,
        /// What went wrong.
        error: PersistenceError,
    },
    /// All readable treasure hunts were loaded.
    Loaded(Vec<TreasureHunt>),
    /// Listing the storage directory failed.
    LoadFailed(PersistenceError),
    /// A treasure hunt file was deleted, or was already absent.
    Removed {
        /// The title of the removed hunt.
        title: String,
    },
    /// Deleting a treasure hunt file failed.
    RemoveFailed {
        /// The title of the hunt that failed to delete.
        title: String,
        /// What went wrong.
        error: PersistenceError,
    },
}

/// A queued write. Saves and deletes share one queue so a delete can never
/// overtake an earlier save of the same hunt.
#[derive(Debug)]
enum WriteRequest {
    Save {
        hunt: TreasureHunt,
        old_title: Option<String>,
    },
    Remove {
        title: String,
    },
}

/// Asynchronous, file-per-hunt storage service.
///
/// Requests return immediately; the work runs on background tokio tasks and
/// its outcome arrives later as a [`PersistenceEvent`]. One task performs all
/// writes in the order requested and a second performs loads, so there is
/// never more than one save, delete or load in flight.
///
/// Save requests carry an owned snapshot of the hunt, so the caller may keep
/// mutating its own copy while the write is pending.
pub struct PersistenceService {
    config: Arc<StorageConfig>,
    writes: mpsc::UnboundedSender<WriteRequest>,
    loads: mpsc::UnboundedSender<()>,
    completions: mpsc::UnboundedReceiver<PersistenceEvent>,
}

impl PersistenceService {
    /// Starts the background workers for `config`.
    ///
    /// Must be called from within a tokio runtime. The workers stop once the
    /// service is dropped and their queues are drained.
    #[must_use]
    pub fn start(config: StorageConfig) -> Self {
        let config: Arc<StorageConfig> = Arc::new(config);
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (writes, write_rx) = mpsc::unbounded_channel();
        let (loads, load_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_write_worker(
            Arc::clone(&config),
            write_rx,
            completion_tx.clone(),
        ));
        tokio::spawn(run_load_worker(Arc::clone(&config), load_rx, completion_tx));

        info!(
            "Persistence service started for {}",
            config.directory.display()
        );

        Self {
            config,
            writes,
            loads,
            completions,
        }
    }

    /// The storage configuration in use.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Queues a save of `hunt`; if `old_title` is given and differs, its file is
    /// deleted after the new one is written.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkerStopped` if the write worker has exited.
    pub fn save_treasure_hunt(
        &self,
        hunt: &TreasureHunt,
        old_title: Option<&str>,
    ) -> Result<(), PersistenceError> {
        debug!("Queueing save of treasure hunt '{}'", hunt.title);
        self.writes
            .send(WriteRequest::Save {
                hunt: hunt.clone(),
                old_title: old_title.map(ToString::to_string),
            })
            .map_err(|_| PersistenceError::WorkerStopped)
    }

    /// Queues a load of every stored treasure hunt.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkerStopped` if the load worker has exited.
    pub fn load_treasure_hunts(&self) -> Result<(), PersistenceError> {
        debug!("Queueing load of all treasure hunts");
        self.loads
            .send(())
            .map_err(|_| PersistenceError::WorkerStopped)
    }

    /// Queues deletion of the file for the hunt titled `title`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkerStopped` if the write worker has exited.
    pub fn remove_treasure_hunt(&self, title: &str) -> Result<(), PersistenceError> {
        debug!("Queueing removal of treasure hunt '{}'", title);
        self.writes
            .send(WriteRequest::Remove {
                title: title.to_string(),
            })
            .map_err(|_| PersistenceError::WorkerStopped)
    }

    /// Returns the next completed operation without waiting.
    pub fn try_next_event(&mut self) -> Option<PersistenceEvent> {
        self.completions.try_recv().ok()
    }

    /// Waits for the next completed operation.
    ///
    /// Returns `None` once both workers have stopped.
    pub async fn next_event(&mut self) -> Option<PersistenceEvent> {
        self.completions.recv().await
    }
}

async fn run_write_worker(
    config: Arc<StorageConfig>,
    mut requests: mpsc::UnboundedReceiver<WriteRequest>,
    completions: mpsc::UnboundedSender<PersistenceEvent>,
) {
    while let Some(request) = requests.recv().await {
        let event: PersistenceEvent = match request {
            WriteRequest::Save { hunt, old_title } => {
                match save_to_dir(&config, &hunt, old_title.as_deref()).await {
                    Ok(()) => {
                        debug!("Saved treasure hunt '{}'", hunt.title);
                        PersistenceEvent::Saved { title: hunt.title }
                    }
                    Err(e) => {
                        error!("Failed to save treasure hunt '{}': {}", hunt.title, e);
                        PersistenceEvent::SaveFailed {
                            title: hunt.title,
                            error: e,
                        }
                    }
                }
            }
            WriteRequest::Remove { title } => match remove_from_dir(&config, &title).await {
                Ok(existed) => {
                    if existed {
                        info!("Removed treasure hunt '{}'", title);
                    } else {
                        debug!("Treasure hunt '{}' had no file to remove", title);
                    }
                    PersistenceEvent::Removed { title }
                }
                Err(e) => {
                    error!("Failed to remove treasure hunt '{}': {}", title, e);
                    PersistenceEvent::RemoveFailed { title, error: e }
                }
            },
        };

        if completions.send(event).is_err() {
            debug!("No listener for persistence completions");
        }
    }
    debug!("Persistence write worker stopped");
}

async fn run_load_worker(
    config: Arc<StorageConfig>,
    mut requests: mpsc::UnboundedReceiver<()>,
    completions: mpsc::UnboundedSender<PersistenceEvent>,
) {
    while requests.recv().await.is_some() {
        // Requests queued behind this one would read the same directory
        while requests.try_recv().is_ok() {
            debug!("Coalescing duplicate load request");
        }

        let event: PersistenceEvent = match load_from_dir(&config).await {
            Ok(hunts) => PersistenceEvent::Loaded(hunts),
            Err(e) => {
                warn!("Failed to load treasure hunts: {}", e);
                PersistenceEvent::LoadFailed(e)
            }
        };

        if completions.send(event).is_err() {
            debug!("No listener for persistence completions");
        }
    }
    debug!("Persistence load worker stopped");
}
