//! Session wiring.
//!
//! Builds one bookmark session: settings, storage backend, persistence worker,
//! notifier and store. A session lives until the `App` is dropped.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::database::Database;
use crate::managers::bookmark_store::BookmarkStore;
use crate::platform;
use crate::services::notifier::BufferedNotifier;
use crate::services::persistence::PersistenceHandle;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::storage::{MemoryKeyValueStore, SqliteKeyValueStore};
use crate::types::errors::AppError;
use crate::types::settings::{AppSettings, StorageBackend, StorageSettings};

/// Environment variable naming the directory for `bookmarks.db` when the
/// settings do not give an explicit database path.
pub const DATA_DIR_ENV: &str = "QURAN_BOOKMARKS_DATA_DIR";

const DATABASE_FILE_NAME: &str = "bookmarks.db";

/// One bookmark session.
pub struct App {
    pub settings: AppSettings,
    pub store: BookmarkStore,
    /// Notifications raised by the store, waiting for the host to display them.
    pub notifications: BufferedNotifier,
}

impl App {
    /// Creates a session from the settings file.
    ///
    /// A malformed settings file is logged and replaced by the defaults.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, AppError> {
        let mut settings_engine = SettingsEngine::new(config_path);
        if let Err(e) = settings_engine.load() {
            warn!(
                path = %settings_engine.get_config_path().display(),
                error = %e,
                "Ignoring unreadable settings file"
            );
        }
        Self::with_settings(settings_engine.get_settings().clone())
    }

    /// Creates a session from explicit settings.
    pub fn with_settings(settings: AppSettings) -> Result<Self, AppError> {
        let persistence = open_persistence(&settings.storage)?;
        let notifications = BufferedNotifier::new();
        let store = BookmarkStore::new(
            persistence,
            &settings.storage.bookmarks_key,
            Arc::new(notifications.clone()),
        );

        Ok(Self {
            settings,
            store,
            notifications,
        })
    }

    /// Creates an ephemeral session whose bookmarks are never written to disk.
    pub fn in_memory() -> Result<Self, AppError> {
        let mut settings = AppSettings::default();
        settings.storage.backend = StorageBackend::Memory;
        Self::with_settings(settings)
    }
}

/// Resolves the SQLite path: explicit setting, then `$QURAN_BOOKMARKS_DATA_DIR`,
/// then the platform data directory.
pub fn resolve_database_path(storage: &StorageSettings) -> PathBuf {
    if let Some(path) = &storage.database_path {
        return PathBuf::from(path);
    }
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(platform::get_data_dir)
        .join(DATABASE_FILE_NAME)
}

fn open_persistence(storage: &StorageSettings) -> Result<PersistenceHandle, AppError> {
    let handle = match storage.backend {
        StorageBackend::Sqlite => {
            let path = resolve_database_path(storage);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            info!(path = %path.display(), "Opening bookmark database");
            PersistenceHandle::spawn(SqliteKeyValueStore::new(Database::open(&path)?))?
        }
        StorageBackend::Memory => {
            info!("Using in-memory bookmark storage");
            PersistenceHandle::spawn(MemoryKeyValueStore::new())?
        }
    };
    Ok(handle)
}
