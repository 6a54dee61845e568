use thiserror::Error;

// === StorageError ===

/// Errors raised by the key-value persistence layer.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Storage database error: {0}")]
    Database(String),
    /// The backing store cannot be reached or written.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === BookmarkError ===

/// Errors related to bookmark identities and payloads.
#[derive(Error, Debug)]
pub enum BookmarkError {
    /// The verse key is not of the form `chapter:verse` or names no verse.
    #[error("Invalid verse key: {0}")]
    InvalidVerseKey(String),
    /// The chapter id is outside `1..=114`.
    #[error("Invalid chapter id: {0}")]
    InvalidChapterId(u16),
    /// The bookmark collection could not be (de)serialized.
    #[error("Bookmark serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BookmarkError {
    fn from(e: serde_json::Error) -> Self {
        BookmarkError::Serialization(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to loading and saving the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// The settings file is not valid settings JSON.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
}

// === AppError ===

/// Errors raised while wiring up a session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to open bookmark database: {0}")]
    Database(#[from] rusqlite::Error),
    /// Creating the data directory or starting the persistence worker failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The tracing subscriber could not be installed.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
