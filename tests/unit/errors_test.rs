use std::error::Error;

use quran_bookmarks::types::errors::*;

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::Database("locked".to_string()).to_string(),
        "Storage database error: locked"
    );
    assert_eq!(
        StorageError::Unavailable("disk full".to_string()).to_string(),
        "Storage unavailable: disk full"
    );
}

#[test]
fn storage_error_from_rusqlite() {
    let err: StorageError = rusqlite::Error::InvalidQuery.into();
    assert!(matches!(err, StorageError::Database(_)));
}

// === BookmarkError Tests ===

#[test]
fn bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::InvalidVerseKey("2-255".to_string()).to_string(),
        "Invalid verse key: 2-255"
    );
    assert_eq!(
        BookmarkError::InvalidChapterId(115).to_string(),
        "Invalid chapter id: 115"
    );
}

#[test]
fn bookmark_error_from_serde_json() {
    let json_err = serde_json::from_str::<Vec<u8>>("nope").unwrap_err();
    assert!(matches!(BookmarkError::from(json_err), BookmarkError::Serialization(_)));
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::Io("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::Serialization("eof".to_string()).to_string(),
        "Settings serialization error: eof"
    );
}

// === AppError Tests ===

#[test]
fn app_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err = AppError::from(io);
    assert_eq!(err.to_string(), "I/O error: read-only");
    assert!(err.source().is_some());
}

#[test]
fn app_error_logging_display() {
    let err = AppError::Logging("already set".to_string());
    assert_eq!(err.to_string(), "Failed to initialise logging: already set");
}
