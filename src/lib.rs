//! Quran Bookmarks: an offline bookmark store for Quran verses and chapters.
//!
//! The store keeps a de-duplicated, newest-first collection in memory and
//! mirrors it to a key-value slot through a background persistence worker.
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
