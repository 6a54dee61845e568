// Services
// Services provide the capabilities managers depend on: storage, background persistence, notification, settings.

pub mod notifier;
pub mod persistence;
pub mod settings_engine;
pub mod storage;
