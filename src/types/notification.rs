use serde::{Deserialize, Serialize};

use super::bookmark::{BookmarkKind, ToggleOutcome};

pub const VERSE_ADDED_MESSAGE: &str = "Verse bookmarked!";
pub const CHAPTER_ADDED_MESSAGE: &str = "Chapter bookmarked!";
pub const REMOVED_MESSAGE: &str = "Bookmark removed";

/// Icon hint passed along with a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationIcon {
    #[serde(rename = "bookmark")]
    Added,
    #[serde(rename = "bookmark-outline")]
    Removed,
}

impl NotificationIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationIcon::Added => "bookmark",
            NotificationIcon::Removed => "bookmark-outline",
        }
    }
}

/// A transient user-facing message raised by a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub icon: NotificationIcon,
}

impl Notification {
    /// The notification for a toggle of the given kind with the given outcome.
    pub fn for_toggle(kind: BookmarkKind, outcome: ToggleOutcome) -> Self {
        let (message, icon) = match (kind, outcome) {
            (BookmarkKind::Verse, ToggleOutcome::Added) => {
                (VERSE_ADDED_MESSAGE, NotificationIcon::Added)
            }
            (BookmarkKind::Chapter, ToggleOutcome::Added) => {
                (CHAPTER_ADDED_MESSAGE, NotificationIcon::Added)
            }
            (_, ToggleOutcome::Removed) => (REMOVED_MESSAGE, NotificationIcon::Removed),
        };
        Self {
            message: message.to_string(),
            icon,
        }
    }
}
