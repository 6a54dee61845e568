//! RPC method handler for the bookmark JSON-RPC protocol.
//!
//! Kept separate from `rpc_server.rs` so it can be unit-tested without stdio.
//! `handle_method` dispatches one call to the session's bookmark store.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::types::bookmark::{
    validate_chapter_id, BookmarkKind, NewChapterBookmark, NewVerseBookmark, VerseKey,
};

fn param_str<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn param_chapter_id(params: &Value) -> Result<u16, String> {
    let raw = params
        .get("chapterId")
        .and_then(|v| v.as_u64())
        .ok_or("missing chapterId")?;
    let chapter_id = u16::try_from(raw).map_err(|_| format!("invalid chapterId: {}", raw))?;
    validate_chapter_id(chapter_id).map_err(|e| e.to_string())?;
    Ok(chapter_id)
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    let store = &app.store;
    match method {
        "ping" => Ok(json!({"pong": true})),

        "bookmark.status" => {
            let stats = store.persistence_stats();
            Ok(json!({
                "loading": store.is_loading(),
                "count": store.len(),
                "persistence": {
                    "issued": stats.issued,
                    "completed": stats.completed,
                    "failed": stats.failed,
                    "coalesced": stats.coalesced,
                },
            }))
        }

        "bookmark.list" => {
            let items = match params.get("kind").and_then(|v| v.as_str()) {
                Some(kind) => store.bookmarks_of_kind(kind.parse::<BookmarkKind>()?),
                None => store.bookmarks(),
            };
            Ok(json!({"items": items}))
        }

        "bookmark.is_verse_bookmarked" => {
            let key = param_str(params, "verseKey")?
                .parse::<VerseKey>()
                .map_err(|e| e.to_string())?;
            Ok(json!({"verseKey": key, "bookmarked": store.is_verse_bookmarked(&key)}))
        }

        "bookmark.is_chapter_bookmarked" => {
            let chapter_id = param_chapter_id(params)?;
            Ok(json!({"chapterId": chapter_id, "bookmarked": store.is_chapter_bookmarked(chapter_id)}))
        }

        "bookmark.toggle_verse" => {
            let data: NewVerseBookmark = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid verse bookmark: {}", e))?;
            let key = data.validate().map_err(|e| e.to_string())?;
            if let Some(claimed) = params.get("verseKey").and_then(|v| v.as_str()) {
                if claimed != key.to_string() {
                    return Err(format!(
                        "verseKey {} does not match chapterId:verseNumber {}",
                        claimed, key
                    ));
                }
            }
            let outcome = store.toggle_verse_bookmark(data);
            Ok(json!({
                "verseKey": key,
                "outcome": outcome,
                "bookmarked": outcome.is_bookmarked(),
                "notifications": app.notifications.drain(),
            }))
        }

        "bookmark.toggle_chapter" => {
            let data: NewChapterBookmark = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid chapter bookmark: {}", e))?;
            let chapter_id = data.validate().map_err(|e| e.to_string())?;
            let outcome = store.toggle_chapter_bookmark(data);
            Ok(json!({
                "chapterId": chapter_id,
                "outcome": outcome,
                "bookmarked": outcome.is_bookmarked(),
                "notifications": app.notifications.drain(),
            }))
        }

        "bookmark.clear" => {
            store.clear();
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
