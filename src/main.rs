//! Console demo for the bookmark store.
//!
//! Runs an ephemeral session and walks through the toggle scenarios, printing
//! the collection, the raised notifications and the background write counters.

use quran_bookmarks::app::App;
use quran_bookmarks::logging::init_logging;
use quran_bookmarks::managers::bookmark_store::BookmarkStoreTrait;
use quran_bookmarks::types::bookmark::{Bookmark, NewChapterBookmark, NewVerseBookmark};
use quran_bookmarks::types::errors::AppError;
use quran_bookmarks::types::settings::LoggingSettings;

fn ayat_al_kursi() -> NewVerseBookmark {
    NewVerseBookmark {
        chapter_id: 2,
        chapter_name: "Al-Baqarah".to_string(),
        chapter_arabic_name: "البقرة".to_string(),
        verse_number: 255,
        arabic_text: "اللَّهُ لَا إِلَٰهَ إِلَّا هُوَ الْحَيُّ الْقَيُّومُ".to_string(),
        translation_preview: "Allah - there is no deity except Him, the Ever-Living".to_string(),
    }
}

fn al_fatihah() -> NewChapterBookmark {
    NewChapterBookmark {
        chapter_id: 1,
        chapter_name: "Al-Fatihah".to_string(),
        chapter_arabic_name: "الفاتحة".to_string(),
        verses_count: 7,
    }
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_state(app: &App) {
    for notification in app.notifications.drain() {
        println!("  [{}] {}", notification.icon.as_str(), notification.message);
    }
    let items: Vec<String> = app
        .store
        .bookmarks()
        .iter()
        .map(|b| match b {
            Bookmark::Verse(v) => format!("verse {} ({})", v.verse_key, v.chapter_name),
            Bookmark::Chapter(c) => format!("chapter {} ({})", c.chapter_id, c.chapter_name),
        })
        .collect();
    println!("  collection: [{}]", items.join(", "));
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging(&LoggingSettings::default())?;

    let app = App::in_memory()?;
    app.store.wait_until_loaded().await;
    let kursi = ayat_al_kursi().verse_key();

    section("Toggle a verse on and off");
    app.store.toggle_verse_bookmark(ayat_al_kursi());
    print_state(&app);
    app.store.toggle_verse_bookmark(ayat_al_kursi());
    print_state(&app);

    section("Chapter first, then verse: newest first");
    app.store.toggle_chapter_bookmark(al_fatihah());
    app.store.toggle_verse_bookmark(ayat_al_kursi());
    print_state(&app);
    println!(
        "  is_chapter_bookmarked(1) = {}, is_verse_bookmarked({}) = {}",
        app.store.is_chapter_bookmarked(1),
        kursi,
        app.store.is_verse_bookmarked(&kursi)
    );

    app.store.flush().await;
    let stats = app.store.persistence_stats();
    println!(
        "  writes: issued {}, completed {}, coalesced {}, failed {}",
        stats.issued, stats.completed, stats.coalesced, stats.failed
    );
    Ok(())
}
