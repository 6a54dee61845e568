use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::BookmarkError;

/// Number of chapters (surahs) in the Quran.
pub const CHAPTER_COUNT: u16 = 114;

/// Composite verse identifier, written as `"{chapterId}:{verseNumber}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseKey {
    pub chapter_id: u16,
    pub verse_number: u16,
}

impl VerseKey {
    /// Builds a key, rejecting chapter ids outside `1..=114` and verse number 0.
    pub fn new(chapter_id: u16, verse_number: u16) -> Result<Self, BookmarkError> {
        validate_chapter_id(chapter_id)?;
        if verse_number == 0 {
            return Err(BookmarkError::InvalidVerseKey(format!(
                "{}:{}",
                chapter_id, verse_number
            )));
        }
        Ok(Self {
            chapter_id,
            verse_number,
        })
    }

    /// Parses the `"c:v"` shape without range checks.
    fn parse_unchecked(s: &str) -> Result<Self, BookmarkError> {
        let invalid = || BookmarkError::InvalidVerseKey(s.to_string());
        let (chapter, verse) = s.trim().split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            chapter_id: chapter.parse().map_err(|_| invalid())?,
            verse_number: verse.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter_id, self.verse_number)
    }
}

impl FromStr for VerseKey {
    type Err = BookmarkError;

    /// Parses and range-checks user input such as `"2:255"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = Self::parse_unchecked(s)?;
        Self::new(key.chapter_id, key.verse_number)
            .map_err(|_| BookmarkError::InvalidVerseKey(s.to_string()))
    }
}

impl Serialize for VerseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Stored keys are read back without range checks: anything the store
/// accepted and wrote must load again.
impl<'de> Deserialize<'de> for VerseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_unchecked(&raw).map_err(serde::de::Error::custom)
    }
}

/// Checks that a chapter id names one of the 114 chapters.
pub fn validate_chapter_id(chapter_id: u16) -> Result<(), BookmarkError> {
    if chapter_id == 0 || chapter_id > CHAPTER_COUNT {
        return Err(BookmarkError::InvalidChapterId(chapter_id));
    }
    Ok(())
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix,
/// e.g. `2024-01-01T00:00:00.000Z`.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// A bookmarked verse with display fields captured at bookmark time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseBookmark {
    pub verse_key: VerseKey,
    pub chapter_id: u16,
    pub chapter_name: String,
    pub chapter_arabic_name: String,
    pub verse_number: u16,
    pub arabic_text: String,
    pub translation_preview: String,
    #[serde(with = "iso8601_millis")]
    pub bookmarked_at: DateTime<Utc>,
}

impl VerseBookmark {
    /// Whether `verse_key` names the verse given by `chapter_id` and `verse_number`.
    pub fn key_matches_fields(&self) -> bool {
        self.verse_key.chapter_id == self.chapter_id
            && self.verse_key.verse_number == self.verse_number
    }
}

/// A bookmarked chapter with display fields captured at bookmark time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterBookmark {
    pub chapter_id: u16,
    pub chapter_name: String,
    pub chapter_arabic_name: String,
    pub verses_count: u16,
    #[serde(with = "iso8601_millis")]
    pub bookmarked_at: DateTime<Utc>,
}

/// A single entry of the bookmark collection, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Bookmark {
    Verse(VerseBookmark),
    Chapter(ChapterBookmark),
}

/// Identity of a bookmark. At most one bookmark per id may exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookmarkId {
    Verse(VerseKey),
    Chapter(u16),
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkId::Verse(key) => write!(f, "verse {}", key),
            BookmarkId::Chapter(id) => write!(f, "chapter {}", id),
        }
    }
}

/// Discriminant used to filter the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    Verse,
    Chapter,
}

impl FromStr for BookmarkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verse" => Ok(BookmarkKind::Verse),
            "chapter" => Ok(BookmarkKind::Chapter),
            other => Err(format!(
                "Invalid bookmark kind: '{}'. Valid options: verse, chapter",
                other
            )),
        }
    }
}

impl Bookmark {
    pub fn id(&self) -> BookmarkId {
        match self {
            Bookmark::Verse(verse) => BookmarkId::Verse(verse.verse_key),
            Bookmark::Chapter(chapter) => BookmarkId::Chapter(chapter.chapter_id),
        }
    }

    pub fn kind(&self) -> BookmarkKind {
        match self {
            Bookmark::Verse(_) => BookmarkKind::Verse,
            Bookmark::Chapter(_) => BookmarkKind::Chapter,
        }
    }

    pub fn bookmarked_at(&self) -> DateTime<Utc> {
        match self {
            Bookmark::Verse(verse) => verse.bookmarked_at,
            Bookmark::Chapter(chapter) => chapter.bookmarked_at,
        }
    }

    pub fn is_verse(&self, key: &VerseKey) -> bool {
        matches!(self, Bookmark::Verse(verse) if verse.verse_key == *key)
    }

    pub fn is_chapter(&self, chapter_id: u16) -> bool {
        matches!(self, Bookmark::Chapter(chapter) if chapter.chapter_id == chapter_id)
    }
}

/// Payload for toggling a verse bookmark: everything except the tag and the
/// timestamp. The verse key is derived from `chapter_id` and `verse_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVerseBookmark {
    pub chapter_id: u16,
    pub chapter_name: String,
    pub chapter_arabic_name: String,
    pub verse_number: u16,
    #[serde(default)]
    pub arabic_text: String,
    #[serde(default)]
    pub translation_preview: String,
}

impl NewVerseBookmark {
    pub fn verse_key(&self) -> VerseKey {
        VerseKey {
            chapter_id: self.chapter_id,
            verse_number: self.verse_number,
        }
    }

    /// Rejects payloads whose chapter id or verse number cannot name a verse.
    pub fn validate(&self) -> Result<VerseKey, BookmarkError> {
        VerseKey::new(self.chapter_id, self.verse_number)
    }

    pub fn into_bookmark(self, bookmarked_at: DateTime<Utc>) -> Bookmark {
        Bookmark::Verse(VerseBookmark {
            verse_key: self.verse_key(),
            chapter_id: self.chapter_id,
            chapter_name: self.chapter_name,
            chapter_arabic_name: self.chapter_arabic_name,
            verse_number: self.verse_number,
            arabic_text: self.arabic_text,
            translation_preview: self.translation_preview,
            bookmarked_at,
        })
    }
}

/// Payload for toggling a chapter bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapterBookmark {
    pub chapter_id: u16,
    pub chapter_name: String,
    pub chapter_arabic_name: String,
    pub verses_count: u16,
}

impl NewChapterBookmark {
    pub fn validate(&self) -> Result<u16, BookmarkError> {
        validate_chapter_id(self.chapter_id)?;
        Ok(self.chapter_id)
    }

    pub fn into_bookmark(self, bookmarked_at: DateTime<Utc>) -> Bookmark {
        Bookmark::Chapter(ChapterBookmark {
            chapter_id: self.chapter_id,
            chapter_name: self.chapter_name,
            chapter_arabic_name: self.chapter_arabic_name,
            verses_count: self.verses_count,
            bookmarked_at,
        })
    }
}

/// Result of a toggle: whether the bookmark now exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    pub fn is_bookmarked(&self) -> bool {
        matches!(self, ToggleOutcome::Added)
    }
}
