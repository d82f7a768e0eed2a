//! Canonical text record structure.

use serde::{Deserialize, Serialize};

use super::collection::{Book, Collection, collection_display_name};

/// One canonical, uniquely numbered record within a book.
///
/// `(collection_id, book_number, item_number)` is the stable composite
/// identity used for deep links and bookmarks, regardless of which upstream
/// schema produced the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextItem {
    /// Owning collection slug
    pub collection_id: String,

    /// Book number within the collection
    pub book_number: i64,

    /// Item number within the book
    pub item_number: i64,

    /// Translated text (English in the bundled corpora)
    pub primary_text: String,

    /// Original-language text (Arabic in the bundled corpora)
    pub secondary_text: String,

    /// Authenticity grade. Never empty: reconcilers substitute the
    /// collection-level default when the source omits it.
    pub grade: String,

    /// Narrator/attribution line, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,

    /// Source chapter id, when the upstream schema carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<i64>,
}

impl TextItem {
    /// Whether the record carries any usable text. Items failing this check
    /// are dropped during reconciliation.
    pub fn has_text(&self) -> bool {
        !self.primary_text.is_empty() || !self.secondary_text.is_empty()
    }

    /// Human-readable reference, e.g. `"Sahih Muslim, Book 1, Hadith 3"`.
    pub fn reference(&self) -> String {
        format!(
            "{}, Book {}, Hadith {}",
            collection_display_name(&self.collection_id),
            self.book_number,
            self.item_number
        )
    }

    /// Deep-link identifier, e.g. `"muslim-1-3"`.
    pub fn composite_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.collection_id, self.book_number, self.item_number
        )
    }
}

/// Parse a deep-link identifier back into `(collection, book, item)`.
///
/// Returns `None` for anything that is not exactly three dash-separated
/// parts with numeric book and item components.
pub fn parse_composite_id(id: &str) -> Option<(String, i64, i64)> {
    let mut parts = id.splitn(3, '-');
    let collection = parts.next()?.trim();
    let book = parts.next()?.trim().parse::<i64>().ok()?;
    let item = parts.next()?.trim().parse::<i64>().ok()?;
    if collection.is_empty() {
        return None;
    }
    Some((collection.to_lowercase(), book, item))
}

/// Result of the three-level random descent: one item together with the
/// collection and book it was drawn from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RandomPick {
    pub item: TextItem,
    pub collection: Collection,
    pub book: Book,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> TextItem {
        TextItem {
            collection_id: "muslim".to_string(),
            book_number: 1,
            item_number: 3,
            primary_text: "Purification is half of faith.".to_string(),
            secondary_text: "الطُّهُرُ شَطْرُ الإِيمَانِ".to_string(),
            grade: "Sahih".to_string(),
            attribution: None,
            chapter_id: Some(1),
        }
    }

    #[test]
    fn reference_format() {
        assert_eq!(sample_item().reference(), "Sahih Muslim, Book 1, Hadith 3");
    }

    #[test]
    fn composite_id_round_trip() {
        let item = sample_item();
        let id = item.composite_id();
        assert_eq!(id, "muslim-1-3");
        assert_eq!(
            parse_composite_id(&id),
            Some(("muslim".to_string(), 1, 3))
        );
    }

    #[test]
    fn parse_composite_id_rejects_malformed() {
        assert_eq!(parse_composite_id("muslim-1"), None);
        assert_eq!(parse_composite_id("muslim-one-3"), None);
        assert_eq!(parse_composite_id("-1-3"), None);
    }

    #[test]
    fn has_text_requires_one_side() {
        let mut item = sample_item();
        assert!(item.has_text());
        item.primary_text.clear();
        assert!(item.has_text());
        item.secondary_text.clear();
        assert!(!item.has_text());
    }
}
