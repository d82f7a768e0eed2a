//! Collection and book data structures.

use serde::{Deserialize, Serialize};

/// A named compilation of text records, grouping numbered books.
///
/// Created once per source at load time and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Unique lowercase slug (e.g. "bukhari")
    pub id: String,

    /// Human-readable title
    pub display_name: String,

    /// Compiler/author name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Number of books in the collection
    pub total_books: i64,

    /// Number of text records in the collection
    pub total_items: i64,
}

/// A numbered subdivision within a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Owning collection slug
    pub collection_id: String,

    /// 1-based number, unique within the collection, matching the source
    /// chaptering
    pub number: i64,

    /// Book title
    pub title: String,

    /// Number of items in the book. Lazily computed: starts at 0 and is
    /// corrected once the collection's items are loaded.
    pub item_count: i64,
}

/// Canonical display names for well-known collection slugs.
///
/// Unknown slugs fall back to the slug itself so callers always get
/// something printable.
pub fn collection_display_name(slug: &str) -> &str {
    match slug.to_lowercase().as_str() {
        "bukhari" => "Sahih al-Bukhari",
        "muslim" => "Sahih Muslim",
        "abudawud" => "Sunan Abu Dawood",
        "tirmidhi" => "Jami' at-Tirmidhi",
        "nasai" => "Sunan an-Nasa'i",
        "ibnmajah" => "Sunan Ibn Majah",
        "muwatta" => "Muwatta Imam Malik",
        "riyadussaliheen" => "Riyad as-Salihin",
        "adab" => "Al-Adab al-Mufrad",
        "shamaa-il" => "Shamaa'il Tirmidhi",
        "mishkat" => "Mishkat al-Masabih",
        _ => slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_known_slug() {
        assert_eq!(collection_display_name("bukhari"), "Sahih al-Bukhari");
        assert_eq!(collection_display_name("Bukhari"), "Sahih al-Bukhari");
    }

    #[test]
    fn display_name_unknown_slug_falls_back() {
        assert_eq!(collection_display_name("unknown"), "unknown");
    }
}
