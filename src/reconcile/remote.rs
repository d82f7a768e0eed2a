//! Remote-API reconciler.
//!
//! The live content API defines the schema baseline, but it still needs two
//! adaptations: its `items`-bearing responses arrive either as a bare array
//! or wrapped in a `{ items, total, page, totalPages }` envelope, and its
//! collection/book documents spell titles as flat fields or as per-language
//! arrays (`collection: [{ lang, title }]`).

use serde_json::Value;

use crate::models::{Book, Collection, TextItem};

use super::{attribution, book_number, first_int, first_str, grade_or, item_number, primary_text,
    secondary_text};

/// Grade substituted when the remote record carries none.
const REMOTE_DEFAULT_GRADE: &str = "Sahih";

/// An unwrapped `items`-bearing response.
#[derive(Debug, Default)]
pub struct Envelope {
    pub entries: Vec<Value>,
    pub total: Option<usize>,
    pub page: Option<usize>,
    pub total_pages: Option<usize>,
}

/// Accept both response shapes the API is known to emit: a bare array, or
/// an object wrapping the array under `items`/`hadiths`/`data` with
/// pagination counters alongside.
pub fn unwrap_items(body: &Value) -> Envelope {
    if let Some(entries) = body.as_array() {
        return Envelope {
            entries: entries.clone(),
            ..Envelope::default()
        };
    }

    let entries = ["items", "hadiths", "data", "collections", "books"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default();

    Envelope {
        entries,
        total: first_int(body, &["total"]).map(|n| n.max(0) as usize),
        page: first_int(body, &["page"]).map(|n| n.max(0) as usize),
        total_pages: first_int(body, &["totalPages"]).map(|n| n.max(0) as usize),
    }
}

/// Map one remote collection document to the canonical shape.
///
/// Returns `None` when no collection id can be derived.
pub fn collection_from_value(value: &Value) -> Option<Collection> {
    let id = first_str(value, &["name", "id"])?.to_lowercase();
    let display_name = first_str(value, &["title", "displayName", "collectionName"])
        .or_else(|| lang_entry(value, "collection", "title"))
        .unwrap_or_else(|| id.clone());
    Some(Collection {
        display_name,
        author_name: first_str(value, &["author", "authorName"])
            .or_else(|| lang_entry(value, "collection", "author")),
        total_books: first_int(value, &["totalBooks", "books"]).unwrap_or(0),
        total_items: first_int(
            value,
            &["totalHadith", "totalAvailableHadith", "hadiths", "totalItems"],
        )
        .unwrap_or(0),
        id,
    })
}

/// Map one remote book document to the canonical shape.
pub fn book_from_value(collection_id: &str, value: &Value) -> Option<Book> {
    let number = first_int(value, &["bookNumber", "number", "id"])?;
    let title = first_str(value, &["bookName", "title"])
        .or_else(|| lang_entry(value, "book", "name"))
        .unwrap_or_else(|| format!("Book {number}"));
    Some(Book {
        collection_id: collection_id.to_string(),
        number,
        title,
        item_count: first_int(value, &["numberOfHadith", "hadithCount", "hadiths", "itemCount"])
            .unwrap_or(0),
    })
}

/// Map one remote record to the canonical shape.
///
/// Returns `None` for records with no derivable item number or no text at
/// all — the same defensive filtering the corpus reconciler applies.
pub fn item_from_value(collection_id: &str, value: &Value) -> Option<TextItem> {
    let number = item_number(value)?;
    let item = TextItem {
        collection_id: collection_id.to_string(),
        book_number: book_number(value).unwrap_or(1),
        item_number: number,
        primary_text: primary_text(value),
        secondary_text: secondary_text(value),
        grade: grade_or(value, REMOTE_DEFAULT_GRADE),
        attribution: attribution(value),
        chapter_id: first_int(value, &["chapterId"]),
    };
    item.has_text().then_some(item)
}

/// Collection slug a search hit belongs to, when the record carries one.
pub fn collection_of(value: &Value) -> Option<String> {
    first_str(value, &["collection", "collectionId", "collection_id"]).map(|s| s.to_lowercase())
}

/// Pull a field out of a per-language array like
/// `collection: [{ lang: "en", title: "..." }, { lang: "ar", ... }]`,
/// preferring the English entry.
fn lang_entry(value: &Value, key: &str, field: &str) -> Option<String> {
    let entries = value.get(key)?.as_array()?;
    let english = entries
        .iter()
        .find(|e| e.get("lang").and_then(Value::as_str) == Some("en"));
    english
        .or_else(|| entries.first())
        .and_then(|e| first_str(e, &[field]))
}
