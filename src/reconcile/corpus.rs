//! Bundled-corpus reconciler.
//!
//! Maps one corpus document (`{ metadata, chapters, hadiths }`, with every
//! field spelling the corpus author happened to pick) into the canonical
//! shape. Malformed documents reconcile to an empty result set instead of
//! failing: the store must come up even if one corpus file is bad.

use serde_json::Value;

use crate::models::{Book, Collection, TextItem};

use super::{
    Reconciled, attribution, book_number, first_int, first_str, grade_or, item_number,
    primary_text, secondary_text,
};

/// Static description of one bundled source: identity, presentation
/// metadata and the grade substituted when a record omits its own.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    pub slug: &'static str,
    pub display_name: &'static str,
    pub author: &'static str,
    pub default_grade: &'static str,
}

/// Reconcile one corpus document against its source description.
pub fn reconcile_corpus(spec: &SourceSpec, doc: &Value) -> Reconciled {
    let mut books = reconcile_books(spec.slug, doc);
    let items = reconcile_items(spec, doc);

    // Correct the lazily-initialized per-book counts now that items are known.
    for book in &mut books {
        book.item_count = items.iter().filter(|i| i.book_number == book.number).count() as i64;
    }

    let collection = Collection {
        id: spec.slug.to_string(),
        display_name: metadata_str(doc, "title").unwrap_or_else(|| spec.display_name.to_string()),
        author_name: metadata_str(doc, "author").or_else(|| {
            if spec.author.is_empty() {
                None
            } else {
                Some(spec.author.to_string())
            }
        }),
        total_books: books.len() as i64,
        total_items: items.len() as i64,
    };

    Reconciled {
        collection,
        books,
        items,
    }
}

/// Collection metadata field, coalescing over English/Arabic variants and a
/// flat layout.
fn metadata_str(doc: &Value, field: &str) -> Option<String> {
    let metadata = doc.get("metadata")?;
    for lang in ["english", "arabic"] {
        if let Some(s) = metadata
            .get(lang)
            .and_then(|m| first_str(m, &[field]))
        {
            return Some(s);
        }
    }
    first_str(metadata, &[field])
}

fn reconcile_books(slug: &str, doc: &Value) -> Vec<Book> {
    let chapters = ["chapters", "books"]
        .iter()
        .find_map(|key| doc.get(*key).and_then(Value::as_array));
    let Some(chapters) = chapters else {
        return Vec::new();
    };

    let mut books = Vec::new();
    for chapter in chapters {
        let Some(number) = first_int(chapter, &["id", "chapterId", "bookNumber", "number"]) else {
            log::debug!("{slug}: skipping chapter without a number");
            continue;
        };
        let title = first_str(chapter, &["english", "title"])
            .or_else(|| first_str(chapter, &["arabic"]))
            .unwrap_or_else(|| format!("Book {number}"));
        books.push(Book {
            collection_id: slug.to_string(),
            number,
            title,
            item_count: 0,
        });
    }
    books
}

fn reconcile_items(spec: &SourceSpec, doc: &Value) -> Vec<TextItem> {
    let hadiths = ["hadiths", "items"]
        .iter()
        .find_map(|key| doc.get(*key).and_then(Value::as_array));
    let Some(hadiths) = hadiths else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for hadith in hadiths {
        let Some(number) = item_number(hadith) else {
            log::debug!("{}: skipping record without an item number", spec.slug);
            continue;
        };
        let item = TextItem {
            collection_id: spec.slug.to_string(),
            book_number: book_number(hadith).unwrap_or(1),
            item_number: number,
            primary_text: primary_text(hadith),
            secondary_text: secondary_text(hadith),
            grade: grade_or(hadith, spec.default_grade),
            attribution: attribution(hadith),
            chapter_id: first_int(hadith, &["chapterId"]),
        };
        if !item.has_text() {
            log::debug!(
                "{}: dropping textless record {}",
                spec.slug,
                item.item_number
            );
            continue;
        }
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPEC: SourceSpec = SourceSpec {
        slug: "testsource",
        display_name: "Test Source",
        author: "Test Author",
        default_grade: "Sahih",
    };

    #[test]
    fn reconciles_divergent_item_schemas() {
        let doc = json!({
            "metadata": { "english": { "title": "My Title", "author": "My Author" } },
            "chapters": [
                { "id": 1, "english": "Faith" },
                { "id": 2, "arabic": "كتاب" }
            ],
            "hadiths": [
                { "idInBook": 1, "chapterId": 1, "english": "First", "arabic": "أول" },
                { "id": 2, "bookId": 1, "english": { "text": "Second", "narrator": "N" } },
                { "hadithNumber": "3", "bookNumber": "2", "translation": "Third", "grade": "Hasan" }
            ]
        });
        let result = reconcile_corpus(&SPEC, &doc);

        assert_eq!(result.collection.display_name, "My Title");
        assert_eq!(result.collection.author_name.as_deref(), Some("My Author"));
        assert_eq!(result.collection.total_books, 2);
        assert_eq!(result.collection.total_items, 3);

        assert_eq!(result.books[0].title, "Faith");
        assert_eq!(result.books[0].item_count, 2);
        assert_eq!(result.books[1].title, "كتاب");
        assert_eq!(result.books[1].item_count, 1);

        assert_eq!(result.items[0].item_number, 1);
        assert_eq!(result.items[1].item_number, 2);
        assert_eq!(result.items[1].attribution.as_deref(), Some("N"));
        assert_eq!(result.items[2].book_number, 2);
        assert_eq!(result.items[2].grade, "Hasan");
    }

    #[test]
    fn applies_default_grade() {
        let doc = json!({
            "hadiths": [ { "id": 1, "english": "text" } ]
        });
        let result = reconcile_corpus(&SPEC, &doc);
        assert_eq!(result.items[0].grade, "Sahih");
    }

    #[test]
    fn drops_textless_and_unnumbered_records() {
        let doc = json!({
            "hadiths": [
                { "id": 1 },
                { "english": "no number" },
                { "id": 2, "arabic": "نص" }
            ]
        });
        let result = reconcile_corpus(&SPEC, &doc);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].item_number, 2);
        assert!(result.items.iter().all(TextItem::has_text));
    }

    #[test]
    fn malformed_document_yields_empty_result() {
        for doc in [json!("not an object"), json!({ "hadiths": "nope" }), json!(null)] {
            let result = reconcile_corpus(&SPEC, &doc);
            assert!(result.books.is_empty());
            assert!(result.items.is_empty());
            assert_eq!(result.collection.id, "testsource");
            assert_eq!(result.collection.display_name, "Test Source");
        }
    }

    #[test]
    fn books_key_is_accepted_for_chapters() {
        let doc = json!({
            "books": [ { "number": 4 } ]
        });
        let result = reconcile_corpus(&SPEC, &doc);
        assert_eq!(result.books.len(), 1);
        assert_eq!(result.books[0].number, 4);
        assert_eq!(result.books[0].title, "Book 4");
    }
}
