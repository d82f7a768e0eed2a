// src/reconcile/mod.rs

//! Schema reconciliation.
//!
//! Every upstream source (the remote content API and each bundled corpus
//! document) uses its own record schema: item numbers appear as `id`,
//! `idInBook`, `hadith` or `hadithNumber`; translated text as a bare string
//! or a `{ narrator, text }` object; grades as a string, an array, or not at
//! all. The accessors here apply an ordered list of candidate fields and
//! return the first non-empty match, so all source-specific coalescing stays
//! in this module and everything downstream consumes one canonical shape.
//!
//! All accessors are total: absence of every candidate yields `""` (text),
//! `None` (numbers) or the supplied default (grade). Nothing here panics on
//! malformed input.

mod corpus;
mod remote;

use serde_json::Value;

use crate::models::{Book, Collection, TextItem};

pub use corpus::{SourceSpec, reconcile_corpus};
pub use remote::{
    book_from_value, collection_from_value, collection_of, item_from_value, unwrap_items,
};

/// Output of one reconciler invocation: a collection with its books and
/// canonical text records.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub collection: Collection,
    pub books: Vec<Book>,
    pub items: Vec<TextItem>,
}

/// First non-empty string among the candidate keys.
pub(crate) fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = value.get(key).and_then(nonempty_str) {
            return Some(s);
        }
    }
    None
}

/// First integer among the candidate keys.
///
/// Numeric strings are parsed leniently; anything else counts as absent.
pub(crate) fn first_int(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| value.get(key).and_then(as_int))
}

fn nonempty_str(value: &Value) -> Option<String> {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Translated text of a record. The `english` field may be a bare string or
/// an object carrying `text` and `narrator`.
pub fn primary_text(value: &Value) -> String {
    if let Some(english) = value.get("english") {
        if let Some(s) = nonempty_str(english) {
            return s;
        }
        if let Some(s) = english.get("text").and_then(nonempty_str) {
            return s;
        }
    }
    first_str(value, &["hadithEnglish", "translation", "text"]).unwrap_or_default()
}

/// Original-language text of a record.
pub fn secondary_text(value: &Value) -> String {
    first_str(value, &["arabic", "hadithArabic"]).unwrap_or_default()
}

/// Authenticity grade, defaulting to the collection-level default.
///
/// The remote API nests grades as `grades: [{ grade, gradedBy }]`; bundled
/// corpora use a plain `grade` string or omit it entirely.
pub fn grade_or(value: &Value, default: &str) -> String {
    if let Some(s) = value
        .get("grades")
        .and_then(|g| g.get(0))
        .and_then(|g| g.get("grade"))
        .and_then(nonempty_str)
    {
        return s;
    }
    first_str(value, &["grade"]).unwrap_or_else(|| default.to_string())
}

/// Narrator/attribution line, when any source field carries one.
pub fn attribution(value: &Value) -> Option<String> {
    if let Some(s) = value
        .get("english")
        .and_then(|e| e.get("narrator"))
        .and_then(nonempty_str)
    {
        return Some(s);
    }
    first_str(value, &["narrator", "attribution"])
}

/// Item number: the field the source schemas alias most freely.
pub(crate) fn item_number(value: &Value) -> Option<i64> {
    first_int(value, &["idInBook", "hadithNumber", "hadith", "id"])
}

/// Book number a record belongs to, coalesced across chapter/book aliases.
pub(crate) fn book_number(value: &Value) -> Option<i64> {
    first_int(value, &["chapterId", "bookId", "bookNumber", "book"])
}
