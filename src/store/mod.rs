// src/store/mod.rs

//! Local corpus store.
//!
//! An in-memory index over the bundled corpora, built once at startup and
//! read-only afterwards, so concurrent reads need no synchronization. This
//! is the terminal fallback tier: every operation here is total and returns
//! empty/`None` rather than failing.

mod bundled;

use std::collections::HashMap;
use std::path::Path;

use rand::seq::SliceRandom;
use serde_json::Value;

use crate::models::{Book, Collection, Page, RandomPick, TextItem};
use crate::reconcile::{Reconciled, reconcile_corpus};

pub use bundled::{BundledSource, SOURCES};

/// In-memory index over the reconciled bundled corpora.
pub struct CorpusStore {
    collections: Vec<Collection>,
    books: HashMap<String, Vec<Book>>,
    items: HashMap<String, Vec<TextItem>>,
}

impl CorpusStore {
    /// Build the store from the embedded corpus documents.
    pub fn bundled() -> Self {
        Self::from_reconciled(
            SOURCES
                .iter()
                .map(|source| reconcile_source(source, None))
                .collect(),
        )
    }

    /// Build the store, preferring `<dir>/<slug>.json` for any source whose
    /// override file exists and parses; everything else falls back to the
    /// embedded document. Override files are read concurrently.
    pub async fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::bundled();
        };

        let reads = SOURCES.iter().map(|source| {
            let path = dir.join(format!("{}.json", source.spec.slug));
            async move {
                match tokio::fs::read_to_string(&path).await {
                    Ok(content) => match serde_json::from_str::<Value>(&content) {
                        Ok(doc) => {
                            log::info!("Loaded corpus override for {}", source.spec.slug);
                            reconcile_source(source, Some(&doc))
                        }
                        Err(e) => {
                            log::warn!(
                                "Corpus override {} is not valid JSON: {}. Using embedded data.",
                                path.display(),
                                e
                            );
                            reconcile_source(source, None)
                        }
                    },
                    Err(_) => reconcile_source(source, None),
                }
            }
        });

        Self::from_reconciled(futures::future::join_all(reads).await)
    }

    fn from_reconciled(reconciled: Vec<Reconciled>) -> Self {
        let mut collections = Vec::new();
        let mut books = HashMap::new();
        let mut items = HashMap::new();
        for entry in reconciled {
            books.insert(entry.collection.id.clone(), entry.books);
            items.insert(entry.collection.id.clone(), entry.items);
            collections.push(entry.collection);
        }
        Self {
            collections,
            books,
            items,
        }
    }

    /// All reconciled collections, in declaration order. Non-empty unless
    /// the bundle itself is empty.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Look up a collection by case-insensitive slug.
    pub fn collection(&self, collection_id: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(collection_id.trim()))
    }

    /// Books of a collection.
    ///
    /// Unknown collection ids fail soft to the default (first declared)
    /// collection's books: the UI layer always needs *some* list, so this is
    /// a deliberate forgiving policy rather than silent corruption.
    pub fn books(&self, collection_id: &str) -> &[Book] {
        let id = match self.collection(collection_id) {
            Some(collection) => collection.id.as_str(),
            None => {
                log::debug!("Unknown collection '{collection_id}', serving default books");
                match self.collections.first() {
                    Some(first) => first.id.as_str(),
                    None => return &[],
                }
            }
        };
        self.books.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up one book by number.
    pub fn book(&self, collection_id: &str, number: i64) -> Option<&Book> {
        self.collection(collection_id)
            .and_then(|c| self.books.get(&c.id))
            .and_then(|books| books.iter().find(|b| b.number == number))
    }

    fn collection_items(&self, collection_id: &str) -> &[TextItem] {
        self.collection(collection_id)
            .and_then(|c| self.items.get(&c.id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// One page of a collection's items, optionally filtered by book.
    ///
    /// Quirk carried over from the original system: when the book filter
    /// matches nothing, the *unfiltered* collection is paginated instead of
    /// returning an empty page. This affects observable totals and is kept
    /// deliberately — it keeps the UI out of dead ends.
    pub fn items(
        &self,
        collection_id: &str,
        book: Option<i64>,
        page: usize,
        page_size: usize,
    ) -> Page<TextItem> {
        let all = self.collection_items(collection_id);
        if all.is_empty() {
            return Page::empty(page);
        }

        match book {
            Some(number) => {
                let filtered: Vec<TextItem> = all
                    .iter()
                    .filter(|i| i.book_number == number)
                    .cloned()
                    .collect();
                if filtered.is_empty() {
                    log::debug!(
                        "No items for {collection_id} book {number}, serving unfiltered collection"
                    );
                    Page::slice(all, page, page_size)
                } else {
                    Page::slice(&filtered, page, page_size)
                }
            }
            None => Page::slice(all, page, page_size),
        }
    }

    /// Find one item by composite identity. Linear scan; `None` on miss.
    pub fn find_item(
        &self,
        collection_id: &str,
        book: i64,
        item_number: i64,
    ) -> Option<&TextItem> {
        self.collection_items(collection_id)
            .iter()
            .find(|i| i.book_number == book && i.item_number == item_number)
    }

    /// Case-insensitive substring search over primary text, plus raw
    /// containment over secondary text (no diacritic normalization), across
    /// all collections in declaration order. Unranked, truncated to `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<TextItem> {
        let raw = query.trim();
        if raw.is_empty() || limit == 0 {
            return Vec::new();
        }
        let needle = raw.to_lowercase();

        let mut matches = Vec::new();
        for collection in &self.collections {
            let Some(items) = self.items.get(&collection.id) else {
                continue;
            };
            for item in items {
                if item.primary_text.to_lowercase().contains(&needle)
                    || item.secondary_text.contains(raw)
                {
                    matches.push(item.clone());
                    if matches.len() >= limit {
                        return matches;
                    }
                }
            }
        }
        matches
    }

    /// Uniform random draw over the whole bundled corpus, with the drawn
    /// item's own parents resolved so the triple can never disagree.
    pub fn random_item(&self) -> Option<RandomPick> {
        let all: Vec<&TextItem> = self
            .collections
            .iter()
            .filter_map(|c| self.items.get(&c.id))
            .flatten()
            .collect();
        let item = (*all.choose(&mut rand::thread_rng())?).clone();

        let collection = self.collection(&item.collection_id)?.clone();
        let book = self
            .book(&item.collection_id, item.book_number)
            .cloned()
            .unwrap_or_else(|| Book {
                collection_id: item.collection_id.clone(),
                number: item.book_number,
                title: format!("Book {}", item.book_number),
                item_count: 0,
            });

        Some(RandomPick {
            item,
            collection,
            book,
        })
    }
}

fn reconcile_source(source: &BundledSource, override_doc: Option<&Value>) -> Reconciled {
    match override_doc {
        Some(doc) => reconcile_corpus(&source.spec, doc),
        None => {
            let doc: Value = serde_json::from_str(source.document).unwrap_or_else(|e| {
                log::error!("Embedded corpus {} failed to parse: {}", source.spec.slug, e);
                Value::Null
            });
            reconcile_corpus(&source.spec, &doc)
        }
    }
}
