//! Bundled corpus registry.
//!
//! Each source ships as a JSON document embedded at compile time. The
//! documents were authored independently and do not share a record schema;
//! the reconciler's coalescing accessors absorb the differences.

use crate::reconcile::SourceSpec;

/// One registered bundled source: its description plus the embedded corpus
/// document.
#[derive(Debug, Clone, Copy)]
pub struct BundledSource {
    pub spec: SourceSpec,
    pub document: &'static str,
}

/// All bundled sources, in declaration order. This order is the stable
/// order `CorpusStore::collections` guarantees, and the first entry is the
/// default collection used by the forgiving `books` fallback.
pub const SOURCES: &[BundledSource] = &[
    BundledSource {
        spec: SourceSpec {
            slug: "bukhari",
            display_name: "Sahih al-Bukhari",
            author: "Imam al-Bukhari",
            default_grade: "Sahih",
        },
        document: include_str!("../../data/bukhari.json"),
    },
    BundledSource {
        spec: SourceSpec {
            slug: "muslim",
            display_name: "Sahih Muslim",
            author: "Imam Muslim",
            default_grade: "Sahih",
        },
        document: include_str!("../../data/muslim.json"),
    },
    BundledSource {
        spec: SourceSpec {
            slug: "abudawud",
            display_name: "Sunan Abu Dawood",
            author: "Abu Dawood",
            default_grade: "Sahih",
        },
        document: include_str!("../../data/abudawud.json"),
    },
    BundledSource {
        spec: SourceSpec {
            slug: "tirmidhi",
            display_name: "Jami' at-Tirmidhi",
            author: "Imam at-Tirmidhi",
            default_grade: "Hasan",
        },
        document: include_str!("../../data/tirmidhi.json"),
    },
    BundledSource {
        spec: SourceSpec {
            slug: "nasai",
            display_name: "Sunan an-Nasa'i",
            author: "Imam an-Nasa'i",
            default_grade: "Sahih",
        },
        document: include_str!("../../data/nasai.json"),
    },
    BundledSource {
        spec: SourceSpec {
            slug: "ibnmajah",
            display_name: "Sunan Ibn Majah",
            author: "Ibn Majah",
            default_grade: "Sahih",
        },
        document: include_str!("../../data/ibnmajah.json"),
    },
];
