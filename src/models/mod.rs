// src/models/mod.rs

//! Domain models for the library.
//!
//! All canonical record shapes live here, together with the application
//! configuration. Records are read-only projections: they are produced by
//! the reconcilers and never mutated afterwards.

mod collection;
mod config;
mod item;
mod page;

// Re-export all public types
pub use collection::{Book, Collection, collection_display_name};
pub use config::{Config, CorpusConfig, ListingConfig, RandomConfig, RemoteConfig};
pub use item::{RandomPick, TextItem, parse_composite_id};
pub use page::Page;
