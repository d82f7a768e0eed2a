// src/remote.rs

//! Remote content source.
//!
//! [`RemoteSource`] is the seam the router talks through; [`RemoteClient`]
//! is the reqwest-backed implementation against the content API. The
//! availability probe lives here too: a minimal collections request under a
//! hard timeout, with the outcome cached for a short TTL so routing does not
//! double every request's latency.
//!
//! Everything returned from this module is already coerced into the
//! canonical record model; callers never see the API's raw shapes.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Book, Collection, Page, RemoteConfig, TextItem};
use crate::reconcile::{book_from_value, collection_from_value, item_from_value, unwrap_items};

/// A remote provider of canonical records.
///
/// The router treats implementations as advisory: any error from a data
/// call is recovered by falling back to the local corpus store.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Bounded-time reachability check. Never errors: any failure or
    /// timeout resolves to `false`.
    async fn probe(&self) -> bool;

    /// List all collections.
    async fn collections(&self) -> Result<Vec<Collection>>;

    /// Fetch one collection by slug.
    async fn collection(&self, collection_id: &str) -> Result<Option<Collection>>;

    /// List a collection's books.
    async fn books(&self, collection_id: &str) -> Result<Vec<Book>>;

    /// Fetch one book by number.
    async fn book(&self, collection_id: &str, number: i64) -> Result<Option<Book>>;

    /// One page of a book's (or whole collection's) items.
    async fn items(
        &self,
        collection_id: &str,
        book: Option<i64>,
        page: usize,
        page_size: usize,
    ) -> Result<Page<TextItem>>;

    /// Substring search across the remote corpus.
    async fn search(&self, query: &str, page: usize, page_size: usize)
    -> Result<Page<TextItem>>;
}

/// HTTP client for the content API.
pub struct RemoteClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
    probe_ttl: Duration,
    probe_cache: Mutex<Option<(Instant, bool)>>,
}

impl RemoteClient {
    /// Build a client from the remote configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        let client = Client::builder()
            .user_agent(concat!("sanad/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            probe_ttl: Duration::from_secs(config.probe_ttl_secs),
            probe_cache: Mutex::new(None),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::config("remote.base_url cannot be a base"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Issue a GET and parse the body as JSON, mapping non-2xx statuses to
    /// a remote error.
    async fn get_json(&self, url: Url, query: &[(&str, String)]) -> Result<Value> {
        let context = url.path().to_string();
        let mut request = self.client.get(url).query(query);
        if !self.api_key.is_empty() {
            request = request.header("x-api-key", &self.api_key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::remote(
                context,
                format!("unexpected status {}", response.status()),
            ));
        }
        Ok(response.json::<Value>().await?)
    }

    fn page_from_envelope(
        &self,
        body: &Value,
        collection_id: &str,
        page: usize,
        page_size: usize,
    ) -> Page<TextItem> {
        let envelope = unwrap_items(body);
        let items: Vec<TextItem> = envelope
            .entries
            .iter()
            .filter_map(|entry| item_from_value(collection_id, entry))
            .collect();
        let total = envelope.total.unwrap_or(items.len());
        Page {
            total,
            page: envelope.page.unwrap_or(page),
            total_pages: envelope
                .total_pages
                .unwrap_or_else(|| total.div_ceil(page_size.max(1))),
            items,
        }
    }
}

#[async_trait]
impl RemoteSource for RemoteClient {
    async fn probe(&self) -> bool {
        if self.probe_ttl > Duration::ZERO {
            if let Ok(cache) = self.probe_cache.lock() {
                if let Some((at, reachable)) = *cache {
                    if at.elapsed() < self.probe_ttl {
                        return reachable;
                    }
                }
            }
        }

        let attempt = async {
            let url = self.endpoint(&["collections"])?;
            self.get_json(url, &[("limit", "1".to_string())]).await
        };
        let reachable = matches!(
            tokio::time::timeout(self.timeout, attempt).await,
            Ok(Ok(_))
        );

        if !reachable {
            log::warn!("Remote source unreachable, probe failed");
        }
        if self.probe_ttl > Duration::ZERO {
            if let Ok(mut cache) = self.probe_cache.lock() {
                *cache = Some((Instant::now(), reachable));
            }
        }
        reachable
    }

    async fn collections(&self) -> Result<Vec<Collection>> {
        let body = self.get_json(self.endpoint(&["collections"])?, &[]).await?;
        Ok(unwrap_items(&body)
            .entries
            .iter()
            .filter_map(collection_from_value)
            .collect())
    }

    async fn collection(&self, collection_id: &str) -> Result<Option<Collection>> {
        let body = self
            .get_json(self.endpoint(&["collections", collection_id])?, &[])
            .await?;
        Ok(collection_from_value(&body))
    }

    async fn books(&self, collection_id: &str) -> Result<Vec<Book>> {
        let body = self
            .get_json(self.endpoint(&["collections", collection_id, "books"])?, &[])
            .await?;
        Ok(unwrap_items(&body)
            .entries
            .iter()
            .filter_map(|entry| book_from_value(collection_id, entry))
            .collect())
    }

    async fn book(&self, collection_id: &str, number: i64) -> Result<Option<Book>> {
        let body = self
            .get_json(
                self.endpoint(&["collections", collection_id, "books", &number.to_string()])?,
                &[],
            )
            .await?;
        Ok(book_from_value(collection_id, &body))
    }

    async fn items(
        &self,
        collection_id: &str,
        book: Option<i64>,
        page: usize,
        page_size: usize,
    ) -> Result<Page<TextItem>> {
        let url = match book {
            Some(number) => self.endpoint(&[
                "collections",
                collection_id,
                "books",
                &number.to_string(),
                "items",
            ])?,
            None => self.endpoint(&["collections", collection_id, "items"])?,
        };
        let body = self
            .get_json(
                url,
                &[
                    ("page", page.to_string()),
                    ("limit", page_size.to_string()),
                ],
            )
            .await?;
        Ok(self.page_from_envelope(&body, collection_id, page, page_size))
    }

    async fn search(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Page<TextItem>> {
        let body = self
            .get_json(
                self.endpoint(&["search"])?,
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("limit", page_size.to_string()),
                ],
            )
            .await?;
        // Search hits arrive with their own collection slug; fall back to
        // an empty slug only if the API omits it.
        let envelope = unwrap_items(&body);
        let items: Vec<TextItem> = envelope
            .entries
            .iter()
            .filter_map(|entry| {
                let slug = crate::reconcile::collection_of(entry).unwrap_or_default();
                item_from_value(&slug, entry)
            })
            .collect();
        let total = envelope.total.unwrap_or(items.len());
        Ok(Page {
            total,
            page: envelope.page.unwrap_or(page),
            total_pages: envelope
                .total_pages
                .unwrap_or_else(|| total.div_ceil(page_size.max(1))),
            items,
        })
    }
}
