// src/router.rs

//! Source routing.
//!
//! [`SourceRouter`] fronts every read: if a remote source is configured and
//! its probe reports reachable, the remote answer is preferred; any remote
//! error is logged and recovered by serving the same operation from the
//! local corpus store. Callers therefore always get an answer, never a
//! transport error.

use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::error::Result;
use crate::models::{Book, Collection, Config, Page, RandomConfig, RandomPick, TextItem};
use crate::remote::{RemoteClient, RemoteSource};
use crate::store::CorpusStore;

/// Page size used when hunting for a single record inside a remote book.
/// Remote books are capped well below this in practice.
const DEEP_LOOKUP_LIMIT: usize = 100;

/// Routes each read to the remote source or the local corpus store.
pub struct SourceRouter {
    remote: Option<Arc<dyn RemoteSource>>,
    store: CorpusStore,
    random: RandomConfig,
}

impl SourceRouter {
    pub fn new(
        remote: Option<Arc<dyn RemoteSource>>,
        store: CorpusStore,
        random: RandomConfig,
    ) -> Self {
        Self {
            remote,
            store,
            random,
        }
    }

    /// Build a router from configuration: load the corpus store (with any
    /// override directory) and attach a remote client unless disabled.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = CorpusStore::load(config.corpus.dir.as_deref()).await;
        let remote: Option<Arc<dyn RemoteSource>> = if config.remote.enabled {
            Some(Arc::new(RemoteClient::new(&config.remote)?))
        } else {
            log::info!("Remote source disabled, serving bundled corpus only");
            None
        };
        Ok(Self::new(remote, store, config.random.clone()))
    }

    /// A router with no remote tier at all.
    pub fn offline(store: CorpusStore, random: RandomConfig) -> Self {
        Self::new(None, store, random)
    }

    /// The remote source, if one is configured and currently reachable.
    async fn remote_ready(&self) -> Option<Arc<dyn RemoteSource>> {
        let remote = self.remote.as_ref()?;
        if remote.probe().await {
            Some(Arc::clone(remote))
        } else {
            log::debug!("Remote source unreachable, serving local corpus");
            None
        }
    }

    /// All collections. A reachable remote's list is authoritative, even
    /// when empty.
    pub async fn collections(&self) -> Vec<Collection> {
        if let Some(remote) = self.remote_ready().await {
            match remote.collections().await {
                Ok(collections) => return collections,
                Err(e) => log::warn!("Remote collections failed: {e}. Falling back."),
            }
        }
        self.store.collections().to_vec()
    }

    /// One collection by slug. A remote miss falls through to the local
    /// corpus, so bundled collections resolve even against a live remote
    /// that does not carry them.
    pub async fn collection(&self, collection_id: &str) -> Option<Collection> {
        if let Some(remote) = self.remote_ready().await {
            match remote.collection(collection_id).await {
                Ok(Some(collection)) => return Some(collection),
                Ok(None) => {}
                Err(e) => log::warn!("Remote collection lookup failed: {e}. Falling back."),
            }
        }
        self.store.collection(collection_id).cloned()
    }

    /// A collection's books.
    pub async fn books(&self, collection_id: &str) -> Vec<Book> {
        if let Some(remote) = self.remote_ready().await {
            match remote.books(collection_id).await {
                Ok(books) => return books,
                Err(e) => log::warn!("Remote books failed: {e}. Falling back."),
            }
        }
        self.store.books(collection_id).to_vec()
    }

    /// One book by number, remote miss falling through like [`collection`].
    ///
    /// [`collection`]: Self::collection
    pub async fn book(&self, collection_id: &str, number: i64) -> Option<Book> {
        if let Some(remote) = self.remote_ready().await {
            match remote.book(collection_id, number).await {
                Ok(Some(book)) => return Some(book),
                Ok(None) => {}
                Err(e) => log::warn!("Remote book lookup failed: {e}. Falling back."),
            }
        }
        self.store.book(collection_id, number).cloned()
    }

    /// One page of items, optionally filtered by book.
    pub async fn items(
        &self,
        collection_id: &str,
        book: Option<i64>,
        page: usize,
        page_size: usize,
    ) -> Page<TextItem> {
        if let Some(remote) = self.remote_ready().await {
            match remote.items(collection_id, book, page, page_size).await {
                Ok(items) => return items,
                Err(e) => log::warn!("Remote items failed: {e}. Falling back."),
            }
        }
        self.store.items(collection_id, book, page, page_size)
    }

    /// One item by composite identity.
    ///
    /// The remote API has no point-lookup endpoint, so the remote path
    /// fetches the book's first item page and scans it for the number.
    pub async fn item(
        &self,
        collection_id: &str,
        book: i64,
        item_number: i64,
    ) -> Option<TextItem> {
        if let Some(remote) = self.remote_ready().await {
            match remote
                .items(collection_id, Some(book), 1, DEEP_LOOKUP_LIMIT)
                .await
            {
                Ok(page) => {
                    if let Some(item) = page
                        .items
                        .into_iter()
                        .find(|i| i.item_number == item_number)
                    {
                        return Some(item);
                    }
                }
                Err(e) => log::warn!("Remote item lookup failed: {e}. Falling back."),
            }
        }
        self.store
            .find_item(collection_id, book, item_number)
            .cloned()
    }

    /// Substring search. The local fallback paginates the store's match
    /// list the same way the remote reports its own pages.
    pub async fn search(&self, query: &str, page: usize, page_size: usize) -> Page<TextItem> {
        if let Some(remote) = self.remote_ready().await {
            match remote.search(query, page, page_size).await {
                Ok(results) => return results,
                Err(e) => log::warn!("Remote search failed: {e}. Falling back."),
            }
        }
        let matches = self.store.search(query, usize::MAX);
        Page::slice(&matches, page, page_size)
    }

    /// Compose a uniformly-drawn record with its resolved parents.
    ///
    /// The remote composition descends collection -> book -> item page with
    /// a uniform pick at each level, preferring the configured major
    /// collections when the remote carries any of them. Any empty level, or
    /// a drawn item whose book number disagrees with the drawn book, aborts
    /// the remote attempt and the draw comes from the local corpus instead,
    /// so the returned triple is always self-consistent.
    pub async fn random_pick(&self) -> Option<RandomPick> {
        if let Some(remote) = self.remote_ready().await {
            match self.compose_remote_pick(remote.as_ref()).await {
                Ok(Some(pick)) => return Some(pick),
                Ok(None) => log::debug!("Remote random draw came up empty, using local corpus"),
                Err(e) => log::warn!("Remote random draw failed: {e}. Falling back."),
            }
        }
        self.store.random_item()
    }

    async fn compose_remote_pick(&self, remote: &dyn RemoteSource) -> Result<Option<RandomPick>> {
        let collections = remote.collections().await?;
        let majors: Vec<&Collection> = collections
            .iter()
            .filter(|c| {
                self.random
                    .major_collections
                    .iter()
                    .any(|m| m.eq_ignore_ascii_case(&c.id))
            })
            .collect();
        let pool: Vec<&Collection> = if majors.is_empty() {
            collections.iter().collect()
        } else {
            majors
        };
        let Some(collection) = pool.choose(&mut rand::thread_rng()).map(|c| (*c).clone()) else {
            return Ok(None);
        };

        let books = remote.books(&collection.id).await?;
        let Some(book) = books.choose(&mut rand::thread_rng()).cloned() else {
            return Ok(None);
        };

        let page = remote
            .items(&collection.id, Some(book.number), 1, self.random.sample_limit)
            .await?;
        let Some(item) = page.items.choose(&mut rand::thread_rng()).cloned() else {
            return Ok(None);
        };
        if item.book_number != book.number {
            return Ok(None);
        }

        Ok(Some(RandomPick {
            item,
            collection,
            book,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn local_router() -> SourceRouter {
        SourceRouter::offline(CorpusStore::bundled(), RandomConfig::default())
    }

    fn router_with(remote: impl RemoteSource + 'static) -> SourceRouter {
        SourceRouter::new(
            Some(Arc::new(remote)),
            CorpusStore::bundled(),
            RandomConfig::default(),
        )
    }

    fn remote_item(collection: &str, book: i64, number: i64) -> TextItem {
        TextItem {
            collection_id: collection.to_string(),
            book_number: book,
            item_number: number,
            primary_text: format!("remote text {number}"),
            secondary_text: String::new(),
            grade: "Sahih".to_string(),
            attribution: None,
            chapter_id: None,
        }
    }

    fn remote_collection(id: &str) -> Collection {
        Collection {
            id: id.to_string(),
            display_name: format!("Remote {id}"),
            author_name: None,
            total_books: 1,
            total_items: 3,
        }
    }

    fn remote_book(collection: &str, number: i64) -> Book {
        Book {
            collection_id: collection.to_string(),
            number,
            title: format!("Remote Book {number}"),
            item_count: 3,
        }
    }

    /// Always reachable, always answers with one synthetic collection.
    struct HealthyRemote {
        probes: AtomicUsize,
    }

    impl HealthyRemote {
        fn new() -> Self {
            Self {
                probes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RemoteSource for HealthyRemote {
        async fn probe(&self) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            true
        }
        async fn collections(&self) -> Result<Vec<Collection>> {
            Ok(vec![remote_collection("bukhari")])
        }
        async fn collection(&self, collection_id: &str) -> Result<Option<Collection>> {
            Ok((collection_id == "bukhari").then(|| remote_collection("bukhari")))
        }
        async fn books(&self, collection_id: &str) -> Result<Vec<Book>> {
            Ok(vec![remote_book(collection_id, 1)])
        }
        async fn book(&self, collection_id: &str, number: i64) -> Result<Option<Book>> {
            Ok((number == 1).then(|| remote_book(collection_id, 1)))
        }
        async fn items(
            &self,
            collection_id: &str,
            book: Option<i64>,
            page: usize,
            _page_size: usize,
        ) -> Result<Page<TextItem>> {
            let book = book.unwrap_or(1);
            let items: Vec<TextItem> = (1..=3)
                .map(|n| remote_item(collection_id, book, n))
                .collect();
            Ok(Page {
                total: items.len(),
                page,
                total_pages: 1,
                items,
            })
        }
        async fn search(
            &self,
            _query: &str,
            page: usize,
            _page_size: usize,
        ) -> Result<Page<TextItem>> {
            Ok(Page {
                items: vec![remote_item("bukhari", 1, 1)],
                total: 1,
                page,
                total_pages: 1,
            })
        }
    }

    /// Probe never succeeds.
    struct UnreachableRemote;

    #[async_trait]
    impl RemoteSource for UnreachableRemote {
        async fn probe(&self) -> bool {
            false
        }
        async fn collections(&self) -> Result<Vec<Collection>> {
            panic!("data call after failed probe");
        }
        async fn collection(&self, _: &str) -> Result<Option<Collection>> {
            panic!("data call after failed probe");
        }
        async fn books(&self, _: &str) -> Result<Vec<Book>> {
            panic!("data call after failed probe");
        }
        async fn book(&self, _: &str, _: i64) -> Result<Option<Book>> {
            panic!("data call after failed probe");
        }
        async fn items(&self, _: &str, _: Option<i64>, _: usize, _: usize) -> Result<Page<TextItem>> {
            panic!("data call after failed probe");
        }
        async fn search(&self, _: &str, _: usize, _: usize) -> Result<Page<TextItem>> {
            panic!("data call after failed probe");
        }
    }

    /// Probe succeeds but every data call errors.
    struct FlakyRemote;

    #[async_trait]
    impl RemoteSource for FlakyRemote {
        async fn probe(&self) -> bool {
            true
        }
        async fn collections(&self) -> Result<Vec<Collection>> {
            Err(AppError::remote("collections", "mid-request failure"))
        }
        async fn collection(&self, _: &str) -> Result<Option<Collection>> {
            Err(AppError::remote("collection", "mid-request failure"))
        }
        async fn books(&self, _: &str) -> Result<Vec<Book>> {
            Err(AppError::remote("books", "mid-request failure"))
        }
        async fn book(&self, _: &str, _: i64) -> Result<Option<Book>> {
            Err(AppError::remote("book", "mid-request failure"))
        }
        async fn items(&self, _: &str, _: Option<i64>, _: usize, _: usize) -> Result<Page<TextItem>> {
            Err(AppError::remote("items", "mid-request failure"))
        }
        async fn search(&self, _: &str, _: usize, _: usize) -> Result<Page<TextItem>> {
            Err(AppError::remote("search", "mid-request failure"))
        }
    }

    /// Reachable, but hands back items whose book number disagrees with the
    /// requested book.
    struct InconsistentRemote;

    #[async_trait]
    impl RemoteSource for InconsistentRemote {
        async fn probe(&self) -> bool {
            true
        }
        async fn collections(&self) -> Result<Vec<Collection>> {
            Ok(vec![remote_collection("bukhari")])
        }
        async fn collection(&self, _: &str) -> Result<Option<Collection>> {
            Ok(Some(remote_collection("bukhari")))
        }
        async fn books(&self, collection_id: &str) -> Result<Vec<Book>> {
            Ok(vec![remote_book(collection_id, 1)])
        }
        async fn book(&self, collection_id: &str, number: i64) -> Result<Option<Book>> {
            Ok(Some(remote_book(collection_id, number)))
        }
        async fn items(
            &self,
            collection_id: &str,
            _book: Option<i64>,
            page: usize,
            _page_size: usize,
        ) -> Result<Page<TextItem>> {
            Ok(Page {
                items: vec![remote_item(collection_id, 999, 1)],
                total: 1,
                page,
                total_pages: 1,
            })
        }
        async fn search(&self, _: &str, page: usize, _: usize) -> Result<Page<TextItem>> {
            Ok(Page::empty(page))
        }
    }

    #[tokio::test]
    async fn offline_router_serves_local_corpus() {
        let router = local_router();
        let collections = router.collections().await;
        assert_eq!(collections.len(), CorpusStore::bundled().collections().len());
        assert!(router.collection("bukhari").await.is_some());
    }

    #[tokio::test]
    async fn failed_probe_falls_back_without_data_calls() {
        let router = router_with(UnreachableRemote);
        let local = local_router();
        assert_eq!(router.collections().await, local.collections().await);
        assert_eq!(
            router.items("bukhari", Some(1), 1, 5).await,
            local.items("bukhari", Some(1), 1, 5).await
        );
        assert!(router.item("bukhari", 1, 1).await.is_some());
    }

    #[tokio::test]
    async fn probe_runs_once_per_operation() {
        let counted = Arc::new(HealthyRemote::new());
        let router = SourceRouter::new(
            Some(Arc::clone(&counted) as Arc<dyn RemoteSource>),
            CorpusStore::bundled(),
            RandomConfig::default(),
        );
        router.collections().await;
        router.books("bukhari").await;
        router.item("bukhari", 1, 2).await;
        assert_eq!(counted.probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn erroring_remote_falls_back_to_local() {
        let router = router_with(FlakyRemote);
        let local = local_router();
        assert_eq!(router.collections().await, local.collections().await);
        assert_eq!(router.books("muslim").await, local.books("muslim").await);
        assert_eq!(
            router.book("muslim", 1).await,
            local.book("muslim", 1).await
        );
        let pick = router.random_pick().await.unwrap();
        assert_eq!(pick.item.collection_id, pick.collection.id);
    }

    #[tokio::test]
    async fn healthy_remote_is_preferred() {
        let router = router_with(HealthyRemote::new());
        let collections = router.collections().await;
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].display_name, "Remote bukhari");

        let item = router.item("bukhari", 1, 2).await.unwrap();
        assert_eq!(item.primary_text, "remote text 2");
    }

    #[tokio::test]
    async fn remote_point_miss_falls_through_to_local() {
        // The healthy stub only serves item numbers 1..=3; number 5 exists
        // in the bundled bukhari corpus, book 1.
        let router = router_with(HealthyRemote::new());
        let item = router.item("bukhari", 1, 5).await.unwrap();
        assert_eq!(item.collection_id, "bukhari");
        assert_eq!(item.item_number, 5);
        assert!(router.collection("tirmidhi").await.is_some());
    }

    #[tokio::test]
    async fn local_search_fallback_paginates() {
        let router = local_router();
        let page = router.search("faith", 1, 2).await;
        assert!(page.items.len() <= 2);
        assert!(page.total >= page.items.len());
        assert!(router.search("   ", 1, 10).await.items.is_empty());
    }

    #[tokio::test]
    async fn random_pick_triple_is_consistent() {
        let router = router_with(HealthyRemote::new());
        for _ in 0..50 {
            let pick = router.random_pick().await.unwrap();
            assert_eq!(pick.item.collection_id, pick.collection.id);
            assert_eq!(pick.item.book_number, pick.book.number);
        }
    }

    #[tokio::test]
    async fn inconsistent_remote_draw_falls_back_locally() {
        let router = router_with(InconsistentRemote);
        for _ in 0..20 {
            let pick = router.random_pick().await.unwrap();
            // The stub's item claims book 999 while its only book is 1, so
            // every draw must come from the local corpus instead.
            assert_eq!(pick.item.book_number, pick.book.number);
        }
    }
}
