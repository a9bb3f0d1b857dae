use super::error::{ErrorHandler, StoreError};
use super::retry::RetryPolicy;
use super::state::StoreState;
use super::view_list::ViewList;
use crate::api::{ApiClient, PageData, PagedCollection};
use crate::model::{BusPointType, Carrier, HalResource};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

pub type BusPointTypeStore = CollectionStore<BusPointType>;
pub type CarrierStore = CollectionStore<Carrier>;

/// Mirrors one plain HAL collection whose records need no further lookups.
///
/// Behaves like [`BusPointStore`](super::BusPointStore) minus type resolution:
/// fetches upsert into the sorted list, create appends, edit replaces the
/// record with the same id and delete drops it.
pub struct CollectionStore<R: HalResource> {
    api: ApiClient,
    url: String,
    state: StoreState<R>,
}

impl<R: HalResource> CollectionStore<R> {
    #[must_use]
    pub fn new(api: ApiClient, errors: Arc<dyn ErrorHandler>, retry: RetryPolicy) -> Self {
        let url = api.endpoint_url(R::PATH);
        Self {
            api,
            url,
            state: StoreState::new(errors, retry),
        }
    }

    /// Creates a store and runs the initial fetch; a failure leaves it empty.
    pub async fn connect(
        api: ApiClient,
        errors: Arc<dyn ErrorHandler>,
        retry: RetryPolicy,
    ) -> Self {
        let store = Self::new(api, errors, retry);
        if let Err(e) = store.fetch().await {
            debug!(kind = R::KIND, "Initial fetch failed: {}", e);
        }
        store
    }

    /// # Errors
    /// Returns the terminal error after retries are exhausted. The list is left
    /// as it was.
    #[instrument(skip(self), fields(kind = R::KIND))]
    pub async fn fetch(&self) -> Result<(), StoreError> {
        self.fetch_from(&self.url).await
    }

    /// Fetches page `number` (0-based).
    ///
    /// # Errors
    /// Same as [`fetch`](Self::fetch).
    #[instrument(skip(self), fields(kind = R::KIND))]
    pub async fn fetch_page(&self, number: u64) -> Result<(), StoreError> {
        let url = format!("{}?page={number}", self.url);
        self.fetch_from(&url).await
    }

    async fn fetch_from(&self, url: &str) -> Result<(), StoreError> {
        let collection: PagedCollection<R::Dto> = self
            .state
            .run("fetch collection", || self.api.get_json(url))
            .await?;

        let (dtos, page) = collection.into_parts(R::REL);
        let mut fetched: Vec<R> = dtos.into_iter().map(R::from_dto).collect();
        fetched.sort_by_key(R::id);

        let count = fetched.len();
        self.state.merge(fetched, page);

        info!(
            kind = R::KIND,
            fetched = count,
            total = self.state.items().len(),
            "Collection fetched"
        );

        Ok(())
    }

    /// # Errors
    /// Returns the terminal error after retries are exhausted.
    #[instrument(skip(self, request), fields(kind = R::KIND))]
    pub async fn create(&self, request: &R::Request) -> Result<R, StoreError> {
        let dto: R::Dto = self
            .state
            .run("create", || self.api.post_json(&self.url, request))
            .await?;

        let item = R::from_dto(dto);
        self.state.append(item.clone());

        info!(kind = R::KIND, id = item.id(), "Created");

        Ok(item)
    }

    /// Updates the record behind `item_link`. Only a record already in the list is
    /// replaced.
    ///
    /// # Errors
    /// Returns the terminal error after retries are exhausted.
    #[instrument(skip(self, request), fields(kind = R::KIND))]
    pub async fn edit(&self, request: &R::Request, item_link: &str) -> Result<R, StoreError> {
        let dto: R::Dto = self
            .state
            .run("edit", || self.api.patch_json(item_link, request))
            .await?;

        let item = R::from_dto(dto);
        if self.state.replace(item.clone()) {
            info!(kind = R::KIND, id = item.id(), "Updated");
        } else {
            debug!(kind = R::KIND, id = item.id(), "Updated record is not in the local list");
        }

        Ok(item)
    }

    /// # Errors
    /// Returns [`StoreError::MissingLink`] if `item` has no link, otherwise the
    /// terminal error after retries are exhausted.
    #[instrument(skip(self, item), fields(kind = R::KIND, id = item.id()))]
    pub async fn delete_one(&self, item: &R) -> Result<(), StoreError> {
        let Some(link) = item.href() else {
            return Err(self.state.fail(StoreError::MissingLink(R::KIND)));
        };

        self.state.run("delete", || self.api.delete(link)).await?;

        if self.state.remove(item.id()).is_some() {
            info!("Deleted");
        }

        Ok(())
    }

    #[must_use]
    pub fn get_one(&self, id: impl Into<Option<i64>>) -> Option<R> {
        self.state.get_one(id.into())
    }

    #[must_use]
    pub fn items(&self) -> Vec<R> {
        self.state.items()
    }

    #[must_use]
    pub fn page(&self) -> PageData {
        self.state.page()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    #[must_use]
    pub fn subscribe_items(&self) -> watch::Receiver<ViewList<R>> {
        self.state.subscribe_items()
    }

    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.state.subscribe_loading()
    }

    #[must_use]
    pub fn subscribe_page(&self) -> watch::Receiver<PageData> {
        self.state.subscribe_page()
    }
}
