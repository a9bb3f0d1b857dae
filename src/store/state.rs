use super::error::{ErrorHandler, StoreError};
use super::observable::{LoadingGuard, Observable};
use super::retry::{with_retry, RetryPolicy};
use super::view_list::ViewList;
use crate::api::{ApiError, PageData};
use crate::model::Identified;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable state of one mirrored collection plus the failure policy that
/// guards every remote call made on its behalf.
pub struct StoreState<T> {
    loading: Observable<bool>,
    items: Observable<ViewList<T>>,
    page: Observable<PageData>,
    retry: RetryPolicy,
    errors: Arc<dyn ErrorHandler>,
}

impl<T: Identified + Clone> StoreState<T> {
    #[must_use]
    pub fn new(errors: Arc<dyn ErrorHandler>, retry: RetryPolicy) -> Self {
        Self {
            loading: Observable::new(false),
            items: Observable::new(ViewList::new()),
            page: Observable::new(PageData::default()),
            retry,
            errors,
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Snapshot of the list, sorted by id.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.items.with(|list| list.as_slice().to_vec())
    }

    #[must_use]
    pub fn page(&self) -> PageData {
        self.page.get()
    }

    /// Looks up a record in the local list. `None` ids never match.
    #[must_use]
    pub fn get_one(&self, id: Option<i64>) -> Option<T> {
        let id = id?;
        self.items.with(|list| list.find(id).cloned())
    }

    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    #[must_use]
    pub fn subscribe_items(&self) -> watch::Receiver<ViewList<T>> {
        self.items.subscribe()
    }

    #[must_use]
    pub fn subscribe_page(&self) -> watch::Receiver<PageData> {
        self.page.subscribe()
    }

    /// Runs a remote call under the retry policy with the loading flag raised.
    ///
    /// A terminal failure lowers the flag first, then goes to the error handler.
    pub(crate) async fn run<R, F, Fut>(&self, name: &str, operation: F) -> Result<R, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let loading = LoadingGuard::new(&self.loading);
        let result = with_retry(&self.retry, name, operation).await;
        drop(loading);

        result.map_err(|e| self.fail(StoreError::from(e)))
    }

    /// Forwards a terminal failure to the error handler and hands it back.
    pub(crate) fn fail(&self, failure: StoreError) -> StoreError {
        self.errors.handle(&failure);
        failure
    }

    /// Upserts fetched records and replaces the page metadata when present.
    pub(crate) fn merge(&self, fetched: Vec<T>, page: Option<PageData>) {
        self.items.modify(|list| list.extend(fetched));
        if let Some(page) = page {
            self.page.set(page);
        }
    }

    pub(crate) fn append(&self, item: T) {
        self.items.modify(|list| list.append(item));
    }

    pub(crate) fn replace(&self, item: T) -> bool {
        self.items.modify_if(|list| list.replace(item))
    }

    pub(crate) fn remove(&self, id: i64) -> Option<T> {
        let mut removed = None;
        self.items.modify_if(|list| {
            removed = list.remove(id);
            removed.is_some()
        });
        removed
    }
}
