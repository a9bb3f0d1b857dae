//! Store for bus points with their types resolved.
//!
//! A fetch reads one page of `/busPoints` and then resolves the type of every
//! item by following its `busPointType` link. The lookups run concurrently and
//! complete in any order; the list is sorted afterwards. A lookup that fails
//! keeps its item with the unresolved placeholder type. Only the page request
//! itself can fail a fetch attempt, and the whole fetch-and-resolve sequence is
//! what gets retried.

use super::error::{ErrorHandler, StoreError};
use super::retry::RetryPolicy;
use super::state::StoreState;
use super::view_list::ViewList;
use crate::api::{ApiClient, ApiError, BusPointDto, BusPointRequest, PageData, PagedCollection};
use crate::model::{BusPoint, BusPointType, HalResource};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

pub const BUS_POINTS_PATH: &str = "/busPoints";
pub const BUS_POINTS_REL: &str = "busPoints";

pub struct BusPointStore {
    api: ApiClient,
    url: String,
    state: StoreState<BusPoint>,
}

impl BusPointStore {
    /// Creates an empty store. Nothing is fetched until [`fetch`](Self::fetch).
    #[must_use]
    pub fn new(api: ApiClient, errors: Arc<dyn ErrorHandler>, retry: RetryPolicy) -> Self {
        let url = api.endpoint_url(BUS_POINTS_PATH);
        Self {
            api,
            url,
            state: StoreState::new(errors, retry),
        }
    }

    /// Creates a store and runs the initial fetch.
    ///
    /// A failed initial fetch has already been reported to the error handler, so
    /// the store is returned either way, possibly empty.
    pub async fn connect(
        api: ApiClient,
        errors: Arc<dyn ErrorHandler>,
        retry: RetryPolicy,
    ) -> Self {
        let store = Self::new(api, errors, retry);
        if let Err(e) = store.fetch().await {
            debug!("Initial bus point fetch failed: {}", e);
        }
        store
    }

    /// Fetches the first page of bus points and merges it into the list.
    ///
    /// # Errors
    /// Returns the terminal error after retries are exhausted. The list is left
    /// as it was.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<(), StoreError> {
        self.fetch_from(&self.url).await
    }

    /// Fetches page `number` (0-based) and merges it into the list.
    ///
    /// # Errors
    /// Same as [`fetch`](Self::fetch).
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, number: u64) -> Result<(), StoreError> {
        let url = format!("{}?page={number}", self.url);
        self.fetch_from(&url).await
    }

    async fn fetch_from(&self, url: &str) -> Result<(), StoreError> {
        let (bus_points, page) = self
            .state
            .run("fetch bus points", || self.fetch_and_resolve(url))
            .await?;

        let fetched = bus_points.len();
        self.state.merge(bus_points, page);

        info!(fetched, total = self.state.items().len(), "Bus points fetched");

        Ok(())
    }

    async fn fetch_and_resolve(
        &self,
        url: &str,
    ) -> Result<(Vec<BusPoint>, Option<PageData>), ApiError> {
        let collection: PagedCollection<BusPointDto> = self.api.get_json(url).await?;
        let (dtos, page) = collection.into_parts(BUS_POINTS_REL);

        let lookups = dtos
            .into_iter()
            .map(BusPoint::from_dto)
            .map(|bus_point| self.resolve_type(bus_point));

        let mut resolved = join_all(lookups).await;
        resolved.sort_by_key(|bus_point| bus_point.id);

        Ok((resolved, page))
    }

    /// Replaces the placeholder type with the one behind its link. Any failure
    /// keeps the placeholder.
    async fn resolve_type(&self, bus_point: BusPoint) -> BusPoint {
        let Some(href) = bus_point.bus_point_type.href.clone() else {
            warn!(id = bus_point.id, "Bus point has no type link");
            return bus_point;
        };

        match self.api.get_json(&href).await {
            Ok(dto) => bus_point.with_type(BusPointType::from_dto(dto)),
            Err(e) => {
                warn!(id = bus_point.id, url = %href, "Failed to resolve bus point type: {}", e);
                bus_point
            }
        }
    }

    /// Creates a bus point and adds it to the list with `bus_point_type`
    /// attached as given.
    ///
    /// # Errors
    /// Returns the terminal error after retries are exhausted. The list is left
    /// as it was.
    #[instrument(skip(self, request, bus_point_type), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: &BusPointRequest,
        bus_point_type: &BusPointType,
    ) -> Result<BusPoint, StoreError> {
        let dto: BusPointDto = self
            .state
            .run("create bus point", || self.api.post_json(&self.url, request))
            .await?;

        let bus_point = BusPoint::from_dto(dto).with_type(bus_point_type.clone());
        self.state.append(bus_point.clone());

        info!(id = bus_point.id, "Bus point created");

        Ok(bus_point)
    }

    /// Updates the bus point behind `item_link` and replaces the local record with the
    /// same id. If there is no such local record the list is left untouched.
    ///
    /// # Errors
    /// Returns the terminal error after retries are exhausted.
    #[instrument(skip(self, request, bus_point_type), fields(name = %request.name))]
    pub async fn edit(
        &self,
        request: &BusPointRequest,
        item_link: &str,
        bus_point_type: &BusPointType,
    ) -> Result<BusPoint, StoreError> {
        let dto: BusPointDto = self
            .state
            .run("edit bus point", || self.api.patch_json(item_link, request))
            .await?;

        let bus_point = BusPoint::from_dto(dto).with_type(bus_point_type.clone());
        if self.state.replace(bus_point.clone()) {
            info!(id = bus_point.id, "Bus point updated");
        } else {
            debug!(id = bus_point.id, "Updated bus point is not in the local list");
        }

        Ok(bus_point)
    }

    /// Deletes `bus_point` through its own link and drops it from the list.
    ///
    /// # Errors
    /// Returns [`StoreError::MissingLink`] if the record has no link, otherwise
    /// the terminal error after retries are exhausted.
    #[instrument(skip(self, bus_point), fields(id = bus_point.id))]
    pub async fn delete_one(&self, bus_point: &BusPoint) -> Result<(), StoreError> {
        let Some(link) = bus_point.href.as_deref() else {
            return Err(self.state.fail(StoreError::MissingLink("bus point")));
        };

        self.state
            .run("delete bus point", || self.api.delete(link))
            .await?;

        if self.state.remove(bus_point.id).is_some() {
            info!("Bus point deleted");
        } else {
            debug!("Deleted bus point is not in the local list");
        }

        Ok(())
    }

    /// Looks up a bus point in the local list without touching the network.
    #[must_use]
    pub fn get_one(&self, id: impl Into<Option<i64>>) -> Option<BusPoint> {
        self.state.get_one(id.into())
    }

    #[must_use]
    pub fn items(&self) -> Vec<BusPoint> {
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
    pub fn subscribe_items(&self) -> watch::Receiver<ViewList<BusPoint>> {
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

impl BusPointRequest {
    /// Request body referencing `bus_point_type` by its link.
    ///
    /// An unresolved type only carries the bus point's association link, which
    /// is not a type's own link, so the field is left out and the server keeps
    /// the current association.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        bus_point_type: &BusPointType,
    ) -> Self {
        let bus_point_type = if bus_point_type.is_resolved() {
            bus_point_type.href().map(ToString::to_string)
        } else {
            None
        };

        Self {
            name: name.into(),
            address: address.into(),
            bus_point_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_references_resolved_type() {
        let stop = BusPointType {
            id: 1,
            name: "Stop".to_string(),
            href: Some("http://api/busPointTypes/1".to_string()),
        };
        let request = BusPointRequest::new("Harbour", "Quay 1", &stop);
        assert_eq!(
            request.bus_point_type.as_deref(),
            Some("http://api/busPointTypes/1")
        );
    }

    #[test]
    fn request_omits_unresolved_type() {
        let placeholder =
            BusPointType::unresolved(Some("http://api/busPoints/5/busPointType".to_string()));
        let request = BusPointRequest::new("Harbour", "Quay 1", &placeholder);
        assert_eq!(request.name, "Harbour");
        assert!(request.bus_point_type.is_none());
    }
}
