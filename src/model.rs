//! Domain records mirrored by the stores.

use crate::api::hal::{self, BusPointDto, BusPointTypeDto, CarrierDto};
use crate::api::{BusPointTypeRequest, CarrierRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Id carried by a bus point type that has not been resolved yet.
pub const UNRESOLVED_ID: i64 = -1;

/// Records with a numeric identity; the view list orders and de-duplicates by it.
pub trait Identified {
    fn id(&self) -> i64;
}

/// A record served as a plain HAL collection.
///
/// Implementors name their collection path and `_embedded` relation and say how
/// to build themselves from the response DTO. [`CollectionStore`] does the rest.
///
/// [`CollectionStore`]: crate::store::CollectionStore
pub trait HalResource: Identified + Clone + Debug + Send + Sync + 'static {
    /// Response body of a single item.
    type Dto: DeserializeOwned + Send;
    /// Body sent on create and edit.
    type Request: Serialize + Debug + Send + Sync;

    /// Collection path relative to the API base URL.
    const PATH: &'static str;
    /// Relation name under `_embedded` in collection responses.
    const REL: &'static str;
    /// Human readable name used in logs and errors.
    const KIND: &'static str;

    fn from_dto(dto: Self::Dto) -> Self;

    /// The record's own link.
    fn href(&self) -> Option<&str>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusPointType {
    pub id: i64,
    pub name: String,
    pub href: Option<String>,
}

impl BusPointType {
    /// Placeholder for a type that is only known by its link.
    #[must_use]
    pub fn unresolved(href: Option<String>) -> Self {
        Self {
            id: UNRESOLVED_ID,
            name: String::new(),
            href,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.id != UNRESOLVED_ID
    }
}

impl Identified for BusPointType {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HalResource for BusPointType {
    type Dto = BusPointTypeDto;
    type Request = BusPointTypeRequest;

    const PATH: &'static str = "/busPointTypes";
    const REL: &'static str = "busPointTypes";
    const KIND: &'static str = "bus point type";

    fn from_dto(dto: BusPointTypeDto) -> Self {
        Self {
            id: dto.id,
            href: hal::self_href(dto.links.as_ref()),
            name: dto.name,
        }
    }

    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusPoint {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub href: Option<String>,
    pub bus_point_type: BusPointType,
}

impl BusPoint {
    /// Builds a bus point whose type is still the unresolved placeholder
    /// pointing at `_links.busPointType`.
    #[must_use]
    pub fn from_dto(dto: BusPointDto) -> Self {
        let type_href = dto
            .links
            .as_ref()
            .and_then(|links| links.bus_point_type.as_ref())
            .and_then(|link| link.href.clone());

        Self {
            id: dto.id,
            href: hal::self_href(dto.links.as_ref()),
            name: dto.name,
            address: dto.address,
            bus_point_type: BusPointType::unresolved(type_href),
        }
    }

    #[must_use]
    pub fn with_type(mut self, bus_point_type: BusPointType) -> Self {
        self.bus_point_type = bus_point_type;
        self
    }
}

impl Identified for BusPoint {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carrier {
    pub id: i64,
    pub name: String,
    pub href: Option<String>,
}

impl Identified for Carrier {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HalResource for Carrier {
    type Dto = CarrierDto;
    type Request = CarrierRequest;

    const PATH: &'static str = "/carriers";
    const REL: &'static str = "carriers";
    const KIND: &'static str = "carrier";

    fn from_dto(dto: CarrierDto) -> Self {
        Self {
            id: dto.id,
            href: hal::self_href(dto.links.as_ref()),
            name: dto.name,
        }
    }

    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}
