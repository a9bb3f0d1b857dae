//! HAL response and request shapes.
//!
//! Every field the server may omit is an `Option` or has a serde default, so a
//! sparse document still decodes. Callers decide what a missing value means.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default)]
    pub self_link: Option<Link>,
    #[serde(rename = "busPointType", default)]
    pub bus_point_type: Option<Link>,
}

/// Reads `_links.self.href`.
pub(crate) fn self_href(links: Option<&Links>) -> Option<String> {
    links
        .and_then(|links| links.self_link.as_ref())
        .and_then(|link| link.href.clone())
}

/// Reads `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pagination descriptor of a collection response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub number: u64,
}

/// A paginated collection: `{"_embedded": {"<rel>": [...]}, "page": {...}}`.
///
/// Both fields are plain `Option`s; serde reads an absent one as `None`
/// without putting a `Default` bound on `T`.
#[derive(Debug, Deserialize)]
pub struct PagedCollection<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Option<HashMap<String, Vec<T>>>,
    pub page: Option<PageData>,
}

impl<T> PagedCollection<T> {
    /// Splits the collection into the items under `rel` and the page metadata.
    /// A missing `_embedded` object or relation yields no items.
    pub fn into_parts(self, rel: &str) -> (Vec<T>, Option<PageData>) {
        let items = self
            .embedded
            .and_then(|mut embedded| embedded.remove(rel))
            .unwrap_or_default();
        (items, self.page)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BusPointDto {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BusPointTypeDto {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CarrierDto {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Body of `POST /busPoints` and `PATCH <bus point link>`.
///
/// The type is referenced by its link, as Spring Data REST expects for
/// associations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusPointRequest {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_point_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BusPointTypeRequest {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CarrierRequest {
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_splits_items_and_page() {
        let body = json!({
            "_embedded": {
                "busPoints": [{
                    "id": 7,
                    "name": "Main Square",
                    "address": "Main St 1",
                    "_links": {
                        "self": { "href": "http://api/busPoints/7" },
                        "busPointType": { "href": "http://api/busPoints/7/busPointType" }
                    }
                }]
            },
            "page": { "size": 20, "totalElements": 1, "totalPages": 1, "number": 0 }
        });

        let collection: PagedCollection<BusPointDto> = serde_json::from_value(body).unwrap();
        let (items, page) = collection.into_parts("busPoints");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 7);
        let links = items[0].links.as_ref().unwrap();
        assert_eq!(
            links.bus_point_type.as_ref().and_then(|l| l.href.as_deref()),
            Some("http://api/busPoints/7/busPointType")
        );
        assert_eq!(
            page,
            Some(PageData {
                size: 20,
                total_elements: 1,
                total_pages: 1,
                number: 0
            })
        );
    }

    #[test]
    fn collection_without_embedded_is_empty() {
        let collection: PagedCollection<BusPointDto> =
            serde_json::from_value(json!({ "page": { "size": 20 } })).unwrap();
        let (items, page) = collection.into_parts("busPoints");
        assert!(items.is_empty());
        assert_eq!(page.map(|p| p.size), Some(20));

        let collection: PagedCollection<BusPointDto> =
            serde_json::from_value(json!({ "_embedded": { "carriers": [] } })).unwrap();
        let (items, page) = collection.into_parts("busPoints");
        assert!(items.is_empty());
        assert!(page.is_none());
    }

    #[test]
    fn sparse_item_decodes_with_defaults() {
        let dto: BusPointDto = serde_json::from_value(json!({ "id": 3 })).unwrap();
        assert_eq!(dto.name, "");
        assert_eq!(dto.address, "");
        assert!(dto.links.is_none());
        assert_eq!(self_href(dto.links.as_ref()), None);
    }

    #[test]
    fn collection_decodes_items_without_default() {
        #[derive(Debug, Deserialize)]
        struct Stop {
            id: i64,
        }

        let collection: PagedCollection<Stop> =
            serde_json::from_value(json!({ "_embedded": { "stops": [{ "id": 8 }] } })).unwrap();
        let (items, page) = collection.into_parts("stops");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 8);
        assert!(page.is_none());
    }

    #[test]
    fn null_hrefs_read_as_missing_links() {
        let collection: PagedCollection<BusPointDto> = serde_json::from_value(json!({
            "_embedded": { "busPoints": [{
                "id": 1,
                "_links": {
                    "self": { "href": null },
                    "busPointType": { "href": null }
                }
            }] }
        }))
        .unwrap();
        let (items, _) = collection.into_parts("busPoints");

        assert_eq!(items.len(), 1);
        let links = items[0].links.as_ref().unwrap();
        assert_eq!(self_href(Some(links)), None);
        assert_eq!(links.bus_point_type.as_ref().and_then(|l| l.href.clone()), None);
    }

    #[test]
    fn null_strings_read_as_empty() {
        let dto: BusPointDto = serde_json::from_value(json!({
            "id": 4,
            "name": null,
            "address": null,
            "_links": null
        }))
        .unwrap();
        assert_eq!(dto.name, "");
        assert_eq!(dto.address, "");
        assert!(dto.links.is_none());
    }

    #[test]
    fn request_serializes_type_link() {
        let request = BusPointRequest {
            name: "Depot".to_string(),
            address: "Yard 2".to_string(),
            bus_point_type: Some("http://api/busPointTypes/1".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "Depot",
                "address": "Yard 2",
                "busPointType": "http://api/busPointTypes/1"
            })
        );

        let request = BusPointRequest {
            bus_point_type: None,
            ..request
        };
        assert!(serde_json::to_value(&request)
            .unwrap()
            .get("busPointType")
            .is_none());
    }
}
