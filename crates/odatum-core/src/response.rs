//! Response unwrapping: dialect envelope handling plus typed
//! deserialization of transport payloads.

use crate::{api::Api, dialect::Dialect, value::Value};
use serde_json::{Map, Value as Json};

///
/// EntityMeta
///
/// Dialect metadata extracted from a single-entity payload. Fields a
/// dialect does not carry stay `None`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EntityMeta {
    pub id: Option<String>,
    pub etag: Option<String>,
    pub type_name: Option<String>,
    pub context: Option<String>,
}

impl EntityMeta {
    fn extract(dialect: &dyn Dialect, payload: &Json) -> Self {
        Self {
            id: dialect.entity_id(payload).map(str::to_string),
            etag: dialect.etag(payload).map(str::to_string),
            type_name: dialect.type_name(payload).map(str::to_string),
            context: dialect.context(payload).map(str::to_string),
        }
    }
}

///
/// CollectionMeta
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollectionMeta {
    pub next_link: Option<String>,
    pub delta_link: Option<String>,
    pub count: Option<i64>,
}

impl Api {
    /// Unwrap a single-entity payload: strip the dialect envelope and
    /// annotation keys, deserialize the rest through the named type.
    #[must_use]
    pub fn unwrap_entity(&self, type_name: &str, payload: &Json) -> (Value, EntityMeta) {
        let dialect = self.dialect();
        let meta = EntityMeta::extract(dialect, payload);

        let body = strip_annotations(dialect, dialect.unwrap_entity(payload));
        let value = self.deserialize(type_name, &body);

        (value, meta)
    }

    /// Unwrap a collection payload element-wise. A payload that is neither
    /// an envelope nor a bare array yields no elements.
    #[must_use]
    pub fn unwrap_collection(&self, type_name: &str, payload: &Json) -> (Vec<Value>, CollectionMeta) {
        let dialect = self.dialect();

        let meta = CollectionMeta {
            next_link: dialect.next_link(payload).map(str::to_string),
            delta_link: dialect.delta_link(payload).map(str::to_string),
            count: dialect.count(payload),
        };

        let items: &[Json] = match dialect.collection_items(payload) {
            Some(items) => items,
            None => payload.as_array().map_or(&[], Vec::as_slice),
        };

        let values = items
            .iter()
            .map(|item| {
                let body = strip_annotations(dialect, dialect.unwrap_entity(item));
                self.deserialize(type_name, &body)
            })
            .collect();

        (values, meta)
    }

    /// The concurrency token of an entity payload, extracted before a
    /// write is dispatched.
    #[must_use]
    pub fn extract_etag(&self, payload: &Json) -> Option<String> {
        self.dialect().etag(payload).map(str::to_string)
    }

    /// Split a payload's top-level keys into dialect annotations and
    /// plain attributes.
    #[must_use]
    pub fn split_keys<'a>(&self, payload: &'a Json) -> (Vec<&'a str>, Vec<&'a str>) {
        let dialect = self.dialect();

        let Some(map) = dialect.unwrap_entity(payload).as_object() else {
            return (Vec::new(), Vec::new());
        };

        map.keys()
            .map(String::as_str)
            .partition(|key| dialect.is_annotation(key))
    }
}

fn strip_annotations(dialect: &dyn Dialect, body: &Json) -> Json {
    match body.as_object() {
        Some(map) => Json::Object(
            map.iter()
                .filter(|(key, _)| !dialect.is_annotation(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<String, Json>>(),
        ),
        None => body.clone(),
    }
}
