//! Protocol dialect table.
//!
//! One row per supported wire dialect, all exposing the same accessor
//! contract over raw payloads. Accessors that have no meaning in an older
//! dialect return `None` instead of failing. Rows are stateless unit
//! structs; an `Api` looks its row up once at build time.

#[cfg(test)]
mod tests;

use odatum_schema::types::ProtocolVersion;
use serde_json::Value as Json;

///
/// Dialect
///

pub trait Dialect: Send + Sync {
    fn version(&self) -> ProtocolVersion;

    /// Strip the dialect's outer single-entity wrapper, if it has one.
    fn unwrap_entity<'a>(&self, payload: &'a Json) -> &'a Json {
        payload
    }

    /// Element sequence of a collection envelope; `None` when the payload
    /// is not an envelope.
    fn collection_items<'a>(&self, payload: &'a Json) -> Option<&'a [Json]>;

    fn entity_id<'a>(&self, payload: &'a Json) -> Option<&'a str>;
    fn etag<'a>(&self, payload: &'a Json) -> Option<&'a str>;
    fn type_name<'a>(&self, payload: &'a Json) -> Option<&'a str>;
    fn context<'a>(&self, payload: &'a Json) -> Option<&'a str>;
    fn next_link<'a>(&self, payload: &'a Json) -> Option<&'a str>;
    fn delta_link<'a>(&self, payload: &'a Json) -> Option<&'a str>;
    fn count(&self, payload: &Json) -> Option<i64>;

    /// Whether a payload key is dialect metadata rather than entity data.
    fn is_annotation(&self, key: &str) -> bool;
}

/// The dialect row for a protocol version.
#[must_use]
pub fn dialect_for(version: ProtocolVersion) -> &'static dyn Dialect {
    match version {
        ProtocolVersion::V2 => &DialectV2,
        ProtocolVersion::V3 => &DialectV3,
        ProtocolVersion::V4 => &DialectV4,
    }
}

///
/// DialectV4
///

pub struct DialectV4;

impl Dialect for DialectV4 {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::V4
    }

    fn collection_items<'a>(&self, payload: &'a Json) -> Option<&'a [Json]> {
        payload.get("value").and_then(Json::as_array).map(Vec::as_slice)
    }

    fn entity_id<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "@odata.id")
    }

    fn etag<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "@odata.etag")
    }

    fn type_name<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "@odata.type")
    }

    fn context<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "@odata.context")
    }

    fn next_link<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "@odata.nextLink")
    }

    fn delta_link<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "@odata.deltaLink")
    }

    fn count(&self, payload: &Json) -> Option<i64> {
        int_key(payload, "@odata.count")
    }

    fn is_annotation(&self, key: &str) -> bool {
        key.contains('@')
    }
}

///
/// DialectV3
///
/// JSON light: same envelope as V4, bare `odata.`-prefixed annotation keys.
///

pub struct DialectV3;

impl Dialect for DialectV3 {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::V3
    }

    fn collection_items<'a>(&self, payload: &'a Json) -> Option<&'a [Json]> {
        payload.get("value").and_then(Json::as_array).map(Vec::as_slice)
    }

    fn entity_id<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "odata.id")
    }

    fn etag<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "odata.etag")
    }

    fn type_name<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "odata.type")
    }

    fn context<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "odata.metadata")
    }

    fn next_link<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "odata.nextLink")
    }

    fn delta_link<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        str_key(payload, "odata.deltaLink")
    }

    fn count(&self, payload: &Json) -> Option<i64> {
        int_key(payload, "odata.count")
    }

    fn is_annotation(&self, key: &str) -> bool {
        key.starts_with("odata.") || key.contains('@')
    }
}

///
/// DialectV2
///
/// Verbose JSON: a `d` wrapper around everything, `__metadata` blocks on
/// entities, `results` as the collection envelope. Context and delta
/// links never existed in this dialect.
///

pub struct DialectV2;

impl DialectV2 {
    // `d` wraps both entities and collections; older services emit the
    // collection as a bare array under `d`
    fn body<'a>(payload: &'a Json) -> &'a Json {
        payload.get("d").unwrap_or(payload)
    }

    fn metadata<'a>(payload: &'a Json, key: &str) -> Option<&'a str> {
        Self::body(payload)
            .get("__metadata")
            .and_then(|m| m.get(key))
            .and_then(Json::as_str)
    }
}

impl Dialect for DialectV2 {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::V2
    }

    fn unwrap_entity<'a>(&self, payload: &'a Json) -> &'a Json {
        Self::body(payload)
    }

    fn collection_items<'a>(&self, payload: &'a Json) -> Option<&'a [Json]> {
        let body = Self::body(payload);

        match body {
            Json::Array(items) => Some(items.as_slice()),
            _ => body.get("results").and_then(Json::as_array).map(Vec::as_slice),
        }
    }

    fn entity_id<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        Self::metadata(payload, "uri")
    }

    fn etag<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        Self::metadata(payload, "etag")
    }

    fn type_name<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        Self::metadata(payload, "type")
    }

    fn context<'a>(&self, _payload: &'a Json) -> Option<&'a str> {
        None
    }

    fn next_link<'a>(&self, payload: &'a Json) -> Option<&'a str> {
        Self::body(payload).get("__next").and_then(Json::as_str)
    }

    fn delta_link<'a>(&self, _payload: &'a Json) -> Option<&'a str> {
        None
    }

    fn count(&self, payload: &Json) -> Option<i64> {
        int_key(Self::body(payload), "__count")
    }

    fn is_annotation(&self, key: &str) -> bool {
        key.starts_with("__")
    }
}

fn str_key<'a>(payload: &'a Json, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Json::as_str)
}

// counts travel as numbers in V4 and as strings in the older dialects
fn int_key(payload: &Json, key: &str) -> Option<i64> {
    match payload.get(key)? {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}
