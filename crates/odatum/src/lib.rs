//! Odatum — a metadata-driven OData client engine.
//!
//! ## Crate layout
//! - `schema`: the declarative configuration graph and its validation.
//! - `metadata`: the CSDL/EDMX document parser reducing to configuration.
//! - `core`: typed values, wire codecs, the configured runtime graph,
//!   protocol dialects, and the resource/query composer.
//!
//! The `prelude` module mirrors the surface a typical caller touches:
//! parse a metadata document, build an [`core::api::Api`], deserialize
//! payloads, compose resources.

pub use odatum_core as core;
pub use odatum_metadata as metadata;
pub use odatum_schema as schema;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use odatum_core::api::Api;
pub use odatum_metadata::{MetadataError, parse_api, parse_document};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        api::{Api, TypeParser},
        key::{KeyError, KeyValue},
        resource::{
            Resource,
            options::{Expand, Filter, QueryOptions},
        },
        value::Value,
    };
    pub use crate::metadata::{parse_api, parse_document};
    pub use crate::schema::{
        node::{ApiConfig, EntityConfig, FieldConfig, SchemaConfig},
        types::ProtocolVersion,
    };
}
