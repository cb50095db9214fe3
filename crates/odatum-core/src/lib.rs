//! Runtime engine for Odatum: typed values, wire codecs, the configured
//! type graph, protocol dialects, and resource composition.
//!
//! Everything here is synchronous, in-memory computation. An [`api::Api`]
//! is immutable once built and may be shared read-only across threads; the
//! network exchange itself belongs to the caller.

pub mod api;
pub mod codec;
pub mod dialect;
pub mod key;
pub mod resource;
pub mod response;
pub mod value;

use thiserror::Error as ThisError;

///
/// Prelude
///
/// Domain vocabulary only; helpers and internals stay one level down.
///

pub mod prelude {
    pub use crate::{
        api::{Api, TypeParser},
        key::KeyValue,
        resource::{Resource, options::QueryOptions},
        value::Value,
    };
    pub use odatum_schema::types::ProtocolVersion;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] api::BuildError),

    #[error(transparent)]
    Key(#[from] key::KeyError),

    #[error(transparent)]
    Encoding(#[from] resource::options::EncodingError),
}
