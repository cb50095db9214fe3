//! Declarative configuration graph for an OData service model.
//!
//! Nodes here are inert data: they carry names, flags, and facets exactly as
//! declared, never resolved references. The runtime graph in `odatum-core`
//! is built from this tree, and the metadata parser in `odatum-metadata`
//! reduces a CSDL document to it, so metadata-driven and hand-authored
//! models converge on the same shapes.

pub mod node;
pub mod types;
pub mod validate;

use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        node::*,
        types::{CallableKind, ProtocolVersion},
        validate::ErrorList,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(validate::ErrorList),
}
