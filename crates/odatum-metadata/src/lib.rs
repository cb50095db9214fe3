//! CSDL/EDMX metadata document parser.
//!
//! Turns the XML text a service returns from `$metadata` into a typed
//! document graph ([`document::Document`]) and reduces that graph to the
//! declarative configuration tree of `odatum-schema`. Parsing is a pure
//! transform of the input text; nothing here touches the network or the
//! runtime type graph.

pub mod document;
mod parse;
mod reduce;

use odatum_schema::node::ApiConfig;
use thiserror::Error as ThisError;

///
/// MetadataError
///
/// Every way a metadata document can be rejected. Parsing never publishes a
/// partial graph: the first structural problem aborts the whole load.
///

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("metadata document is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("metadata document has no <{0}> element")]
    MissingRoot(&'static str),

    #[error("unsupported protocol version '{version}'")]
    UnsupportedVersion { version: String },

    #[error("element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement {
        parent: &'static str,
        element: String,
    },

    #[error("attribute '{attribute}' on <{element}> has invalid value '{value}'")]
    InvalidValue {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}

/// Parse a metadata document into its typed document graph.
pub fn parse_document(xml: &str) -> Result<document::Document, MetadataError> {
    parse::parse_document(xml)
}

/// Parse a metadata document and reduce it straight to an [`ApiConfig`]
/// rooted at `service_root`.
pub fn parse_api(xml: &str, service_root: &str) -> Result<ApiConfig, MetadataError> {
    let document = parse::parse_document(xml)?;

    Ok(document.to_config(service_root))
}
