use crate::{node::SchemaConfig, types::ProtocolVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// ApiConfig
///
/// Root of the configuration tree: one remote service, one dialect,
/// any number of schemas.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub service_root: String,
    pub version: ProtocolVersion,

    #[serde(default)]
    pub options: ParseOptions,

    /// Qualified type name → built-in primitive name. Replaces the resolved
    /// parser for the named type during the configure pass.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parser_overrides: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<SchemaConfig>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(service_root: impl Into<String>, version: ProtocolVersion) -> Self {
        Self {
            service_root: service_root.into(),
            version,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_override(
        mut self,
        qualified_name: impl Into<String>,
        primitive: impl Into<String>,
    ) -> Self {
        self.parser_overrides
            .insert(qualified_name.into(), primitive.into());
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: SchemaConfig) -> Self {
        self.schemas.push(schema);
        self
    }
}

///
/// ParseOptions
///
/// API-wide conversion switches applied during the configure pass.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct ParseOptions {
    /// Emit enum values as member-name strings instead of numbers.
    #[serde(default)]
    pub string_as_enum: bool,

    /// Serialize decimals as precision/scale formatted strings.
    #[serde(default)]
    pub decimal_compat: bool,
}
