//! Query option bags and their deterministic encoding.

use crate::{resource::literal, value::Value};
use odatum_schema::types::ProtocolVersion;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// EncodingError
///
/// Malformed option structures fail here, before anything reaches the
/// transport; a corrupt query string is never emitted.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EncodingError {
    #[error("filter clause '{field}' must carry a scalar value")]
    NonScalarFilter { field: String },

    #[error("expand entry has an empty navigation name")]
    EmptyExpandName,
}

///
/// Filter
///
/// Either a raw expression passed through verbatim, or a conjunction of
/// field-equality clauses rendered from typed values.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Raw(String),
    All(Vec<(String, Value)>),
}

impl Filter {
    fn encode(&self, version: ProtocolVersion) -> Result<String, EncodingError> {
        match self {
            Self::Raw(expression) => Ok(expression.clone()),
            Self::All(clauses) => {
                let mut parts = Vec::with_capacity(clauses.len());
                for (field, value) in clauses {
                    if !value.is_scalar() {
                        return Err(EncodingError::NonScalarFilter {
                            field: field.clone(),
                        });
                    }
                    parts.push(format!("{field} eq {}", literal(value, version)));
                }

                Ok(parts.join(" and "))
            }
        }
    }
}

///
/// Expand
///
/// A navigation name with its own nested option bag, rendered as a
/// parenthesized sub-query when the bag is non-empty.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expand {
    pub name: String,
    pub options: QueryOptions,
}

impl Expand {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: QueryOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    fn encode(&self, version: ProtocolVersion) -> Result<String, EncodingError> {
        if self.name.is_empty() {
            return Err(EncodingError::EmptyExpandName);
        }

        if self.options.is_empty() {
            return Ok(self.name.clone());
        }

        let nested = self
            .options
            .encode(version)?
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";");

        Ok(format!("{}({nested})", self.name))
    }
}

///
/// QueryOptions
///
/// One segment's option bag. `custom` bypasses all encoding and merges
/// verbatim into the final parameter set; normal options win on key
/// collision.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    pub select: Vec<String>,
    pub expand: Vec<Expand>,
    pub filter: Option<Filter>,
    pub order_by: Vec<String>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub inline_count: bool,
    pub search: Option<String>,
    pub format: Option<String>,
    pub skip_token: Option<String>,
    pub custom: BTreeMap<String, String>,
}

impl QueryOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Drop the options a key predicate makes meaningless.
    pub(crate) fn clear_list_options(&mut self) {
        self.filter = None;
        self.order_by.clear();
        self.top = None;
        self.skip = None;
        self.inline_count = false;
    }

    /// Drop the projection options a navigation step invalidates.
    pub(crate) fn clear_projection(&mut self) {
        self.select.clear();
        self.expand.clear();
    }

    // later bags win per option when segments are folded for rendering
    pub(crate) fn merge_from(&mut self, other: &Self) {
        if !other.select.is_empty() {
            self.select = other.select.clone();
        }
        if !other.expand.is_empty() {
            self.expand = other.expand.clone();
        }
        if other.filter.is_some() {
            self.filter = other.filter.clone();
        }
        if !other.order_by.is_empty() {
            self.order_by = other.order_by.clone();
        }
        if other.top.is_some() {
            self.top = other.top;
        }
        if other.skip.is_some() {
            self.skip = other.skip;
        }
        if other.inline_count {
            self.inline_count = true;
        }
        if other.search.is_some() {
            self.search = other.search.clone();
        }
        if other.format.is_some() {
            self.format = other.format.clone();
        }
        if other.skip_token.is_some() {
            self.skip_token = other.skip_token.clone();
        }
        for (key, value) in &other.custom {
            self.custom.insert(key.clone(), value.clone());
        }
    }

    /// Render to ordered `(name, value)` pairs. Option order is fixed, so
    /// the same bag always yields byte-identical output.
    pub fn encode(
        &self,
        version: ProtocolVersion,
    ) -> Result<Vec<(String, String)>, EncodingError> {
        let mut out: Vec<(String, String)> = Vec::new();

        if let Some(filter) = &self.filter {
            out.push(("$filter".to_string(), filter.encode(version)?));
        }
        if !self.select.is_empty() {
            out.push(("$select".to_string(), self.select.join(",")));
        }
        if !self.expand.is_empty() {
            let rendered = self
                .expand
                .iter()
                .map(|e| e.encode(version))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(("$expand".to_string(), rendered.join(",")));
        }
        if !self.order_by.is_empty() {
            out.push(("$orderby".to_string(), self.order_by.join(",")));
        }
        if let Some(top) = self.top {
            out.push(("$top".to_string(), top.to_string()));
        }
        if let Some(skip) = self.skip {
            out.push(("$skip".to_string(), skip.to_string()));
        }
        if self.inline_count {
            // the old dialect spells inline counting differently
            let (key, value) = match version {
                ProtocolVersion::V2 => ("$inlinecount", "allpages"),
                _ => ("$count", "true"),
            };
            out.push((key.to_string(), value.to_string()));
        }
        if let Some(search) = &self.search {
            out.push(("$search".to_string(), search.clone()));
        }
        if let Some(format) = &self.format {
            out.push(("$format".to_string(), format.clone()));
        }
        if let Some(token) = &self.skip_token {
            out.push(("$skiptoken".to_string(), token.clone()));
        }

        for (key, value) in &self.custom {
            if !out.iter().any(|(existing, _)| existing == key) {
                out.push((key.clone(), value.clone()));
            }
        }

        Ok(out)
    }
}
