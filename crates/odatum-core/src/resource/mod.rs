//! Resource path and query option composition.
//!
//! A [`Resource`] is an ordered list of typed segments, each carrying its
//! own option bag. Composition is pure; rendering produces the path string
//! and ordered query parameters the transport collaborator dispatches.

pub mod options;

#[cfg(test)]
mod tests;

use crate::{
    api::Api,
    key::{KeyError, KeyValue},
    value::Value,
};
use odatum_schema::types::ProtocolVersion;
use options::{EncodingError, Expand, Filter, QueryOptions};

///
/// SegmentKind
///

#[derive(Clone, Debug, PartialEq)]
pub enum SegmentKind {
    EntitySet(String),
    Singleton(String),
    Key(KeyValue),
    Navigation(String),
    Property(String),
    Function { name: String, args: Vec<(String, Value)> },
    Action(String),
    Ref,
    RawValue,
    Count,
    Metadata,
    Batch,
}

///
/// Segment
///

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub options: QueryOptions,
}

impl Segment {
    fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            options: QueryOptions::default(),
        }
    }
}

///
/// Resource
///
/// Cloning is a structural deep copy of the segment list and every option
/// bag; mutating a clone never touches the original, which is what makes
/// cloning a base query per page request safe.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    // never empty; every constructor seeds the first segment
    segments: Vec<Segment>,
}

impl Resource {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub fn entity_set(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::new(SegmentKind::EntitySet(name.into()))],
        }
    }

    #[must_use]
    pub fn singleton(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::new(SegmentKind::Singleton(name.into()))],
        }
    }

    #[must_use]
    pub fn metadata() -> Self {
        Self {
            segments: vec![Segment::new(SegmentKind::Metadata)],
        }
    }

    #[must_use]
    pub fn batch() -> Self {
        Self {
            segments: vec![Segment::new(SegmentKind::Batch)],
        }
    }

    ///
    /// COMPOSITION
    ///

    /// Address a single entity. List options set so far become
    /// meaningless and are cleared.
    #[must_use]
    pub fn key(mut self, key: impl Into<KeyValue>) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.options.clear_list_options();
        }
        self.segments.push(Segment::new(SegmentKind::Key(key.into())));
        self
    }

    /// Step into a navigation property. The target type differs, so
    /// inherited select/expand are cleared.
    #[must_use]
    pub fn navigate(mut self, name: impl Into<String>) -> Self {
        for segment in &mut self.segments {
            segment.options.clear_projection();
        }
        self.segments.push(Segment::new(SegmentKind::Navigation(name.into())));
        self
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::new(SegmentKind::Property(name.into())));
        self
    }

    #[must_use]
    pub fn function(
        mut self,
        name: impl Into<String>,
        args: impl IntoIterator<Item = (impl Into<String>, impl Into<Value>)>,
    ) -> Self {
        self.segments.push(Segment::new(SegmentKind::Function {
            name: name.into(),
            args: args
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }));
        self
    }

    #[must_use]
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::new(SegmentKind::Action(name.into())));
        self
    }

    #[must_use]
    pub fn as_ref_segment(mut self) -> Self {
        self.segments.push(Segment::new(SegmentKind::Ref));
        self
    }

    #[must_use]
    pub fn as_raw_value(mut self) -> Self {
        self.segments.push(Segment::new(SegmentKind::RawValue));
        self
    }

    #[must_use]
    pub fn as_count(mut self) -> Self {
        self.segments.push(Segment::new(SegmentKind::Count));
        self
    }

    ///
    /// OPTIONS
    ///
    /// All option setters write into the bag of the newest segment.
    ///

    #[must_use]
    pub fn options(&self) -> &QueryOptions {
        &self.segments[self.segments.len() - 1].options
    }

    pub fn options_mut(&mut self) -> &mut QueryOptions {
        let last = self.segments.len() - 1;
        &mut self.segments[last].options
    }

    #[must_use]
    pub fn select(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options_mut().select = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: Expand) -> Self {
        self.options_mut().expand.push(expand);
        self
    }

    #[must_use]
    pub fn expand_name(self, name: impl Into<String>) -> Self {
        self.expand(Expand::new(name))
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.options_mut().filter = Some(filter);
        self
    }

    #[must_use]
    pub fn filter_raw(self, expression: impl Into<String>) -> Self {
        self.filter(Filter::Raw(expression.into()))
    }

    #[must_use]
    pub fn order_by(mut self, clauses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options_mut().order_by = clauses.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn top(mut self, count: u64) -> Self {
        self.options_mut().top = Some(count);
        self
    }

    #[must_use]
    pub fn skip(mut self, count: u64) -> Self {
        self.options_mut().skip = Some(count);
        self
    }

    #[must_use]
    pub fn inline_count(mut self) -> Self {
        self.options_mut().inline_count = true;
        self
    }

    #[must_use]
    pub fn search(mut self, expression: impl Into<String>) -> Self {
        self.options_mut().search = Some(expression.into());
        self
    }

    #[must_use]
    pub fn skip_token(mut self, token: impl Into<String>) -> Self {
        self.options_mut().skip_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options_mut().custom.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    ///
    /// RENDERING
    ///

    /// The request path, without service root or query string.
    #[must_use]
    pub fn path(&self, version: ProtocolVersion) -> String {
        let mut parts: Vec<String> = Vec::new();

        for segment in &self.segments {
            match &segment.kind {
                SegmentKind::EntitySet(name)
                | SegmentKind::Singleton(name)
                | SegmentKind::Navigation(name)
                | SegmentKind::Property(name)
                | SegmentKind::Action(name) => parts.push(name.clone()),

                // a key predicate attaches to the segment before it
                SegmentKind::Key(key) => {
                    let predicate = key_predicate(key, version);
                    match parts.last_mut() {
                        Some(last) => last.push_str(&predicate),
                        None => parts.push(predicate),
                    }
                }

                SegmentKind::Function { name, args } => {
                    if version == ProtocolVersion::V4 && !args.is_empty() {
                        let rendered = args
                            .iter()
                            .map(|(k, v)| format!("{k}={}", literal(v, version)))
                            .collect::<Vec<_>>()
                            .join(",");
                        parts.push(format!("{name}({rendered})"));
                    } else {
                        // older dialects pass arguments as query parameters
                        parts.push(name.clone());
                    }
                }

                SegmentKind::Ref => parts.push("$ref".to_string()),
                SegmentKind::RawValue => parts.push("$value".to_string()),
                SegmentKind::Count => parts.push("$count".to_string()),
                SegmentKind::Metadata => parts.push("$metadata".to_string()),
                SegmentKind::Batch => parts.push("$batch".to_string()),
            }
        }

        parts.join("/")
    }

    /// Ordered query parameters: folded segment options first, then, on
    /// the older dialects, function arguments.
    pub fn query(
        &self,
        version: ProtocolVersion,
    ) -> Result<Vec<(String, String)>, EncodingError> {
        let mut folded = QueryOptions::default();
        for segment in &self.segments {
            folded.merge_from(&segment.options);
        }

        let mut out = folded.encode(version)?;

        if version != ProtocolVersion::V4 {
            for segment in &self.segments {
                if let SegmentKind::Function { args, .. } = &segment.kind {
                    for (name, value) in args {
                        out.push((name.clone(), literal(value, version)));
                    }
                }
            }
        }

        Ok(out)
    }

    /// Full request URL against a service root.
    pub fn url(
        &self,
        service_root: &str,
        version: ProtocolVersion,
    ) -> Result<String, EncodingError> {
        let mut url = format!(
            "{}/{}",
            service_root.trim_end_matches('/'),
            self.path(version)
        );

        let query = self.query(version)?;
        if !query.is_empty() {
            let rendered = query
                .into_iter()
                .map(|(key, value)| format!("{key}={}", escape_component(&value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&rendered);
        }

        Ok(url)
    }
}

impl From<Value> for KeyValue {
    fn from(value: Value) -> Self {
        Self::Single(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Single(Value::Int(value))
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Single(Value::Text(value.to_string()))
    }
}

impl Api {
    /// Start a resource on a declared entity set; `None` when no schema
    /// declares it.
    #[must_use]
    pub fn resource(&self, entity_set: &str) -> Option<Resource> {
        self.entity_set(entity_set)
            .map(|set| Resource::entity_set(set.name()))
    }

    /// Compose `Set(key)` straight from an entity state value, resolving
    /// the key through the set's entity type.
    pub fn resource_for(&self, entity_set: &str, state: &Value) -> Result<Resource, KeyError> {
        let set = self
            .entity_set(entity_set)
            .ok_or_else(|| KeyError::UnknownEntitySet {
                name: entity_set.to_string(),
            })?;
        let entity = set
            .entity()
            .map(|idx| self.entity_at(idx))
            .ok_or_else(|| KeyError::UnknownEntitySet {
                name: set.name().to_string(),
            })?;

        let key = entity.resolve_key(self, state)?;

        Ok(Resource::entity_set(set.name()).key(key))
    }
}

fn key_predicate(key: &KeyValue, version: ProtocolVersion) -> String {
    match key {
        KeyValue::Single(value) => format!("({})", literal(value, version)),
        KeyValue::Composite(entries) => {
            let rendered = entries
                .iter()
                .map(|(name, value)| format!("{name}={}", literal(value, version)))
                .collect::<Vec<_>>()
                .join(",");
            format!("({rendered})")
        }
    }
}

/// Render a typed value as an OData URL literal.
#[must_use]
pub fn literal(value: &Value, version: ProtocolVersion) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Text(v) => format!("'{}'", v.replace('\'', "''")),
        Value::Guid(v) => match version {
            ProtocolVersion::V4 => v.hyphenated().to_string(),
            _ => format!("guid'{}'", v.hyphenated()),
        },
        Value::DateTime(v) => {
            let rendered = crate::codec::format_datetime(*v);
            match version {
                ProtocolVersion::V4 => rendered,
                _ => format!("datetime'{rendered}'"),
            }
        }
        Value::Date(v) => crate::codec::format_date(*v),
        Value::TimeOfDay(v) => crate::codec::format_time(*v),
        Value::Duration(v) => format!("duration'{}'", crate::codec::format_duration(*v)),
        Value::Binary(v) => {
            use base64::{Engine as _, engine::general_purpose::STANDARD};
            format!("binary'{}'", STANDARD.encode(v))
        }
        Value::List(_) | Value::Object(_) => value.to_json().to_string(),
    }
}

// Minimal reserved-set escaping for query parameter values.
fn escape_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '&' => out.push_str("%26"),
            '+' => out.push_str("%2B"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }

    out
}
