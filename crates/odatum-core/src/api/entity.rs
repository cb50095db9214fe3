use crate::{
    api::{Api, EntityIdx, FieldKind},
    codec::{DecimalFormat, PrimitiveKind},
    value::Value,
};
use odatum_schema::node::{EntityConfig, FieldConfig};
use serde_json::Value as Json;

///
/// EntityType
///
/// Runtime entity or complex type. `parent` is a graph edge into the
/// `Api` arena, not ownership; it is `None` until the configure pass
/// resolves the declared base name, and stays `None` when that name is
/// unknown.
///

#[derive(Debug)]
pub struct EntityType {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) open_type: bool,
    pub(crate) base_name: Option<String>,
    pub(crate) parent: Option<EntityIdx>,
    pub(crate) fields: Vec<FieldParser>,
}

impl EntityType {
    pub(crate) fn new(config: &EntityConfig, namespace: &str) -> Self {
        Self {
            name: config.name.clone(),
            qualified_name: format!("{namespace}.{}", config.name),
            open_type: config.open_type,
            base_name: config.base_type.clone(),
            parent: None,
            fields: config.fields.iter().map(FieldParser::new).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open_type
    }

    #[must_use]
    pub const fn parent(&self) -> Option<EntityIdx> {
        self.parent
    }

    /// Field lookup on this type's own declarations only.
    #[must_use]
    pub fn own_field(&self, name: &str) -> Option<&FieldParser> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field lookup walking the base chain, nearest declaration wins.
    #[must_use]
    pub fn field<'a>(&'a self, api: &'a Api, name: &str) -> Option<&'a FieldParser> {
        self.own_field(name).or_else(|| {
            self.parent
                .map(|idx| api.entity_at(idx))
                .and_then(|parent| parent.field(api, name))
        })
    }

    /// Fields in declaration order. With `include_parents`, inherited
    /// fields come first and redeclared names are listed as observed, not
    /// deduplicated.
    #[must_use]
    pub fn fields<'a>(&'a self, api: &'a Api, include_parents: bool) -> Vec<&'a FieldParser> {
        let mut out = Vec::new();

        if include_parents && let Some(idx) = self.parent {
            out.extend(api.entity_at(idx).fields(api, true));
        }
        out.extend(self.fields.iter());

        out
    }

    /// Key field names across the base chain, declaration order.
    #[must_use]
    pub fn key_fields<'a>(&'a self, api: &'a Api) -> Vec<&'a FieldParser> {
        self.fields(api, true).into_iter().filter(|f| f.key).collect()
    }

    /// Deserialize a raw entity payload. Inherited fields apply first over
    /// the structurally converted input, then this type's own fields over
    /// the same value; keys the model does not declare pass through
    /// untouched.
    #[must_use]
    pub fn deserialize(&self, api: &Api, raw: &Json) -> Value {
        let Json::Object(input) = raw else {
            return Value::from_json(raw);
        };

        let mut out = match self.parent {
            Some(idx) => api.entity_at(idx).deserialize(api, raw),
            None => Value::from_json(raw),
        };

        if let Value::Object(map) = &mut out {
            for field in &self.fields {
                if let Some(raw_field) = input.get(&field.name) {
                    map.insert(field.name.clone(), field.deserialize(api, raw_field));
                }
            }
        }

        out
    }

    /// Serialize a typed entity state back to its wire shape, the
    /// structural mirror of [`Self::deserialize`].
    #[must_use]
    pub fn serialize(&self, api: &Api, value: &Value) -> Json {
        let Value::Object(state) = value else {
            return value.to_json();
        };

        let mut out = match self.parent {
            Some(idx) => api.entity_at(idx).serialize(api, value),
            None => value.to_json(),
        };

        if let Json::Object(map) = &mut out {
            for field in &self.fields {
                if let Some(field_value) = state.get(&field.name) {
                    map.insert(field.name.clone(), field.serialize(api, field_value));
                }
            }
        }

        out
    }
}

///
/// FieldParser
///
/// One declared property plus its resolved parser. `kind` starts as
/// `Opaque` and is upgraded by the configure pass; an unknown wire type
/// keeps the pass-through kind deliberately.
///

#[derive(Debug)]
pub struct FieldParser {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) nullable: bool,
    pub(crate) collection: bool,
    pub(crate) key: bool,
    pub(crate) navigation: bool,
    pub(crate) precision: Option<u32>,
    pub(crate) scale: Option<u32>,
    pub(crate) max_length: Option<u32>,
    pub(crate) default_value: Option<String>,
    pub(crate) kind: FieldKind,
}

impl FieldParser {
    pub(crate) fn new(config: &FieldConfig) -> Self {
        Self {
            name: config.name.clone(),
            type_name: config.type_name.clone(),
            nullable: config.nullable,
            collection: config.collection,
            key: config.key,
            navigation: config.navigation,
            precision: config.precision,
            scale: config.scale,
            max_length: config.max_length,
            default_value: config.default_value.clone(),
            kind: FieldKind::Opaque,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.key
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.collection
    }

    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        self.navigation
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub(crate) fn deserialize(&self, api: &Api, raw: &Json) -> Value {
        if raw.is_null() {
            return Value::Null;
        }

        if self.collection {
            if let Json::Array(items) = raw {
                return Value::List(
                    items
                        .iter()
                        .map(|item| api.deserialize_kind(self.kind, item))
                        .collect(),
                );
            }
            // older dialects wrap expanded collections in their envelope
            if let Some(items) = api.dialect().collection_items(raw) {
                return Value::List(
                    items
                        .iter()
                        .map(|item| api.deserialize_kind(self.kind, item))
                        .collect(),
                );
            }

            return Value::from_json(raw);
        }

        api.deserialize_kind(self.kind, raw)
    }

    pub(crate) fn serialize(&self, api: &Api, value: &Value) -> Json {
        if value.is_null() {
            return Json::Null;
        }

        let decimal = self.decimal_format(api);

        if self.collection {
            if let Value::List(items) = value {
                return Json::Array(
                    items
                        .iter()
                        .map(|item| api.serialize_kind(self.kind, item, decimal))
                        .collect(),
                );
            }

            return value.to_json();
        }

        api.serialize_kind(self.kind, value, decimal)
    }

    fn decimal_format(&self, api: &Api) -> Option<DecimalFormat> {
        if api.options().decimal_compat
            && matches!(self.kind, FieldKind::Primitive(PrimitiveKind::Decimal))
        {
            Some(DecimalFormat {
                precision: self.precision,
                scale: self.scale,
            })
        } else {
            None
        }
    }
}
