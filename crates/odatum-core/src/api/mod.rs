//! The configured runtime type graph.
//!
//! [`Api::build`] runs the two-phase lifecycle in one call: a single
//! top-down construction pass over the configuration tree, then one
//! configure pass that wires every cross-type reference through typed
//! arena indices. A reachable `Api` is therefore always fully configured,
//! immutable, and shareable across threads.

mod callable;
mod entity;
mod r#enum;
mod schema;

#[cfg(test)]
mod tests;

pub use callable::{BINDING_PARAMETER, Callable, CallableParameter, CallableReturn};
pub use entity::{EntityType, FieldParser};
pub use r#enum::{EnumMember, EnumType};
pub use schema::{EntitySet, Schema, Singleton};

use crate::{
    codec::{DecimalFormat, PrimitiveKind},
    dialect::{Dialect, dialect_for},
    value::Value,
};
use derive_more::Display;
use odatum_schema::{
    node::{ApiConfig, ParseOptions},
    types::ProtocolVersion,
};
use serde_json::Value as Json;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// Arena indices
///
/// Cross-type references are typed indices into the `Api` arenas, so
/// cyclic and self-referential types need no reference counting.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityIdx(pub(crate) usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EnumIdx(pub(crate) usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallableIdx(pub(crate) usize);

///
/// FieldKind
///
/// Resolved parser for one declared type name. Picked once during the
/// configure pass; the serialize/deserialize hot path is a plain match.
/// `Opaque` is the tolerated unresolved state: values pass through
/// structurally, never failing.
///

#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    Primitive(PrimitiveKind),
    Enum(EnumIdx),
    Entity(EntityIdx),
    Opaque,
}

impl FieldKind {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Opaque)
    }
}

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("duplicate type name '{qualified}' declared across the API")]
    DuplicateType { qualified: String },

    #[error("inheritance cycle through entity type '{qualified}'")]
    InheritanceCycle { qualified: String },
}

///
/// UnresolvedRef
///
/// One reference the configure pass left opaque; returned by
/// [`Api::audit`] for callers who want unresolved names to fail loudly.
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{context}: unresolved type '{type_name}'")]
pub struct UnresolvedRef {
    pub context: String,
    pub type_name: String,
}

///
/// Api
///
/// Root owner of the whole runtime graph. Everything else is reachable
/// only through it, and nothing is mutated after `build` returns.
///

#[derive(Debug)]
pub struct Api {
    service_root: String,
    version: ProtocolVersion,
    options: ParseOptions,
    overrides: BTreeMap<String, String>,
    schemas: Vec<Schema>,
    entities: Vec<EntityType>,
    enums: Vec<EnumType>,
    callables: Vec<Callable>,
}

impl Api {
    /// Build and configure the runtime graph from a configuration tree.
    pub fn build(config: &ApiConfig) -> Result<Self, BuildError> {
        let mut api = Self {
            service_root: config.service_root.clone(),
            version: config.version,
            options: config.options,
            overrides: config.parser_overrides.clone(),
            schemas: Vec::new(),
            entities: Vec::new(),
            enums: Vec::new(),
            callables: Vec::new(),
        };

        for schema_config in &config.schemas {
            let mut schema = Schema::new(schema_config);

            for entity in &schema_config.entities {
                schema.entities.push(EntityIdx(api.entities.len()));
                api.entities.push(EntityType::new(entity, &schema.namespace));
            }
            for config in &schema_config.enums {
                schema.enums.push(EnumIdx(api.enums.len()));
                api.enums.push(EnumType::new(config, &schema.namespace, api.options));
            }
            for callable in &schema_config.callables {
                schema.callables.push(CallableIdx(api.callables.len()));
                api.callables.push(Callable::new(callable, &schema.namespace));
            }

            api.schemas.push(schema);
        }

        api.check_duplicates()?;
        api.configure()?;

        log::debug!(
            "configured api '{}': {} schema(s), {} entity type(s), {} enum(s), {} callable(s)",
            api.service_root,
            api.schemas.len(),
            api.entities.len(),
            api.enums.len(),
            api.callables.len(),
        );

        Ok(api)
    }

    ///
    /// ACCESS
    ///

    #[must_use]
    pub fn service_root(&self) -> &str {
        &self.service_root
    }

    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    #[must_use]
    pub const fn options(&self) -> ParseOptions {
        self.options
    }

    #[must_use]
    pub fn dialect(&self) -> &'static dyn Dialect {
        dialect_for(self.version)
    }

    #[must_use]
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub(crate) fn entity_at(&self, idx: EntityIdx) -> &EntityType {
        &self.entities[idx.0]
    }

    pub(crate) fn enum_at(&self, idx: EnumIdx) -> &EnumType {
        &self.enums[idx.0]
    }

    ///
    /// LOOKUP
    ///
    /// Qualified names are accepted in both `{namespace}.Name` and
    /// `{alias}.Name` form; when several schemas prefix-match, the longest
    /// matching namespace wins.
    ///

    #[must_use]
    pub fn find_schema<'s, 'q>(&'s self, qualified: &'q str) -> Option<(&'s Schema, &'q str)> {
        let mut best: Option<(usize, &'s Schema, &'q str)> = None;

        for schema in &self.schemas {
            if let Some((len, local)) = schema.match_qualified(qualified)
                && best.as_ref().is_none_or(|(best_len, ..)| len > *best_len)
            {
                best = Some((len, schema, local));
            }
        }

        best.map(|(_, schema, local)| (schema, local))
    }

    #[must_use]
    pub fn entity_type(&self, qualified: &str) -> Option<&EntityType> {
        match self.lookup_type(qualified)? {
            FieldKind::Entity(idx) => Some(self.entity_at(idx)),
            _ => None,
        }
    }

    #[must_use]
    pub fn enum_type(&self, qualified: &str) -> Option<&EnumType> {
        match self.lookup_type(qualified)? {
            FieldKind::Enum(idx) => Some(self.enum_at(idx)),
            _ => None,
        }
    }

    #[must_use]
    pub fn callable(&self, qualified: &str) -> Option<&Callable> {
        let (schema, local) = self.find_schema(qualified)?;

        schema
            .callables
            .iter()
            .map(|idx| &self.callables[idx.0])
            .find(|c| c.name == local)
    }

    /// First entity set with this name across all schemas.
    #[must_use]
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.schemas.iter().find_map(|s| s.entity_set(name))
    }

    /// Resolve a qualified or built-in type name to its parser; `None`
    /// when the name is unknown (callers fall back to pass-through).
    #[must_use]
    pub fn parser_for_type(&self, name: &str) -> Option<TypeParser<'_>> {
        match self.resolve_kind(name) {
            FieldKind::Opaque => None,
            kind => Some(TypeParser { api: self, kind }),
        }
    }

    ///
    /// CONVERSION
    ///

    /// Deserialize a raw payload through the named type, structurally when
    /// the name is unknown.
    #[must_use]
    pub fn deserialize(&self, type_name: &str, raw: &Json) -> Value {
        self.deserialize_kind(self.resolve_kind(type_name), raw)
    }

    /// Serialize a typed value through the named type, structurally when
    /// the name is unknown.
    #[must_use]
    pub fn serialize(&self, type_name: &str, value: &Value) -> Json {
        self.serialize_kind(self.resolve_kind(type_name), value, None)
    }

    pub(crate) fn deserialize_kind(&self, kind: FieldKind, raw: &Json) -> Value {
        match kind {
            FieldKind::Primitive(primitive) => primitive.deserialize(raw),
            FieldKind::Enum(idx) => self.enum_at(idx).deserialize(raw),
            FieldKind::Entity(idx) => self.entity_at(idx).deserialize(self, raw),
            FieldKind::Opaque => Value::from_json(raw),
        }
    }

    pub(crate) fn serialize_kind(
        &self,
        kind: FieldKind,
        value: &Value,
        decimal: Option<DecimalFormat>,
    ) -> Json {
        match kind {
            FieldKind::Primitive(primitive) => primitive.serialize(value, decimal),
            FieldKind::Enum(idx) => self.enum_at(idx).serialize(value),
            FieldKind::Entity(idx) => self.entity_at(idx).serialize(self, value),
            FieldKind::Opaque => value.to_json(),
        }
    }

    ///
    /// AUDIT
    ///

    /// Every reference the configure pass left unresolved. Empty output
    /// means a typo in a type name cannot be hiding behind pass-through.
    #[must_use]
    pub fn audit(&self) -> Vec<UnresolvedRef> {
        let mut out = Vec::new();

        for entity in &self.entities {
            if let Some(base) = &entity.base_name
                && entity.parent.is_none()
            {
                out.push(UnresolvedRef {
                    context: format!("{} (base type)", entity.qualified_name),
                    type_name: base.clone(),
                });
            }

            for field in &entity.fields {
                if !field.kind.is_resolved() {
                    out.push(UnresolvedRef {
                        context: format!("{}/{}", entity.qualified_name, field.name),
                        type_name: field.type_name.clone(),
                    });
                }
            }
        }

        for callable in &self.callables {
            for parameter in &callable.parameters {
                if !parameter.kind.is_resolved() {
                    out.push(UnresolvedRef {
                        context: format!("{}({})", callable.qualified_name, parameter.name),
                        type_name: parameter.type_name.clone(),
                    });
                }
            }
            if let Some(descriptor) = &callable.return_type
                && !descriptor.kind.is_resolved()
            {
                out.push(UnresolvedRef {
                    context: format!("{} (return type)", callable.qualified_name),
                    type_name: descriptor.type_name.clone(),
                });
            }
        }

        for schema in &self.schemas {
            for set in &schema.entity_sets {
                if set.entity.is_none() {
                    out.push(UnresolvedRef {
                        context: format!("entity set '{}'", set.name),
                        type_name: set.entity_type_name.clone(),
                    });
                }
            }
        }

        out
    }

    ///
    /// INTERNAL
    ///

    fn check_duplicates(&self) -> Result<(), BuildError> {
        let mut seen = BTreeSet::new();

        for qualified in self
            .entities
            .iter()
            .map(|e| &e.qualified_name)
            .chain(self.enums.iter().map(|e| &e.qualified_name))
        {
            if !seen.insert(qualified) {
                return Err(BuildError::DuplicateType {
                    qualified: qualified.clone(),
                });
            }
        }

        Ok(())
    }

    // The single wiring pass: resolutions are computed against the fully
    // built arenas first, then applied, so resolution order never matters
    // and forward or cyclic references cost nothing extra.
    fn configure(&mut self) -> Result<(), BuildError> {
        let entity_updates: Vec<(Option<EntityIdx>, Vec<FieldKind>)> = self
            .entities
            .iter()
            .map(|entity| {
                let parent = entity.base_name.as_deref().and_then(|base| {
                    match self.lookup_type(base) {
                        Some(FieldKind::Entity(idx)) => Some(idx),
                        _ => None,
                    }
                });
                let kinds = entity
                    .fields
                    .iter()
                    .map(|field| self.resolve_kind(&field.type_name))
                    .collect();

                (parent, kinds)
            })
            .collect();

        for (entity, (parent, kinds)) in self.entities.iter_mut().zip(entity_updates) {
            entity.parent = parent;
            for (field, kind) in entity.fields.iter_mut().zip(kinds) {
                field.kind = kind;
            }
        }

        self.check_inheritance_cycles()?;

        let callable_updates: Vec<(Vec<FieldKind>, Option<FieldKind>)> = self
            .callables
            .iter()
            .map(|callable| {
                let parameters = callable
                    .parameters
                    .iter()
                    .map(|p| self.resolve_kind(&p.type_name))
                    .collect();
                let return_kind = callable
                    .return_type
                    .as_ref()
                    .map(|r| self.resolve_kind(&r.type_name));

                (parameters, return_kind)
            })
            .collect();

        for (callable, (parameters, return_kind)) in
            self.callables.iter_mut().zip(callable_updates)
        {
            for (parameter, kind) in callable.parameters.iter_mut().zip(parameters) {
                parameter.kind = kind;
            }
            if let (Some(descriptor), Some(kind)) = (&mut callable.return_type, return_kind) {
                descriptor.kind = kind;
            }
        }

        let set_updates: Vec<(Vec<Option<EntityIdx>>, Vec<Option<EntityIdx>>)> = self
            .schemas
            .iter()
            .map(|schema| {
                let sets = schema
                    .entity_sets
                    .iter()
                    .map(|s| self.resolve_entity(&s.entity_type_name))
                    .collect();
                let singletons = schema
                    .singletons
                    .iter()
                    .map(|s| self.resolve_entity(&s.entity_type_name))
                    .collect();

                (sets, singletons)
            })
            .collect();

        for (schema, (sets, singletons)) in self.schemas.iter_mut().zip(set_updates) {
            for (set, entity) in schema.entity_sets.iter_mut().zip(sets) {
                set.entity = entity;
            }
            for (singleton, entity) in schema.singletons.iter_mut().zip(singletons) {
                singleton.entity = entity;
            }
        }

        Ok(())
    }

    fn check_inheritance_cycles(&self) -> Result<(), BuildError> {
        for (idx, entity) in self.entities.iter().enumerate() {
            let mut cursor = EntityIdx(idx);
            for _ in 0..=self.entities.len() {
                match self.entity_at(cursor).parent {
                    Some(parent) => cursor = parent,
                    None => break,
                }
            }

            if self.entity_at(cursor).parent.is_some() {
                return Err(BuildError::InheritanceCycle {
                    qualified: entity.qualified_name.clone(),
                });
            }
        }

        Ok(())
    }

    fn resolve_kind(&self, type_name: &str) -> FieldKind {
        if let Some(primitive) = self.override_for(type_name) {
            return FieldKind::Primitive(primitive);
        }
        if let Some(primitive) = PrimitiveKind::lookup(type_name) {
            return FieldKind::Primitive(primitive);
        }

        self.lookup_type(type_name).unwrap_or(FieldKind::Opaque)
    }

    fn resolve_entity(&self, type_name: &str) -> Option<EntityIdx> {
        match self.lookup_type(type_name) {
            Some(FieldKind::Entity(idx)) => Some(idx),
            _ => None,
        }
    }

    fn lookup_type(&self, qualified: &str) -> Option<FieldKind> {
        let (schema, local) = self.find_schema(qualified)?;

        if let Some(idx) = schema
            .entities
            .iter()
            .copied()
            .find(|idx| self.entities[idx.0].name == local)
        {
            return Some(FieldKind::Entity(idx));
        }

        schema
            .enums
            .iter()
            .copied()
            .find(|idx| self.enums[idx.0].name == local)
            .map(FieldKind::Enum)
    }

    // Overrides are declared against canonical `{namespace}.{name}` keys;
    // alias-form lookups normalize before the map probe.
    fn override_for(&self, type_name: &str) -> Option<PrimitiveKind> {
        if self.overrides.is_empty() {
            return None;
        }

        let declared = self.overrides.get(type_name).or_else(|| {
            let (schema, local) = self.find_schema(type_name)?;
            self.overrides.get(&format!("{}.{local}", schema.namespace))
        })?;

        PrimitiveKind::lookup(declared)
    }
}

///
/// TypeParser
///
/// A borrow of the arena plus one resolved kind; the cheap handle every
/// recursive serialize/deserialize call passes around.
///

#[derive(Clone, Copy)]
pub struct TypeParser<'a> {
    api: &'a Api,
    kind: FieldKind,
}

impl TypeParser<'_> {
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn deserialize(&self, raw: &Json) -> Value {
        self.api.deserialize_kind(self.kind, raw)
    }

    #[must_use]
    pub fn serialize(&self, value: &Value) -> Json {
        self.api.serialize_kind(self.kind, value, None)
    }
}
