//! Pure reductions from document nodes to configuration records.
//!
//! Each node reduces itself using only its own subtree; no network access
//! and no cross-schema lookups. The V2 association indirection is the one
//! place a node consults its owning schema element, and only to read
//! sibling declarations.

use crate::document::*;
use odatum_schema::node::{
    ApiConfig, CallableConfig, ContainerConfig, EntityConfig, EnumConfig, FieldConfig,
    ParameterConfig, ReturnConfig, SchemaConfig,
};
use odatum_schema::types::CallableKind;

impl Document {
    /// Reduce the whole document to an [`ApiConfig`] rooted at
    /// `service_root`.
    #[must_use]
    pub fn to_config(&self, service_root: &str) -> ApiConfig {
        let mut api = ApiConfig::new(service_root, self.version);

        for schema in &self.schemas {
            for def in &schema.type_definitions {
                api.parser_overrides.insert(
                    format!("{}.{}", schema.namespace, def.name),
                    def.underlying_type.clone(),
                );
            }
            api.schemas.push(schema.to_config());
        }

        api
    }
}

impl SchemaElement {
    #[must_use]
    pub fn to_config(&self) -> SchemaConfig {
        let mut schema = SchemaConfig::new(self.namespace.clone());
        schema.alias = self.alias.clone();

        for entity in &self.entity_types {
            schema.entities.push(entity.to_config(self));
        }
        for complex in &self.complex_types {
            schema.entities.push(complex.to_config(self));
        }
        for config in &self.enum_types {
            schema.enums.push(config.to_config());
        }

        for function in &self.functions {
            schema.push_callable(function.to_config(CallableKind::Function));
        }
        for action in &self.actions {
            schema.push_callable(action.to_config(CallableKind::Action));
        }

        for container in &self.containers {
            // V2-flavor imports declare their operation inline rather than
            // referencing a schema-level one
            for import in &container.function_imports {
                if let Some(callable) = import.to_config(CallableKind::Function) {
                    schema.push_callable(callable);
                }
            }
            for import in &container.action_imports {
                if let Some(callable) = import.to_config(CallableKind::Action) {
                    schema.push_callable(callable);
                }
            }
            schema.containers.push(container.to_config());
        }

        schema
    }
}

impl StructuredTypeElement {
    #[must_use]
    pub fn to_config(&self, schema: &SchemaElement) -> EntityConfig {
        let mut entity = EntityConfig::new(self.name.clone());
        entity.base_type = self.base_type.clone();
        entity.open_type = self.open_type;

        for property in &self.properties {
            let (type_name, collection) = unwrap_collection(&property.type_name);
            entity.fields.push(FieldConfig {
                name: property.name.clone(),
                type_name: type_name.to_string(),
                nullable: property.nullable,
                collection,
                key: self.key.iter().any(|k| k == &property.name),
                navigation: false,
                precision: property.precision,
                scale: property.scale,
                max_length: property.max_length,
                default_value: property.default_value.clone(),
            });
        }

        for navigation in &self.navigations {
            let (type_name, collection) = navigation.target_type(schema);
            entity.fields.push(FieldConfig {
                name: navigation.name.clone(),
                type_name,
                nullable: navigation.nullable,
                collection,
                key: false,
                navigation: true,
                precision: None,
                scale: None,
                max_length: None,
                default_value: None,
            });
        }

        entity
    }
}

impl NavigationElement {
    // V4 carries the target type inline; V2 routes through an association
    // end. An unresolvable relationship keeps its raw name and is left for
    // the runtime graph's pass-through handling.
    fn target_type(&self, schema: &SchemaElement) -> (String, bool) {
        if let Some(declared) = &self.type_name {
            let (inner, collection) = unwrap_collection(declared);
            return (inner.to_string(), collection);
        }

        let relationship = self.relationship.as_deref().unwrap_or_default();
        let local = relationship.rsplit('.').next().unwrap_or(relationship);

        let end = schema
            .associations
            .iter()
            .find(|a| a.name == local)
            .and_then(|a| match &self.to_role {
                Some(role) => a.ends.iter().find(|e| &e.role == role),
                None => a.ends.last(),
            });

        match end {
            Some(end) => (
                end.entity_type.clone(),
                end.multiplicity.as_deref() == Some("*"),
            ),
            None => (relationship.to_string(), false),
        }
    }
}

impl EnumTypeElement {
    #[must_use]
    pub fn to_config(&self) -> EnumConfig {
        let mut config = EnumConfig::new(self.name.clone());
        config.flags = self.flags;
        config.underlying_type = self.underlying_type.clone();

        for (name, value) in &self.members {
            config = match value {
                Some(value) => config.member(name.clone(), *value),
                None => config.auto_member(name.clone()),
            };
        }

        config
    }
}

impl CallableElement {
    #[must_use]
    pub fn to_config(&self, kind: CallableKind) -> CallableConfig {
        CallableConfig {
            name: self.name.clone(),
            kind,
            bound: self.bound,
            composable: self.composable,
            entity_set_path: self.entity_set_path.clone(),
            parameters: self.parameters.iter().map(ParameterElement::to_config).collect(),
            return_type: self.return_type.as_ref().map(ReturnElement::to_config),
        }
    }
}

impl ParameterElement {
    fn to_config(&self) -> ParameterConfig {
        let (type_name, collection) = unwrap_collection(&self.type_name);

        ParameterConfig {
            name: self.name.clone(),
            type_name: type_name.to_string(),
            nullable: self.nullable,
            collection,
        }
    }
}

impl ReturnElement {
    fn to_config(&self) -> ReturnConfig {
        let (type_name, collection) = unwrap_collection(&self.type_name);

        ReturnConfig {
            type_name: type_name.to_string(),
            collection,
            nullable: self.nullable,
        }
    }
}

impl ImportElement {
    // Imports that only alias a schema-level callable reduce to nothing;
    // the aliased declaration is already in the schema.
    #[must_use]
    pub fn to_config(&self, kind: CallableKind) -> Option<CallableConfig> {
        if self.target.is_some() || (self.parameters.is_empty() && self.return_type.is_none()) {
            return None;
        }

        Some(CallableConfig {
            name: self.name.clone(),
            kind,
            bound: false,
            composable: false,
            entity_set_path: self.entity_set.clone(),
            parameters: self.parameters.iter().map(ParameterElement::to_config).collect(),
            return_type: self.return_type.as_ref().map(ReturnElement::to_config),
        })
    }
}

impl ContainerElement {
    #[must_use]
    pub fn to_config(&self) -> ContainerConfig {
        let mut container = ContainerConfig::new(self.name.clone());

        for set in &self.entity_sets {
            container = container.entity_set(set.name.clone(), set.entity_type.clone());
        }
        for singleton in &self.singletons {
            container = container.singleton(singleton.name.clone(), singleton.entity_type.clone());
        }

        container
    }
}

/// Split a declared type into its element type and collection flag.
#[must_use]
pub fn unwrap_collection(declared: &str) -> (&str, bool) {
    declared
        .strip_prefix("Collection(")
        .and_then(|rest| rest.strip_suffix(')'))
        .map_or((declared, false), |inner| (inner, true))
}
