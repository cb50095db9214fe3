use crate::{
    err,
    node::{ApiConfig, SchemaConfig},
    validate::ErrorList,
};
use std::collections::BTreeMap;

/// Structural naming checks local to one schema.
pub fn validate_schema_naming(schema: &SchemaConfig, errs: &mut ErrorList) {
    let namespace = schema.namespace.as_str();

    if namespace.is_empty() {
        err!(errs, "schema declared with an empty namespace");
    }

    // type names are one namespace-wide space: entities and enums collide
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for entity in &schema.entities {
        if entity.name.is_empty() {
            err!(errs, "entity in namespace '{namespace}' has an empty name");
            continue;
        }
        if let Some(kind) = seen.insert(entity.name.as_str(), "entity") {
            err!(
                errs,
                "duplicate type name '{}' in namespace '{namespace}' (already declared as {kind})",
                entity.name
            );
        }
    }
    for config in &schema.enums {
        if config.name.is_empty() {
            err!(errs, "enum in namespace '{namespace}' has an empty name");
            continue;
        }
        if let Some(kind) = seen.insert(config.name.as_str(), "enum") {
            err!(
                errs,
                "duplicate type name '{}' in namespace '{namespace}' (already declared as {kind})",
                config.name
            );
        }
    }

    for entity in &schema.entities {
        let mut fields: BTreeMap<&str, ()> = BTreeMap::new();
        for field in &entity.fields {
            if field.name.is_empty() {
                err!(errs, "field on '{namespace}.{}' has an empty name", entity.name);
            } else if fields.insert(field.name.as_str(), ()).is_some() {
                err!(
                    errs,
                    "duplicate field '{}' declared on '{namespace}.{}'",
                    field.name,
                    entity.name
                );
            }
        }
    }

    for config in &schema.enums {
        let mut members: BTreeMap<&str, ()> = BTreeMap::new();
        for member in &config.members {
            if members.insert(member.name.as_str(), ()).is_some() {
                err!(
                    errs,
                    "duplicate member '{}' declared on enum '{namespace}.{}'",
                    member.name,
                    config.name
                );
            }
        }
    }

    for container in &schema.containers {
        let mut sets: BTreeMap<&str, ()> = BTreeMap::new();
        for set in &container.entity_sets {
            if set.entity_type.is_empty() {
                err!(
                    errs,
                    "entity set '{}' in container '{}' has an empty entity type",
                    set.name,
                    container.name
                );
            }
            if sets.insert(set.name.as_str(), ()).is_some() {
                err!(
                    errs,
                    "duplicate entity set '{}' in container '{}'",
                    set.name,
                    container.name
                );
            }
        }
    }
}

/// Namespaces and aliases must be unique across the whole API; qualified
/// name matching depends on it.
pub fn validate_namespace_uniqueness(api: &ApiConfig, errs: &mut ErrorList) {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();

    for schema in &api.schemas {
        if let Some(prev) = seen.insert(schema.namespace.as_str(), "namespace") {
            err!(
                errs,
                "namespace '{}' declared more than once (previously as {prev})",
                schema.namespace
            );
        }
        if let Some(alias) = &schema.alias
            && seen.insert(alias.as_str(), "alias").is_some()
        {
            err!(errs, "alias '{alias}' collides with another namespace or alias");
        }
    }
}
