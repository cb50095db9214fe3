use crate::api::{CallableIdx, EntityIdx, EnumIdx};
use odatum_schema::node::{ContainerConfig, SchemaConfig};

///
/// Schema
///
/// Runtime view of one namespace: member indices into the `Api` arenas
/// plus the container surface flattened into entity sets and singletons.
///

#[derive(Debug)]
pub struct Schema {
    pub(crate) namespace: String,
    pub(crate) alias: Option<String>,
    pub(crate) entities: Vec<EntityIdx>,
    pub(crate) enums: Vec<EnumIdx>,
    pub(crate) callables: Vec<CallableIdx>,
    pub(crate) entity_sets: Vec<EntitySet>,
    pub(crate) singletons: Vec<Singleton>,
}

impl Schema {
    pub(crate) fn new(config: &SchemaConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            alias: config.alias.clone(),
            entities: Vec::new(),
            enums: Vec::new(),
            callables: Vec::new(),
            entity_sets: config.containers.iter().flat_map(EntitySet::from_container).collect(),
            singletons: config
                .containers
                .iter()
                .flat_map(|c| {
                    c.singletons.iter().map(|s| Singleton {
                        name: s.name.clone(),
                        entity_type_name: s.entity_type.clone(),
                        entity: None,
                    })
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Strip this schema's namespace or alias qualifier from a qualified
    /// name, returning the local part.
    #[must_use]
    pub fn local_name<'a>(&self, qualified: &'a str) -> Option<&'a str> {
        strip_qualifier(qualified, &self.namespace).or_else(|| {
            self.alias
                .as_deref()
                .and_then(|alias| strip_qualifier(qualified, alias))
        })
    }

    /// Longest namespace/alias prefix this schema matches on a qualified
    /// name, with the corresponding local part; used for
    /// longest-namespace disambiguation across schemas.
    #[must_use]
    pub(crate) fn match_qualified<'a>(&self, qualified: &'a str) -> Option<(usize, &'a str)> {
        let via_namespace =
            strip_qualifier(qualified, &self.namespace).map(|local| (self.namespace.len(), local));
        let via_alias = self
            .alias
            .as_deref()
            .and_then(|alias| strip_qualifier(qualified, alias).map(|local| (alias.len(), local)));

        match (via_namespace, via_alias) {
            (Some(ns), Some(al)) => Some(if al.0 > ns.0 { al } else { ns }),
            (ns, al) => ns.or(al),
        }
    }

    #[must_use]
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn singleton(&self, name: &str) -> Option<&Singleton> {
        self.singletons.iter().find(|s| s.name == name)
    }
}

fn strip_qualifier<'a>(qualified: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }

    qualified
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .filter(|local| !local.is_empty())
}

///
/// EntitySet
///

#[derive(Debug)]
pub struct EntitySet {
    pub(crate) name: String,
    pub(crate) entity_type_name: String,
    /// Resolved by the configure pass; `None` when the type stayed unknown.
    pub(crate) entity: Option<EntityIdx>,
}

impl EntitySet {
    fn from_container(container: &ContainerConfig) -> impl Iterator<Item = Self> + '_ {
        container.entity_sets.iter().map(|s| Self {
            name: s.name.clone(),
            entity_type_name: s.entity_type.clone(),
            entity: None,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entity_type_name(&self) -> &str {
        &self.entity_type_name
    }

    #[must_use]
    pub const fn entity(&self) -> Option<EntityIdx> {
        self.entity
    }
}

///
/// Singleton
///

#[derive(Debug)]
pub struct Singleton {
    pub(crate) name: String,
    pub(crate) entity_type_name: String,
    pub(crate) entity: Option<EntityIdx>,
}

impl Singleton {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn entity(&self) -> Option<EntityIdx> {
        self.entity
    }
}
