use serde::{Deserialize, Serialize};

///
/// ContainerConfig
///
/// Declared entity container: the addressable surface of a schema.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ContainerConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_sets: Vec<EntitySetConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub singletons: Vec<SingletonConfig>,
}

impl ContainerConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn entity_set(
        mut self,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        self.entity_sets.push(EntitySetConfig {
            name: name.into(),
            entity_type: entity_type.into(),
        });
        self
    }

    #[must_use]
    pub fn singleton(mut self, name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        self.singletons.push(SingletonConfig {
            name: name.into(),
            entity_type: entity_type.into(),
        });
        self
    }

    #[must_use]
    pub fn get_entity_set(&self, name: &str) -> Option<&EntitySetConfig> {
        self.entity_sets.iter().find(|s| s.name == name)
    }
}

///
/// EntitySetConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntitySetConfig {
    pub name: String,

    /// Qualified name of the bound entity type.
    pub entity_type: String,
}

///
/// SingletonConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SingletonConfig {
    pub name: String,
    pub entity_type: String,
}
