use crate::node::{CallableConfig, ContainerConfig, EntityConfig, EnumConfig};
use serde::{Deserialize, Serialize};

///
/// SchemaConfig
///
/// One declared namespace. Entity and complex types share `EntityConfig`;
/// a complex type is simply an entity declaration without key fields.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SchemaConfig {
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callables: Vec<CallableConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerConfig>,
}

impl SchemaConfig {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn entity(mut self, entity: EntityConfig) -> Self {
        self.entities.push(entity);
        self
    }

    #[must_use]
    pub fn enumeration(mut self, config: EnumConfig) -> Self {
        self.enums.push(config);
        self
    }

    #[must_use]
    pub fn callable(mut self, callable: CallableConfig) -> Self {
        self.push_callable(callable);
        self
    }

    #[must_use]
    pub fn container(mut self, container: ContainerConfig) -> Self {
        self.containers.push(container);
        self
    }

    /// Add a callable, merging into an existing declaration of the same
    /// name. Overload-style declarations of one operation name union their
    /// parameter maps, last writer wins per parameter.
    pub fn push_callable(&mut self, callable: CallableConfig) {
        match self
            .callables
            .iter_mut()
            .find(|existing| existing.name == callable.name)
        {
            Some(existing) => existing.merge(callable),
            None => self.callables.push(callable),
        }
    }

    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<&EntityConfig> {
        self.entities.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&EnumConfig> {
        self.enums.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ParameterConfig;

    #[test]
    fn push_callable_merges_same_name_declarations() {
        let mut schema = SchemaConfig::new("Demo");

        schema.push_callable(
            CallableConfig::function("Nearest")
                .parameter(ParameterConfig::new("lat", "Edm.Double"))
                .parameter(ParameterConfig::new("lon", "Edm.Double")),
        );
        schema.push_callable(
            CallableConfig::function("Nearest")
                .parameter(ParameterConfig::new("lat", "Edm.Single"))
                .parameter(ParameterConfig::new("radius", "Edm.Double")),
        );

        assert_eq!(schema.callables.len(), 1, "same-name callables must merge");

        let merged = &schema.callables[0];
        let names: Vec<&str> = merged.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["lat", "lon", "radius"]);

        let lat = &merged.parameters[0];
        assert_eq!(lat.type_name, "Edm.Single", "last writer wins per parameter");
    }

    #[test]
    fn push_callable_keeps_distinct_names_separate() {
        let mut schema = SchemaConfig::new("Demo");
        schema.push_callable(CallableConfig::function("A"));
        schema.push_callable(CallableConfig::action("B"));

        assert_eq!(schema.callables.len(), 2);
    }
}
