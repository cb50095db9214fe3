use serde::{Deserialize, Serialize};
use std::ops::Not;

///
/// EntityConfig
///
/// Declared entity or complex type. Field order is declaration order and is
/// preserved through the runtime graph.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityConfig {
    pub name: String,

    /// Qualified name of the base type, unresolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub open_type: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
}

impl EntityConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    #[must_use]
    pub fn open(mut self) -> Self {
        self.open_type = true;
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields declared as part of the key, in declaration order.
    #[must_use]
    pub fn key_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.key)
            .map(|f| f.name.as_str())
            .collect()
    }
}

///
/// FieldConfig
///
/// One declared property. `type_name` stays a declarative wire name here;
/// resolution to a parser happens in the runtime graph's configure pass.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FieldConfig {
    pub name: String,
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub collection: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub key: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub navigation: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Declared default, kept in its literal string form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl FieldConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn key(mut self) -> Self {
        self.key = true;
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    #[must_use]
    pub fn navigation(mut self) -> Self {
        self.navigation = true;
        self
    }

    #[must_use]
    pub fn not_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn with_facets(mut self, precision: Option<u32>, scale: Option<u32>) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_fields_preserve_declaration_order() {
        let entity = EntityConfig::new("Order")
            .field(FieldConfig::new("Region", "Edm.String").key())
            .field(FieldConfig::new("Seq", "Edm.Int32").key())
            .field(FieldConfig::new("Note", "Edm.String"));

        assert_eq!(entity.key_fields(), ["Region", "Seq"]);
    }

    #[test]
    fn key_builder_clears_nullable() {
        let field = FieldConfig::new("Id", "Edm.Int32").key();

        assert!(field.key);
        assert!(!field.nullable, "key fields are never nullable");
    }
}
