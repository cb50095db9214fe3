
use crate::{
    api::{Api, EntityType},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// KeyValue
///
/// A resolved entity key. One required key field degenerates to a bare
/// scalar; two or more stay a name→value map in declaration order.
///

#[derive(Clone, Debug, PartialEq)]
pub enum KeyValue {
    Single(Value),
    Composite(Vec<(String, Value)>),
}

impl KeyValue {
    #[must_use]
    pub fn single(value: impl Into<Value>) -> Self {
        Self::Single(value.into())
    }

    #[must_use]
    pub fn composite<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Composite(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

///
/// KeyError
///
/// Failures surface at the point a key is needed, never as a malformed
/// request path.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("entity type '{entity}' declares no key fields")]
    NoKeyFields { entity: String },

    #[error("key field '{field}' has no value on entity type '{entity}'")]
    MissingField { entity: String, field: String },

    #[error("entity set '{name}' is not declared or its entity type never resolved")]
    UnknownEntitySet { name: String },
}

impl EntityType {
    /// Resolve this type's key from an entity state value. Every key field
    /// across the base chain must carry a non-null value.
    pub fn resolve_key(&self, api: &Api, state: &Value) -> Result<KeyValue, KeyError> {
        let mut entries: Vec<(String, Value)> = Vec::new();

        for field in self.key_fields(api) {
            if entries.iter().any(|(name, _)| name == field.name()) {
                continue;
            }

            let value = state
                .get(field.name())
                .filter(|value| !value.is_null())
                .ok_or_else(|| KeyError::MissingField {
                    entity: self.qualified_name().to_string(),
                    field: field.name().to_string(),
                })?;

            entries.push((field.name().to_string(), value.clone()));
        }

        match entries.len() {
            0 => Err(KeyError::NoKeyFields {
                entity: self.qualified_name().to_string(),
            }),
            1 => Ok(KeyValue::Single(entries.remove(0).1)),
            _ => Ok(KeyValue::Composite(entries)),
        }
    }
}
