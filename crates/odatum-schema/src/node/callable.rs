use crate::types::CallableKind;
use serde::{Deserialize, Serialize};
use std::ops::Not;

///
/// CallableConfig
///
/// Declared function or action. Bound callables receive the instance they
/// are invoked on as a reserved first parameter on the wire.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CallableConfig {
    pub name: String,
    pub kind: CallableKind,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub bound: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub composable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_set_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ReturnConfig>,
}

impl CallableConfig {
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CallableKind::Function,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn action(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CallableKind::Action,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bound(mut self) -> Self {
        self.bound = true;
        self
    }

    #[must_use]
    pub fn composable(mut self) -> Self {
        self.composable = true;
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterConfig) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn returns(mut self, return_type: ReturnConfig) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Union another declaration of the same operation name into this one.
    /// Parameters merge by name, last writer wins; the later declaration's
    /// kind and flags win, and its return descriptor and entity-set path win
    /// when present.
    pub fn merge(&mut self, other: Self) {
        for parameter in other.parameters {
            match self
                .parameters
                .iter_mut()
                .find(|existing| existing.name == parameter.name)
            {
                Some(existing) => *existing = parameter,
                None => self.parameters.push(parameter),
            }
        }

        self.kind = other.kind;
        self.bound = other.bound;
        self.composable = other.composable;

        if other.entity_set_path.is_some() {
            self.entity_set_path = other.entity_set_path;
        }
        if other.return_type.is_some() {
            self.return_type = other.return_type;
        }
    }
}

///
/// ParameterConfig
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ParameterConfig {
    pub name: String,
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub collection: bool,
}

impl ParameterConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }
}

///
/// ReturnConfig
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReturnConfig {
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub collection: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub nullable: bool,
}

impl ReturnConfig {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_unions_parameters_last_writer_wins() {
        let mut base = CallableConfig::function("Score")
            .parameter(ParameterConfig::new("input", "Edm.String"))
            .returns(ReturnConfig::new("Edm.Double"));

        base.merge(
            CallableConfig::function("Score")
                .bound()
                .parameter(ParameterConfig::new("input", "Edm.Int32"))
                .parameter(ParameterConfig::new("weight", "Edm.Double")),
        );

        assert!(base.bound);
        assert_eq!(base.parameters.len(), 2);
        assert_eq!(base.parameters[0].type_name, "Edm.Int32");
        assert_eq!(
            base.return_type.as_ref().map(|r| r.type_name.as_str()),
            Some("Edm.Double"),
            "absent return descriptor must not clobber an earlier one"
        );
    }
}
