use crate::{
    api::{Api, FieldKind},
    value::Value,
};
use odatum_schema::{
    node::{CallableConfig, ParameterConfig, ReturnConfig},
    types::CallableKind,
};
use serde_json::{Map, Value as Json};

/// Reserved name of the implicit first parameter of a bound operation.
pub const BINDING_PARAMETER: &str = "bindingParameter";

///
/// Callable
///
/// Runtime function or action: parameter descriptors and the return
/// descriptor, each resolved to a nested parser by the configure pass.
///

#[derive(Debug)]
pub struct Callable {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) kind: CallableKind,
    pub(crate) bound: bool,
    pub(crate) composable: bool,
    pub(crate) entity_set_path: Option<String>,
    pub(crate) parameters: Vec<CallableParameter>,
    pub(crate) return_type: Option<CallableReturn>,
}

impl Callable {
    pub(crate) fn new(config: &CallableConfig, namespace: &str) -> Self {
        Self {
            name: config.name.clone(),
            qualified_name: format!("{namespace}.{}", config.name),
            kind: config.kind,
            bound: config.bound,
            composable: config.composable,
            entity_set_path: config.entity_set_path.clone(),
            parameters: config.parameters.iter().map(CallableParameter::new).collect(),
            return_type: config.return_type.as_ref().map(CallableReturn::new),
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
    pub const fn kind(&self) -> CallableKind {
        self.kind
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    #[must_use]
    pub const fn is_composable(&self) -> bool {
        self.composable
    }

    #[must_use]
    pub fn parameters(&self) -> &[CallableParameter] {
        &self.parameters
    }

    #[must_use]
    pub const fn return_type(&self) -> Option<&CallableReturn> {
        self.return_type.as_ref()
    }

    /// The binding parameter of a bound operation, identified by its
    /// reserved name rather than a flag.
    #[must_use]
    pub fn binding_parameter(&self) -> Option<&CallableParameter> {
        if !self.bound {
            return None;
        }

        self.parameters
            .first()
            .filter(|p| p.name == BINDING_PARAMETER)
    }

    /// Parameters the caller supplies; the binding parameter is implicit.
    #[must_use]
    pub fn invocation_parameters(&self) -> Vec<&CallableParameter> {
        self.parameters
            .iter()
            .filter(|p| !(self.bound && p.name == BINDING_PARAMETER))
            .collect()
    }

    /// Serialize an argument object for dispatch. Arguments without a
    /// matching parameter descriptor pass through structurally.
    #[must_use]
    pub fn serialize_arguments(&self, api: &Api, arguments: &Value) -> Json {
        let Value::Object(entries) = arguments else {
            return arguments.to_json();
        };

        let mut out = Map::new();
        for (name, value) in entries {
            let serialized = match self.parameters.iter().find(|p| &p.name == name) {
                Some(parameter) => parameter.serialize(api, value),
                None => value.to_json(),
            };
            out.insert(name.clone(), serialized);
        }

        Json::Object(out)
    }

    /// Deserialize a raw invocation result through the return descriptor;
    /// pass-through when no return type is declared.
    #[must_use]
    pub fn deserialize_return(&self, api: &Api, raw: &Json) -> Value {
        match &self.return_type {
            Some(descriptor) => descriptor.deserialize(api, raw),
            None => Value::from_json(raw),
        }
    }
}

///
/// CallableParameter
///

#[derive(Debug)]
pub struct CallableParameter {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) nullable: bool,
    pub(crate) collection: bool,
    pub(crate) kind: FieldKind,
}

impl CallableParameter {
    fn new(config: &ParameterConfig) -> Self {
        Self {
            name: config.name.clone(),
            type_name: config.type_name.clone(),
            nullable: config.nullable,
            collection: config.collection,
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
    pub const fn is_collection(&self) -> bool {
        self.collection
    }

    fn serialize(&self, api: &Api, value: &Value) -> Json {
        if value.is_null() {
            return Json::Null;
        }

        if self.collection {
            if let Value::List(items) = value {
                return Json::Array(
                    items
                        .iter()
                        .map(|item| api.serialize_kind(self.kind, item, None))
                        .collect(),
                );
            }
            return value.to_json();
        }

        api.serialize_kind(self.kind, value, None)
    }
}

///
/// CallableReturn
///

#[derive(Debug)]
pub struct CallableReturn {
    pub(crate) type_name: String,
    pub(crate) nullable: bool,
    pub(crate) collection: bool,
    pub(crate) kind: FieldKind,
}

impl CallableReturn {
    fn new(config: &ReturnConfig) -> Self {
        Self {
            type_name: config.type_name.clone(),
            nullable: config.nullable,
            collection: config.collection,
            kind: FieldKind::Opaque,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.collection
    }

    fn deserialize(&self, api: &Api, raw: &Json) -> Value {
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
}
