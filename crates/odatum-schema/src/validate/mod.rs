//! Structural validation of a configuration tree.
//!
//! Validation is advisory: the runtime graph stays permissive about
//! unresolved names, but running this pass catches declaration drift
//! (duplicates, empty identifiers) before an `Api` is ever built.

pub mod naming;

use crate::node::ApiConfig;
use derive_more::Display;

/// Collect a formatted complaint into an [`ErrorList`].
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

///
/// ErrorList
///
/// Flat accumulator; validation walks the whole tree and reports every
/// complaint at once rather than stopping at the first.
///

#[derive(Clone, Debug, Default, Display, Eq, PartialEq)]
#[display("{}", errors.join("; "))]
pub struct ErrorList {
    errors: Vec<String>,
}

impl ErrorList {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::error::Error for ErrorList {}

/// Run every validation pass over a configuration tree in a deterministic
/// order.
pub fn validate_api(api: &ApiConfig) -> Result<(), ErrorList> {
    let mut errs = ErrorList::new();

    for schema in &api.schemas {
        naming::validate_schema_naming(schema, &mut errs);
    }
    naming::validate_namespace_uniqueness(api, &mut errs);

    errs.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EntityConfig, FieldConfig, SchemaConfig};
    use crate::types::ProtocolVersion;

    #[test]
    fn clean_tree_passes() {
        let api = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
            SchemaConfig::new("Demo")
                .entity(EntityConfig::new("Person").field(FieldConfig::new("Id", "Edm.Int32").key())),
        );

        assert!(validate_api(&api).is_ok());
    }

    #[test]
    fn every_complaint_is_collected() {
        let api = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
            SchemaConfig::new("")
                .entity(EntityConfig::new("Dup"))
                .entity(EntityConfig::new("Dup")),
        );

        let errs = validate_api(&api).unwrap_err();
        assert_eq!(errs.len(), 2, "expected empty-namespace and duplicate-name complaints");
    }
}
