use serde::{Deserialize, Serialize};
use std::ops::Not;

///
/// EnumConfig
///
/// Declared enumeration. Flags enums combine member values as bitmasks;
/// plain enums hold exactly one member value.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EnumConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub flags: bool,

    /// Declared underlying primitive, `Edm.Int32` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EnumMember>,
}

impl EnumConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_flags(mut self) -> Self {
        self.flags = true;
        self
    }

    /// Add a member with an explicit numeric value.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value,
        });
        self
    }

    /// Add a member numbered after the previous one, starting from zero.
    #[must_use]
    pub fn auto_member(mut self, name: impl Into<String>) -> Self {
        let value = self.members.last().map_or(0, |m| m.value + 1);
        self.members.push(EnumMember {
            name: name.into(),
            value,
        });
        self
    }

    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.members.iter().find(|m| m.name == name).map(|m| m.value)
    }

    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.value == value)
            .map(|m| m.name.as_str())
    }
}

///
/// EnumMember
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}
