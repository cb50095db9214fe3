use crate::value::Value;
use odatum_schema::node::{EnumConfig, ParseOptions};
use serde_json::{Number, Value as Json};

///
/// EnumType
///
/// Member table plus the bit/value codec. Members are held sorted by
/// descending value so flags serialization consumes the widest members
/// first; declaration order carries no meaning for enums.
///

#[derive(Debug)]
pub struct EnumType {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) flags: bool,
    pub(crate) string_as_enum: bool,
    pub(crate) members: Vec<EnumMember>,
}

///
/// EnumMember
///

#[derive(Clone, Debug)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

impl EnumType {
    pub(crate) fn new(config: &EnumConfig, namespace: &str, options: ParseOptions) -> Self {
        let mut members: Vec<EnumMember> = config
            .members
            .iter()
            .map(|m| EnumMember {
                name: m.name.clone(),
                value: m.value,
            })
            .collect();
        members.sort_by(|a, b| b.value.cmp(&a.value));

        Self {
            name: config.name.clone(),
            qualified_name: format!("{namespace}.{}", config.name),
            flags: config.flags,
            string_as_enum: options.string_as_enum,
            members,
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
    pub const fn is_flags(&self) -> bool {
        self.flags
    }

    #[must_use]
    pub fn value_of(&self, member: &str) -> Option<i64> {
        self.members
            .iter()
            .find(|m| m.name == member)
            .map(|m| m.value)
    }

    /// Decode a raw integer or a comma/space-joined member-name list into
    /// the numeric value; flags enums OR the member bits together. Unknown
    /// member names pass through unchanged.
    #[must_use]
    pub fn deserialize(&self, raw: &Json) -> Value {
        match raw {
            Json::Null => Value::Null,
            Json::Number(n) => n.as_i64().map_or_else(|| Value::from_json(raw), Value::Int),
            Json::String(s) => self
                .parse_names(s)
                .map_or_else(|| Value::Text(s.clone()), Value::Int),
            _ => Value::from_json(raw),
        }
    }

    /// Encode back to the wire: member-name strings in string-as-enum
    /// mode, the raw number otherwise. Bits no member covers fall back to
    /// the number.
    #[must_use]
    pub fn serialize(&self, value: &Value) -> Json {
        let bits = match value {
            Value::Null => return Json::Null,
            Value::Int(bits) => *bits,
            Value::Text(names) => match self.parse_names(names) {
                Some(bits) => bits,
                None => return value.to_json(),
            },
            _ => return value.to_json(),
        };

        if self.string_as_enum
            && let Some(names) = self.names_for(bits)
        {
            return Json::String(names);
        }

        Json::Number(Number::from(bits))
    }

    // Accepts "Red, Blue", "Red Blue", a stray integer, and the quoted
    // literal form "Demo.Color'Red,Blue'".
    fn parse_names(&self, raw: &str) -> Option<i64> {
        let inner = match (raw.find('\''), raw.ends_with('\'')) {
            (Some(open), true) if open + 1 < raw.len() => &raw[open + 1..raw.len() - 1],
            _ => raw,
        };

        if let Ok(number) = inner.parse::<i64>() {
            return Some(number);
        }

        let parts: Vec<&str> = inner
            .split([',', ' '])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() || (!self.flags && parts.len() > 1) {
            return None;
        }

        let mut bits = 0;
        for part in parts {
            bits |= self.value_of(part)?;
        }

        Some(bits)
    }

    // Widest members claim their bits first; output lists names in
    // ascending value order.
    fn names_for(&self, bits: i64) -> Option<String> {
        if bits == 0 {
            return self
                .members
                .iter()
                .find(|m| m.value == 0)
                .map(|m| m.name.clone());
        }

        if !self.flags {
            return self
                .members
                .iter()
                .find(|m| m.value == bits)
                .map(|m| m.name.clone());
        }

        let mut remaining = bits;
        let mut picked = Vec::new();

        for member in &self.members {
            if member.value != 0 && remaining & member.value == member.value {
                picked.push(member.name.as_str());
                remaining &= !member.value;
            }
        }

        if remaining != 0 {
            return None;
        }

        picked.reverse();
        Some(picked.join(", "))
    }
}
