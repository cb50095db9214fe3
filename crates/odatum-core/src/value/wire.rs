//! Structural conversion between [`Value`] and the JSON wire shape.
//!
//! `from_json` is the untyped fallback every pass-through path shares:
//! it refines nothing, it only mirrors structure. `to_json` is total; the
//! refined variants render to their canonical wire text.

use crate::{codec, value::Value};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Number, Value as Json};

impl Value {
    /// Mirror a raw JSON value structurally, without type refinement.
    #[must_use]
    pub fn from_json(raw: &Json) -> Self {
        match raw {
            Json::Null => Self::Null,
            Json::Bool(v) => Self::Bool(*v),
            Json::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            Json::String(v) => Self::Text(v.clone()),
            Json::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Json::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render to the JSON wire shape.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(v) => Json::Bool(*v),
            Self::Int(v) => Json::Number(Number::from(*v)),
            Self::Float(v) => codec::float_to_json(*v),
            Self::Decimal(v) => {
                // stays numeric when the text form is a valid JSON number
                v.to_string()
                    .parse::<Number>()
                    .map_or_else(|_| Json::String(v.to_string()), Json::Number)
            }
            Self::Text(v) => Json::String(v.clone()),
            Self::Guid(v) => Json::String(v.hyphenated().to_string()),
            Self::Binary(v) => Json::String(STANDARD.encode(v)),
            Self::Date(v) => Json::String(codec::format_date(*v)),
            Self::TimeOfDay(v) => Json::String(codec::format_time(*v)),
            Self::DateTime(v) => Json::String(codec::format_datetime(*v)),
            Self::Duration(v) => Json::String(codec::format_duration(*v)),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Json>>(),
            ),
        }
    }
}
