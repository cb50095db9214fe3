//! Built-in primitive codecs.
//!
//! One row per `Edm.*` primitive, every row carrying the same
//! deserialize/serialize capability. Resolution during the configure pass
//! picks a row once; the hot path is a plain match. Codecs are tolerant:
//! a wire shape that cannot be refined passes through structurally instead
//! of failing, and `null` always passes through unchanged.

mod temporal;

#[cfg(test)]
mod tests;

pub(crate) use temporal::{format_date, format_datetime, format_duration, format_time};

use crate::value::Value;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use derive_more::Display;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde_json::{Number, Value as Json};
use std::str::FromStr;

///
/// PrimitiveKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTime,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    String,
    TimeOfDay,
}

///
/// DecimalFormat
///
/// Precision/scale facets applied when the compatibility flag asks for
/// string-formatted decimals.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalFormat {
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl PrimitiveKind {
    /// Resolve a declared wire type name to its codec. Accepts the name
    /// with or without the `Edm.` prefix; older dialect spellings
    /// (`DateTime`, `Time`) map onto their modern rows.
    #[must_use]
    pub fn lookup(wire_name: &str) -> Option<Self> {
        let local = wire_name.strip_prefix("Edm.").unwrap_or(wire_name);

        match local {
            "Binary" => Some(Self::Binary),
            "Boolean" => Some(Self::Boolean),
            "Byte" => Some(Self::Byte),
            "Date" => Some(Self::Date),
            "DateTime" | "DateTimeOffset" => Some(Self::DateTime),
            "Decimal" => Some(Self::Decimal),
            "Double" => Some(Self::Double),
            "Duration" => Some(Self::Duration),
            "Guid" => Some(Self::Guid),
            "Int16" => Some(Self::Int16),
            "Int32" => Some(Self::Int32),
            "Int64" => Some(Self::Int64),
            "SByte" => Some(Self::SByte),
            "Single" => Some(Self::Single),
            "String" => Some(Self::String),
            "Time" | "TimeOfDay" => Some(Self::TimeOfDay),
            _ => None,
        }
    }

    /// Refine a raw wire value into its typed form.
    #[must_use]
    pub fn deserialize(self, raw: &Json) -> Value {
        if raw.is_null() {
            return Value::Null;
        }

        let refined = match self {
            Self::Binary => raw
                .as_str()
                .and_then(|s| STANDARD.decode(s).ok())
                .map(Value::Binary),

            Self::Boolean => match raw {
                Json::Bool(v) => Some(Value::Bool(*v)),
                Json::String(s) => s.parse::<bool>().ok().map(Value::Bool),
                _ => None,
            },

            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64 => match raw {
                Json::Number(n) => n.as_i64().map(Value::Int),
                Json::String(s) => s.parse::<i64>().ok().map(Value::Int),
                _ => None,
            },

            Self::Single | Self::Double => match raw {
                Json::Number(n) => n.as_f64().map(Value::Float),
                Json::String(s) => parse_float_token(s).map(Value::Float),
                _ => None,
            },

            Self::Decimal => match raw {
                Json::Number(n) => Decimal::from_str(&n.to_string()).ok().map(Value::Decimal),
                Json::String(s) => Decimal::from_str(s).ok().map(Value::Decimal),
                _ => None,
            },

            Self::Guid => raw
                .as_str()
                .and_then(|s| uuid::Uuid::parse_str(s).ok())
                .map(Value::Guid),

            Self::String => raw.as_str().map(|s| Value::Text(s.to_string())),

            Self::Date => raw.as_str().and_then(temporal::parse_date).map(Value::Date),

            Self::TimeOfDay => raw
                .as_str()
                .and_then(temporal::parse_time)
                .map(Value::TimeOfDay),

            Self::DateTime => raw
                .as_str()
                .and_then(temporal::parse_datetime)
                .map(Value::DateTime),

            Self::Duration => raw
                .as_str()
                .and_then(temporal::parse_duration)
                .map(Value::Duration),
        };

        refined.unwrap_or_else(|| Value::from_json(raw))
    }

    /// Render a typed value back to its wire form. `decimal` carries the
    /// field's facets when compatibility formatting is on; only the
    /// `Decimal` row reads it.
    #[must_use]
    pub fn serialize(self, value: &Value, decimal: Option<DecimalFormat>) -> Json {
        if value.is_null() {
            return Json::Null;
        }

        match (self, value) {
            (Self::Decimal, _) => serialize_decimal(value, decimal),

            (Self::Single | Self::Double, Value::Float(f)) => float_to_json(*f),

            // the remaining refined variants already render canonically
            _ => value.to_json(),
        }
    }
}

fn serialize_decimal(value: &Value, format: Option<DecimalFormat>) -> Json {
    let Some(format) = format else {
        return value.to_json();
    };

    let decimal = match value {
        Value::Decimal(d) => Some(*d),
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::from_f64(*f),
        Value::Text(s) => Decimal::from_str(s).ok(),
        _ => None,
    };
    let Some(decimal) = decimal else {
        return value.to_json();
    };

    let rounded = format
        .precision
        .and_then(|digits| decimal.round_sf(digits))
        .unwrap_or(decimal);

    let text = match format.scale {
        Some(scale) => format!("{rounded:.prec$}", prec = scale as usize),
        None => rounded.to_string(),
    };

    Json::String(text)
}

// INF / -INF / NaN travel as tokens; finite floats as numbers.
pub(crate) fn float_to_json(value: f64) -> Json {
    if value.is_nan() {
        Json::String("NaN".to_string())
    } else if value == f64::INFINITY {
        Json::String("INF".to_string())
    } else if value == f64::NEG_INFINITY {
        Json::String("-INF".to_string())
    } else {
        Number::from_f64(value).map_or(Json::Null, Json::Number)
    }
}

fn parse_float_token(raw: &str) -> Option<f64> {
    match raw {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => raw.parse::<f64>().ok(),
    }
}
