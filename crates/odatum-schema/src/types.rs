use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

///
/// ProtocolVersion
///
/// Wire dialect spoken by the remote service. Selects envelope and
/// annotation conventions in `odatum-core`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ProtocolVersion {
    #[display("2.0")]
    V2,
    #[display("3.0")]
    V3,
    #[default]
    #[display("4.0")]
    V4,
}

impl FromStr for ProtocolVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" | "2.0" => Ok(Self::V2),
            "3.0" => Ok(Self::V3),
            "4.0" | "4.01" => Ok(Self::V4),
            _ => Err(UnknownVersion(s.to_string())),
        }
    }
}

///
/// UnknownVersion
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("unknown protocol version '{_0}'")]
pub struct UnknownVersion(pub String);

impl std::error::Error for UnknownVersion {}

///
/// CallableKind
///
/// Functions are side-effect free and composable into paths; actions are
/// invoked with a POST body and never composed.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum CallableKind {
    #[default]
    Function,
    Action,
}

impl CallableKind {
    #[must_use]
    pub const fn is_action(self) -> bool {
        matches!(self, Self::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_every_declared_token() {
        let cases = [
            ("1.0", ProtocolVersion::V2),
            ("2.0", ProtocolVersion::V2),
            ("3.0", ProtocolVersion::V3),
            ("4.0", ProtocolVersion::V4),
            ("4.01", ProtocolVersion::V4),
        ];

        for (token, expected) in cases {
            assert_eq!(
                token.parse::<ProtocolVersion>().unwrap(),
                expected,
                "token {token} parsed to the wrong dialect"
            );
        }
    }

    #[test]
    fn version_rejects_unknown_tokens() {
        assert!("5.0".parse::<ProtocolVersion>().is_err());
        assert!("".parse::<ProtocolVersion>().is_err());
    }
}
