use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Risk classification of a shift, fixed once at issuance.
///
/// The string values are an external vocabulary consumed by clients for
/// color rendering. New tiers get new values; existing ones never change
/// meaning. Ordering follows severity: `Green < Yellow < Red`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Green,
    Yellow,
    Red,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            other => Err(TypeError::UnknownTier(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(RiskTier::Green < RiskTier::Yellow);
        assert!(RiskTier::Yellow < RiskTier::Red);
    }

    #[test]
    fn wire_values_are_stable() {
        assert_eq!(serde_json::to_string(&RiskTier::Green).unwrap(), "\"green\"");
        assert_eq!(serde_json::to_string(&RiskTier::Yellow).unwrap(), "\"yellow\"");
        assert_eq!(serde_json::to_string(&RiskTier::Red).unwrap(), "\"red\"");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("RED".parse::<RiskTier>().unwrap(), RiskTier::Red);
        assert!("purple".parse::<RiskTier>().is_err());
    }
}
