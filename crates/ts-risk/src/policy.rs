use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_types::RiskTier;

/// Category of work a dispatcher may assign.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    MinorCustomer,
    FemaleLateNight,
    LateNightDoorstep,
    IsolatedPickup,
    HighCrimeZone,
    /// Any category with no restriction rules.
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MinorCustomer => "minor_customer",
            Self::FemaleLateNight => "female_late_night",
            Self::LateNightDoorstep => "late_night_doorstep",
            Self::IsolatedPickup => "isolated_pickup",
            Self::HighCrimeZone => "high_crime_zone",
            Self::Other(name) => name,
        }
    }

    fn is_sensitive(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TaskType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor_customer" => Self::MinorCustomer,
            "female_late_night" => Self::FemaleLateNight,
            "late_night_doorstep" => Self::LateNightDoorstep,
            "isolated_pickup" => Self::IsolatedPickup,
            "high_crime_zone" => Self::HighCrimeZone,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskType> for String {
    fn from(task: TaskType) -> Self {
        task.as_str().to_string()
    }
}

impl FromStr for TaskType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// Whether a worker at `tier` must be kept off `task`.
///
/// Red blocks every sensitive category, yellow blocks only minor customers,
/// green blocks nothing. Enforcement belongs to whoever assigns work; this
/// only answers the question.
pub fn restricted(tier: RiskTier, task: &TaskType) -> bool {
    match tier {
        RiskTier::Red => task.is_sensitive(),
        RiskTier::Yellow => *task == TaskType::MinorCustomer,
        RiskTier::Green => false,
    }
}
