//! The closed set of forecast targets

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sensor series that gets its own forecast model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Power draw
    Watt,
    /// Ambient temperature
    Temperature,
    /// Relative humidity
    Humidity,
}

impl Target {
    /// Every target, in the order pipelines visit them
    pub const ALL: [Target; 3] = [Target::Watt, Target::Temperature, Target::Humidity];

    /// Field name of this target in stored readings
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Watt => "watt",
            Target::Temperature => "temperature",
            Target::Humidity => "humidity",
        }
    }

    /// Name of the persisted model artifact for this target
    pub fn artifact_name(&self) -> String {
        format!("model_{}", self.as_str())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ForecastError::InvalidParameter(format!("Unknown target: {}", s)))
    }
}
