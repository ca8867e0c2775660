//! Record lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The lifecycle status of a record.
///
/// Any status may transition to any other through an update; deletion is
/// the only terminal transition and is not represented as a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Current and in force.
    #[default]
    Active,
    /// Retained for reference only.
    Archived,
    /// Pending review before publication or change.
    #[serde(rename = "Under Review", alias = "UnderReview")]
    UnderReview,
}

impl RecordStatus {
    /// Every status, in declaration order.
    pub const ALL: [RecordStatus; 3] = [Self::Active, Self::Archived, Self::UnderReview];

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archived => "Archived",
            Self::UnderReview => "Under Review",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = openwatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "underreview" => Ok(Self::UnderReview),
            _ => Err(openwatch_core::AppError::validation(format!(
                "Invalid record status: '{s}'. Expected one of: Active, Archived, Under Review"
            ))),
        }
    }
}
