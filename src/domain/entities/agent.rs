use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Availability verdict computed by the search endpoint for one agent in one
/// time window. Anything other than `available` keeps the reason string the
/// server produced (time-off, missing timesheet, already booked, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl From<String> for Availability {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("available") {
            Availability::Available
        } else {
            Availability::Unavailable(s)
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Unavailable(reason) => write!(f, "{}", reason),
        }
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Availability::from(String::deserialize(deserializer)?))
    }
}

// Older API builds serialize the computed distance as a decimal string.
fn distance_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid distance value: {}", s))),
    }
}

/// One candidate returned by the nearest-available-agent search. This is a
/// projection for assignment, not the full agent profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCandidate {
    #[serde(rename = "agentId")]
    pub agent_id: i64,
    pub name: String,
    #[serde(deserialize_with = "distance_from_number_or_string")]
    pub distance: f64,
    pub availability_status: Availability,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub unavailable_reason: Option<String>,
}

impl AgentCandidate {
    /// Kilometers as shown anywhere a distance is displayed: always rounded
    /// up, so the label never understates the drive.
    pub fn display_distance_km(&self) -> u32 {
        self.distance.ceil() as u32
    }
}

/// Query parameters for the nearest-available-agent search: where the work
/// is, and the time window it occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub booking_date: chrono::NaiveDate,
    pub booking_time: chrono::NaiveTime,
}

/// The subset of a search result a user may actually assign. Candidates with
/// any other status stay in the cached result for diagnostics only.
pub fn assignable_candidates(candidates: &[AgentCandidate]) -> Vec<AgentCandidate> {
    candidates
        .iter()
        .filter(|c| c.availability_status.is_available())
        .cloned()
        .collect()
}
