use serde::{Deserialize, Serialize};

/// Access-scoping grouping for bookings and teams. A global region is visible
/// to every team; any other region restricts visibility to its own teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "regionId")]
    pub region_id: i64,
    pub name: String,
    #[serde(default)]
    pub is_global: bool,
}
