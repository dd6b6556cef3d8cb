use serde::{Deserialize, Serialize};

/// Catalog entry for outcome classification codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispositionType {
    #[serde(rename = "typeCode")]
    pub type_code: String,
    pub description: String,
}

/// Body for `POST /dispositions`, recorded once per booking when it reaches
/// the terminal status. An empty type code means "unset".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDisposition {
    #[serde(rename = "bookingId")]
    pub booking_id: i64,
    #[serde(rename = "dispositionType")]
    pub disposition_type: String,
    pub note: String,
}
