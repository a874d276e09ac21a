use serde::{Deserialize, Serialize};

/// A printed QR code. The id is the opaque value baked into the printed
/// code; a super admin points it at a hotel after the fact.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QrCode {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    /// Scans are counted in half steps (0.5 per hit), so this is fractional.
    #[serde(default)]
    pub number_of_qr_scans: f64,
}
