// QR scan resolution. A printed code carries an opaque id; scanning it hits
// the redirect endpoint, which resolves the hotel, counts the scan and
// bounces the browser to the hotel page with scan provenance in the query
// string.

use crate::{database::MongoDB, models::QrCode, utils::AppError};
use mongodb::bson::doc;
use serde::Serialize;

const COLLECTION: &str = "qrcodes";

/// Each scan counts 0.5, not 1 - the counter has always been kept in half
/// steps and stays fractional.
const SCAN_INCREMENT: f64 = 0.5;

#[derive(Debug, Serialize)]
pub struct ScanResolution {
    pub qr_id: String,
    pub hotel_id: Option<String>,
    pub redirect_url: String,
}

/// Target of the post-scan redirect.
pub fn redirect_url(frontend_url: &str, qr_id: &str, hotel_id: Option<&str>) -> String {
    let hotel_segment = hotel_id.unwrap_or("");
    let mut url = format!(
        "{}/hotels/{}?qrScan=true&qid={}",
        frontend_url.trim_end_matches('/'),
        hotel_segment,
        qr_id
    );
    if hotel_id.is_none() {
        url.push_str("&error=hotel_not_assigned");
    }
    url
}

/// Resolve a scanned code, bump its counter and produce the redirect target.
/// Unknown ids are an error (no document is created on scan).
pub async fn resolve_scan(
    db: &MongoDB,
    frontend_url: &str,
    qr_id: &str,
) -> Result<ScanResolution, AppError> {
    let collection = db.collection::<QrCode>(COLLECTION);

    let qrcode = collection
        .find_one(doc! { "_id": qr_id })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("QR code {}", qr_id)))?;

    collection
        .update_one(
            doc! { "_id": qr_id },
            doc! { "$inc": { "number_of_qr_scans": SCAN_INCREMENT } },
        )
        .await?;

    let hotel_id = qrcode.hotel_id.filter(|id| !id.is_empty());
    let url = redirect_url(frontend_url, qr_id, hotel_id.as_deref());

    log::info!(
        "📱 QR {} scanned (hotel: {})",
        qr_id,
        hotel_id.as_deref().unwrap_or("unassigned")
    );

    Ok(ScanResolution {
        qr_id: qr_id.to_string(),
        hotel_id,
        redirect_url: url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_carries_scan_provenance() {
        let url = redirect_url("https://cravings.example", "qr-42", Some("hotel-7"));
        assert_eq!(
            url,
            "https://cravings.example/hotels/hotel-7?qrScan=true&qid=qr-42"
        );
    }

    #[test]
    fn unassigned_code_flags_the_error() {
        let url = redirect_url("https://cravings.example/", "qr-42", None);
        assert_eq!(
            url,
            "https://cravings.example/hotels/?qrScan=true&qid=qr-42&error=hotel_not_assigned"
        );
    }
}
