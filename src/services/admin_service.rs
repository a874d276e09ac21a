// ==================== SUPER-ADMIN CONSOLE ====================
// Partner verification, QR assignment and offer oversight. Role gating
// happens in the API layer; everything here assumes a superadmin caller.

use crate::{
    database::MongoDB,
    models::{QrCode, User},
};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PartnerInfo {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub verified: bool,
    pub account_status: String,
    pub followers_count: usize,
    pub enquiry: i64,
}

impl From<User> for PartnerInfo {
    fn from(user: User) -> Self {
        PartnerInfo {
            id: user.user_id,
            email: user.email,
            hotel_name: user.hotel_name,
            area: user.area,
            location: user.location,
            phone: user.phone,
            verified: user.verified.unwrap_or(false),
            account_status: match user.account_status {
                crate::models::AccountStatus::Active => "active".to_string(),
                crate::models::AccountStatus::Inactive => "inActive".to_string(),
            },
            followers_count: user.followers.len(),
            enquiry: user.enquiry.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AssignQrRequest {
    pub qr_id: String,
    pub hotel_id: String,
}

/// Hotel partner accounts, optionally filtered by verification state.
pub async fn list_partners(
    db: &MongoDB,
    verified: Option<bool>,
) -> Result<Vec<PartnerInfo>, String> {
    let collection = db.collection::<User>("users");

    let mut filter = doc! { "role": "hotel" };
    if let Some(verified) = verified {
        filter.insert("verified", verified);
    }

    let mut cursor = collection
        .find(filter)
        .await
        .map_err(|e| format!("Failed to fetch partners: {}", e))?;

    let mut partners = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(user) => partners.push(PartnerInfo::from(user)),
            Err(e) => log::error!("❌ Error reading partner: {}", e),
        }
    }

    Ok(partners)
}

pub async fn set_partner_verified(
    db: &MongoDB,
    hotel_id: &str,
    verified: bool,
) -> Result<(), String> {
    let collection = db.collection::<User>("users");

    let result = collection
        .update_one(
            doc! { "user_id": hotel_id, "role": "hotel" },
            doc! { "$set": {
                "verified": verified,
                "updated_at": Utc::now().to_rfc3339(),
            }},
        )
        .await
        .map_err(|e| format!("Failed to update partner: {}", e))?;

    if result.matched_count == 0 {
        return Err(format!("Hotel {} not found", hotel_id));
    }

    log::info!(
        "{} Partner {} verification set to {}",
        if verified { "✅" } else { "🚫" },
        hotel_id,
        verified
    );
    Ok(())
}

/// Point a printed QR code at a hotel. Upserts so a code can be registered
/// before or after the first scan attempt, and reassigned later.
pub async fn assign_qr(db: &MongoDB, request: &AssignQrRequest) -> Result<(), String> {
    let hotel = db
        .collection::<User>("users")
        .find_one(doc! { "user_id": &request.hotel_id, "role": "hotel" })
        .await
        .map_err(|e| format!("Database error: {}", e))?;
    if hotel.is_none() {
        return Err(format!("Hotel {} not found", request.hotel_id));
    }

    let collection = db.collection::<QrCode>("qrcodes");

    collection
        .update_one(
            doc! { "_id": &request.qr_id },
            doc! {
                "$set": { "hotel_id": &request.hotel_id },
                "$setOnInsert": { "number_of_qr_scans": 0.0 },
            },
        )
        .upsert(true)
        .await
        .map_err(|e| format!("Failed to assign QR code: {}", e))?;

    log::info!("🔗 QR {} assigned to hotel {}", request.qr_id, request.hotel_id);
    Ok(())
}

pub async fn list_qrcodes(db: &MongoDB) -> Result<Vec<QrCode>, String> {
    let collection = db.collection::<QrCode>("qrcodes");

    let mut cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| format!("Failed to fetch QR codes: {}", e))?;

    let mut codes = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(code) => codes.push(code),
            Err(e) => log::error!("❌ Error reading QR code: {}", e),
        }
    }

    Ok(codes)
}
