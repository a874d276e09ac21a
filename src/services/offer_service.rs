// ==================== OFFERS ====================
// Time-bounded discounts on menu items. There is no expiry job: an offer is
// "active" only by comparing now against its window at query time, and every
// call site goes through Offer::is_active_at. The public listing is served
// from the in-process cache, invalidated on every mutation.
//
// Comments are appended with $push (safe under concurrent writers). Likes
// are a read-modify-write of the whole comments array, so concurrent likers
// can lose an update - the accepted consistency of this field.

use crate::{
    database::MongoDB,
    models::{Comment, Offer, User},
    services::menu_service,
    utils::cache,
};
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const COLLECTION: &str = "offers";
const LISTING_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddOfferRequest {
    pub menu_item_id: String,
    pub new_price: f64,
    #[serde(default)]
    pub items_available: i64,
    /// RFC 3339
    pub from_time: String,
    /// RFC 3339
    pub to_time: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddCommentRequest {
    pub name: String,
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct OfferInfo {
    pub id: String,
    pub menu_item_id: String,
    pub hotel_id: String,
    pub hotel_name: String,
    pub area: String,
    pub hotel_location: String,
    pub dish_name: String,
    pub dish_image: String,
    pub original_price: f64,
    pub new_price: f64,
    pub items_available: i64,
    pub enquiries: i64,
    pub category: String,
    pub description: String,
    pub from_time: String,
    pub to_time: String,
    pub created_at: String,
    pub comments: Vec<Comment>,
}

impl From<Offer> for OfferInfo {
    fn from(offer: Offer) -> Self {
        OfferInfo {
            id: offer.id_hex(),
            menu_item_id: offer.menu_item_id,
            hotel_id: offer.hotel_id,
            hotel_name: offer.hotel_name,
            area: offer.area,
            hotel_location: offer.hotel_location,
            dish_name: offer.dish_name,
            dish_image: offer.dish_image,
            original_price: offer.original_price,
            new_price: offer.new_price,
            items_available: offer.items_available,
            enquiries: offer.enquiries,
            category: offer.category,
            description: offer.description,
            from_time: offer.from_time,
            to_time: offer.to_time,
            created_at: offer.created_at,
            comments: offer.comments,
        }
    }
}

pub fn parse_offer_id(id: &str) -> Result<ObjectId, String> {
    ObjectId::parse_str(id).map_err(|_| "Invalid offer ID".to_string())
}

fn parse_rfc3339(label: &str, value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| format!("{} must be an RFC 3339 timestamp", label))
}

/// Bump `likes` on the comment matched by its own id. `None` when no comment
/// carries that id.
fn bump_like(comments: &[Comment], comment_id: &str) -> Option<Vec<Comment>> {
    if !comments.iter().any(|c| c.comment_id == comment_id) {
        return None;
    }
    Some(
        comments
            .iter()
            .map(|c| {
                if c.comment_id == comment_id {
                    let mut liked = c.clone();
                    liked.likes += 1;
                    liked
                } else {
                    c.clone()
                }
            })
            .collect(),
    )
}

/// All currently active offers, cache-first. The Mongo filter on `to_time`
/// is only a coarse cut; `is_active_at` makes the call.
pub async fn list_active(db: &MongoDB) -> Result<Vec<OfferInfo>, String> {
    if let Some(cached) = cache::get_cached(cache::OFFERS_CACHE_KEY, LISTING_CACHE_TTL) {
        if let Ok(offers) = serde_json::from_str::<Vec<OfferInfo>>(&cached) {
            log::debug!("💾 Offers listing served from cache ({} offers)", offers.len());
            return Ok(offers);
        }
    }

    let collection = db.collection::<Offer>(COLLECTION);
    let now = Utc::now();

    let mut cursor = collection
        .find(doc! { "to_time": { "$gt": now.to_rfc3339() } })
        .await
        .map_err(|e| format!("Failed to fetch offers: {}", e))?;

    let mut offers = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(offer) => {
                if offer.is_active_at(now) {
                    offers.push(OfferInfo::from(offer));
                }
            }
            Err(e) => log::error!("❌ Error reading offer: {}", e),
        }
    }

    // Newest first
    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if let Ok(serialized) = serde_json::to_string(&offers) {
        cache::set_cache(cache::OFFERS_CACHE_KEY.to_string(), serialized);
    }

    Ok(offers)
}

/// A hotel's own offers, active or not.
pub async fn list_hotel_offers(db: &MongoDB, hotel_id: &str) -> Result<Vec<OfferInfo>, String> {
    let collection = db.collection::<Offer>(COLLECTION);

    let mut cursor = collection
        .find(doc! { "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Failed to fetch offers: {}", e))?;

    let mut offers = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(offer) => offers.push(OfferInfo::from(offer)),
            Err(e) => log::error!("❌ Error reading offer: {}", e),
        }
    }

    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(offers)
}

/// Every offer in the system, for the oversight page. No window filter.
pub async fn list_all_offers(db: &MongoDB) -> Result<Vec<OfferInfo>, String> {
    let collection = db.collection::<Offer>(COLLECTION);

    let mut cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| format!("Failed to fetch offers: {}", e))?;

    let mut offers = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(offer) => offers.push(OfferInfo::from(offer)),
            Err(e) => log::error!("❌ Error reading offer: {}", e),
        }
    }

    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(offers)
}

/// Offers live right now for a single hotel, for its public page.
pub async fn list_hotel_active_offers(
    db: &MongoDB,
    hotel_id: &str,
) -> Result<Vec<OfferInfo>, String> {
    let collection = db.collection::<Offer>(COLLECTION);
    let now = Utc::now();

    let mut cursor = collection
        .find(doc! { "hotel_id": hotel_id, "to_time": { "$gt": now.to_rfc3339() } })
        .await
        .map_err(|e| format!("Failed to fetch offers: {}", e))?;

    let mut offers = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(offer) => {
                if offer.is_active_at(now) {
                    offers.push(OfferInfo::from(offer));
                }
            }
            Err(e) => log::error!("❌ Error reading offer: {}", e),
        }
    }

    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(offers)
}

pub async fn get_offer(db: &MongoDB, offer_id: &str) -> Result<Offer, String> {
    let object_id = parse_offer_id(offer_id)?;
    db.collection::<Offer>(COLLECTION)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Offer {} not found", offer_id))
}

/// Create an offer on one of the caller's menu items. Hotel fields are
/// denormalized onto the offer document at this point.
pub async fn add_offer(
    db: &MongoDB,
    hotel_id: &str,
    request: AddOfferRequest,
) -> Result<OfferInfo, String> {
    let from = parse_rfc3339("from_time", &request.from_time)?;
    let to = parse_rfc3339("to_time", &request.to_time)?;
    if to <= from {
        return Err("to_time must be after from_time".to_string());
    }

    let hotel = db
        .collection::<User>("users")
        .find_one(doc! { "user_id": hotel_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "Hotel account not found".to_string())?;

    let menu_item = menu_service::get_menu_item(db, hotel_id, &request.menu_item_id).await?;

    if request.new_price >= menu_item.price {
        return Err("new_price must be below the original price".to_string());
    }

    let offer = Offer {
        _id: None,
        menu_item_id: request.menu_item_id,
        hotel_id: hotel_id.to_string(),
        hotel_name: hotel.hotel_name.unwrap_or_default(),
        area: hotel.area.unwrap_or_default(),
        hotel_location: hotel.location.unwrap_or_default(),
        dish_name: menu_item.name,
        dish_image: menu_item.image,
        original_price: menu_item.price,
        new_price: request.new_price,
        items_available: request.items_available,
        enquiries: 0,
        category: hotel.category.unwrap_or_else(|| "hotel".to_string()),
        description: menu_item.description.unwrap_or_default(),
        from_time: from.to_rfc3339(),
        to_time: to.to_rfc3339(),
        created_at: Utc::now().to_rfc3339(),
        comments: vec![],
    };

    let collection = db.collection::<Offer>(COLLECTION);
    let result = collection
        .insert_one(&offer)
        .await
        .map_err(|e| format!("Failed to create offer: {}", e))?;

    let mut stored = offer;
    stored._id = result.inserted_id.as_object_id();

    cache::invalidate(cache::OFFERS_CACHE_KEY);

    log::info!(
        "🏷️ Offer created by hotel {}: {} at {}",
        hotel_id,
        stored.dish_name,
        stored.new_price
    );

    Ok(OfferInfo::from(stored))
}

pub async fn delete_offer(db: &MongoDB, hotel_id: &str, offer_id: &str) -> Result<(), String> {
    let object_id = parse_offer_id(offer_id)?;
    let collection = db.collection::<Offer>(COLLECTION);

    let result = collection
        .delete_one(doc! { "_id": object_id, "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Failed to delete offer: {}", e))?;

    if result.deleted_count == 0 {
        return Err("Offer not found".to_string());
    }

    cache::invalidate(cache::OFFERS_CACHE_KEY);

    log::info!("🗑️ Offer {} deleted by hotel {}", offer_id, hotel_id);
    Ok(())
}

/// Count an enquiry on both the offer and its hotel. Two independent atomic
/// increments, no compensation between them.
pub async fn increment_enquiry(db: &MongoDB, offer_id: &str, hotel_id: &str) -> Result<(), String> {
    let object_id = parse_offer_id(offer_id)?;

    db.collection::<User>("users")
        .update_one(
            doc! { "user_id": hotel_id },
            doc! { "$inc": { "enquiry": 1 } },
        )
        .await
        .map_err(|e| format!("Failed to increment hotel enquiry: {}", e))?;

    db.collection::<Offer>(COLLECTION)
        .update_one(doc! { "_id": object_id }, doc! { "$inc": { "enquiries": 1 } })
        .await
        .map_err(|e| format!("Failed to increment offer enquiries: {}", e))?;

    Ok(())
}

/// Append a comment with $push - the one atomic array operation this
/// collection gets.
pub async fn add_comment(
    db: &MongoDB,
    offer_id: &str,
    request: AddCommentRequest,
) -> Result<Comment, String> {
    let object_id = parse_offer_id(offer_id)?;
    let collection = db.collection::<Offer>(COLLECTION);

    let comment = Comment {
        comment_id: Uuid::new_v4().to_string(),
        offer_id: offer_id.to_string(),
        name: request.name,
        comment: request.comment,
        likes: 0,
    };

    let comment_bson =
        mongodb::bson::to_bson(&comment).map_err(|e| format!("Serialization error: {}", e))?;

    let result = collection
        .update_one(
            doc! { "_id": object_id },
            doc! { "$push": { "comments": comment_bson } },
        )
        .await
        .map_err(|e| format!("Failed to add comment: {}", e))?;

    if result.matched_count == 0 {
        return Err(format!("Offer {} not found", offer_id));
    }

    cache::invalidate(cache::OFFERS_CACHE_KEY);

    Ok(comment)
}

/// Like a comment. Whole-array read-modify-write; a concurrent liker can
/// overwrite this one (last writer wins).
pub async fn increment_like(db: &MongoDB, offer_id: &str, comment_id: &str) -> Result<(), String> {
    let offer = get_offer(db, offer_id).await?;

    let updated_comments = bump_like(&offer.comments, comment_id)
        .ok_or_else(|| format!("Comment {} not found", comment_id))?;

    let comments_bson = mongodb::bson::to_bson(&updated_comments)
        .map_err(|e| format!("Serialization error: {}", e))?;

    db.collection::<Offer>(COLLECTION)
        .update_one(
            doc! { "_id": offer._id.unwrap_or_default() },
            doc! { "$set": { "comments": comments_bson } },
        )
        .await
        .map_err(|e| format!("Failed to update likes: {}", e))?;

    cache::invalidate(cache::OFFERS_CACHE_KEY);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(comment_id: &str, offer_id: &str, likes: i64) -> Comment {
        Comment {
            comment_id: comment_id.to_string(),
            offer_id: offer_id.to_string(),
            name: "Asha".to_string(),
            comment: "Great biryani".to_string(),
            likes,
        }
    }

    #[test]
    fn like_matches_on_comment_id_only() {
        // a comment whose parent offer id happens to equal another comment's
        // id must not soak up the like
        let comments = vec![comment("c1", "offer-9", 0), comment("c2", "c1", 5)];

        let updated = bump_like(&comments, "c1").unwrap();
        assert_eq!(updated[0].likes, 1);
        assert_eq!(updated[1].likes, 5);
    }

    #[test]
    fn like_on_unknown_comment_is_an_error() {
        let comments = vec![comment("c1", "offer-9", 0)];
        assert!(bump_like(&comments, "offer-9").is_none());
    }

    #[test]
    fn like_leaves_other_comments_untouched() {
        let comments = vec![comment("c1", "o1", 1), comment("c2", "o1", 2)];
        let updated = bump_like(&comments, "c2").unwrap();
        assert_eq!(updated[0].likes, 1);
        assert_eq!(updated[1].likes, 3);
    }
}
