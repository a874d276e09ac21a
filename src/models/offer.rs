use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A comment left on an offer.
///
/// `comment_id` is its own uuid; `offer_id` is always the parent offer.
/// Likes are matched on `comment_id` only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct Comment {
    pub comment_id: String,
    pub offer_id: String,
    pub name: String,
    pub comment: String,
    #[serde(default)]
    pub likes: i64,
}

/// A time-bounded discounted price on a menu item. Hotel fields are
/// denormalized at creation time so the listing needs no joins.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Offer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub menu_item_id: String,
    pub hotel_id: String,
    pub hotel_name: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub hotel_location: String,
    pub dish_name: String,
    #[serde(default)]
    pub dish_image: String,
    pub original_price: f64,
    pub new_price: f64,
    #[serde(default)]
    pub items_available: i64,
    #[serde(default)]
    pub enquiries: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339; offer becomes visible at this instant
    pub from_time: String,
    /// RFC 3339; offer is hidden from this instant on
    pub to_time: String,
    pub created_at: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Offer {
    /// The one active-window comparison every call site uses: active means
    /// `from_time <= now < to_time`. Unparseable timestamps read as inactive.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let from = match DateTime::parse_from_rfc3339(&self.from_time) {
            Ok(t) => t.with_timezone(&Utc),
            Err(_) => return false,
        };
        let to = match DateTime::parse_from_rfc3339(&self.to_time) {
            Ok(t) => t.with_timezone(&Utc),
            Err(_) => return false,
        };
        from <= now && now < to
    }

    pub fn id_hex(&self) -> String {
        self._id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn offer_with_window(from: DateTime<Utc>, to: DateTime<Utc>) -> Offer {
        Offer {
            _id: None,
            menu_item_id: "m1".into(),
            hotel_id: "h1".into(),
            hotel_name: "Spice Garden".into(),
            area: String::new(),
            hotel_location: String::new(),
            dish_name: "Biryani".into(),
            dish_image: String::new(),
            original_price: 200.0,
            new_price: 150.0,
            items_available: 10,
            enquiries: 0,
            category: "hotel".into(),
            description: String::new(),
            from_time: from.to_rfc3339(),
            to_time: to.to_rfc3339(),
            created_at: from.to_rfc3339(),
            comments: vec![],
        }
    }

    #[test]
    fn expired_offer_is_not_active() {
        let now = Utc::now();
        let offer = offer_with_window(now - Duration::hours(5), now - Duration::hours(1));
        assert!(!offer.is_active_at(now));
    }

    #[test]
    fn offer_ending_one_second_from_now_is_active() {
        let now = Utc::now();
        let offer = offer_with_window(now - Duration::hours(1), now + Duration::seconds(1));
        assert!(offer.is_active_at(now));
    }

    #[test]
    fn window_is_half_open() {
        let now = Utc::now();
        // active exactly at from_time, inactive exactly at to_time
        let offer = offer_with_window(now, now + Duration::hours(1));
        assert!(offer.is_active_at(now));

        let offer = offer_with_window(now - Duration::hours(1), now);
        assert!(!offer.is_active_at(now));
    }

    #[test]
    fn future_offer_is_not_active_yet() {
        let now = Utc::now();
        let offer = offer_with_window(now + Duration::hours(1), now + Duration::hours(2));
        assert!(!offer.is_active_at(now));
    }

    #[test]
    fn garbage_timestamps_read_as_inactive() {
        let now = Utc::now();
        let mut offer = offer_with_window(now - Duration::hours(1), now + Duration::hours(1));
        offer.to_time = "not-a-timestamp".into();
        assert!(!offer.is_active_at(now));
    }
}
