// ==================== FOLLOW / VISIT / DISCOUNT BOOKKEEPING ====================
// A hotel's followers live as a nested array on its user document and the
// reverse edges live on each consumer's document. Follow and unfollow are two
// independent writes with no transaction: a failure between them leaves a
// one-sided relationship, and concurrent writers can lose updates. That is
// the documented consistency model of this data, not something to patch here
// with transactions.

use crate::{
    database::MongoDB,
    models::{FollowedHotel, Follower, PaymentRecord, User, VisitRecord},
};
use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use serde::Serialize;

/// Two visits closer together than this count as one.
pub const RECENCY_WINDOW_SECS: i64 = 6 * 60 * 60;

/// Reward tiers: (minimum visit count, percent off). Monotonic in visit
/// count, capped at 50.
const DISCOUNT_TIERS: &[(u32, u32)] = &[(1, 10), (3, 20), (6, 50)];

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FollowResponse {
    pub success: bool,
    pub already_following: bool,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct VisitOutcome {
    pub number_of_visits: u32,
    pub last_visit: String,
    pub is_recent_visit: bool,
    pub discount_percent: u32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PayResponse {
    pub success: bool,
    pub payment_link: String,
    pub discount_percent: u32,
    pub final_amount: f64,
}

/// Step function mapping lifetime visit count to a reward percentage.
pub fn discount_for_visits(visits: u32) -> u32 {
    let mut percent = 0;
    for &(min_visits, tier_percent) in DISCOUNT_TIERS {
        if visits >= min_visits {
            percent = tier_percent;
        }
    }
    percent
}

/// A visit is recent iff a prior one exists and strictly less than the
/// recency window has elapsed since it. Unparseable timestamps read as
/// no prior visit.
pub fn is_recent(last_visit: &str, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(last_visit) {
        Ok(last) => (now - last.with_timezone(&Utc)).num_seconds() < RECENCY_WINDOW_SECS,
        Err(_) => false,
    }
}

/// Append a follower entry unless the user is already present. `None` means
/// no write is needed (follow is idempotent).
fn apply_follow(followers: &[Follower], user_id: &str, phone: &str) -> Option<Vec<Follower>> {
    if followers.iter().any(|f| f.user == user_id) {
        return None;
    }
    let mut updated = followers.to_vec();
    updated.push(Follower {
        user: user_id.to_string(),
        phone: phone.to_string(),
        visits: None,
    });
    Some(updated)
}

fn apply_unfollow(followers: &[Follower], user_id: &str) -> Vec<Follower> {
    followers
        .iter()
        .filter(|f| f.user != user_id)
        .cloned()
        .collect()
}

/// Locate the caller in the followers array and count the visit. Returns the
/// array to write back (unchanged when the visit is recent) and the outcome
/// to show the caller. `None` when the caller does not follow the hotel.
fn apply_visit(
    followers: &[Follower],
    user_id: &str,
    now: DateTime<Utc>,
) -> Option<(Vec<Follower>, VisitOutcome)> {
    let index = followers.iter().position(|f| f.user == user_id)?;
    let mut updated = followers.to_vec();

    let prior = updated[index].visits.clone();
    let recent = prior
        .as_ref()
        .map(|v| is_recent(&v.last_visit, now))
        .unwrap_or(false);

    if recent {
        let visits = prior.unwrap();
        let outcome = VisitOutcome {
            number_of_visits: visits.number_of_visits,
            last_visit: visits.last_visit,
            is_recent_visit: true,
            discount_percent: discount_for_visits(visits.number_of_visits),
        };
        return Some((updated, outcome));
    }

    let number_of_visits = prior.map(|v| v.number_of_visits).unwrap_or(0) + 1;
    let last_visit = now.to_rfc3339();
    updated[index].visits = Some(VisitRecord {
        number_of_visits,
        last_visit: last_visit.clone(),
    });

    let outcome = VisitOutcome {
        number_of_visits,
        last_visit,
        is_recent_visit: false,
        discount_percent: discount_for_visits(number_of_visits),
    };
    Some((updated, outcome))
}

/// Deep link for the external payment app. Constructed and handed out only -
/// the service never learns whether the payment went through.
pub fn payment_link(payee: &str, payee_name: &str, amount: f64) -> String {
    format!(
        "payapp://pay?payee={}&name={}&amount={}&currency=INR",
        urlencoding::encode(payee),
        urlencoding::encode(payee_name),
        amount
    )
}

async fn load_user(db: &MongoDB, user_id: &str) -> Result<User, String> {
    db.collection::<User>("users")
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("User {} not found", user_id))
}

async fn load_hotel(db: &MongoDB, hotel_id: &str) -> Result<User, String> {
    let hotel = load_user(db, hotel_id).await?;
    if !hotel.is_hotel() {
        return Err(format!("User {} is not a hotel", hotel_id));
    }
    Ok(hotel)
}

/// Follow a hotel. Idempotent: if the caller is already in the hotel's
/// followers array nothing is written.
pub async fn follow(db: &MongoDB, user_id: &str, hotel_id: &str) -> Result<FollowResponse, String> {
    let caller = load_user(db, user_id).await?;
    let hotel = load_hotel(db, hotel_id).await?;

    let updated_followers = match apply_follow(
        &hotel.followers,
        user_id,
        caller.phone.as_deref().unwrap_or(""),
    ) {
        Some(updated) => updated,
        None => {
            return Ok(FollowResponse {
                success: true,
                already_following: true,
            })
        }
    };

    let users = db.collection::<User>("users");

    // First write: hotel side
    let followers_bson = mongodb::bson::to_bson(&updated_followers)
        .map_err(|e| format!("Serialization error: {}", e))?;
    users
        .update_one(
            doc! { "user_id": hotel_id },
            doc! { "$set": { "followers": followers_bson } },
        )
        .await
        .map_err(|e| format!("Failed to update followers: {}", e))?;

    // Second write: caller side. No rollback if this one fails.
    let mut following = caller.following.clone();
    if !following.iter().any(|f| f.user == hotel_id) {
        following.push(FollowedHotel {
            user: hotel_id.to_string(),
            phone: hotel.phone.clone().unwrap_or_default(),
        });
    }
    let following_bson =
        mongodb::bson::to_bson(&following).map_err(|e| format!("Serialization error: {}", e))?;
    users
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": { "following": following_bson } },
        )
        .await
        .map_err(|e| format!("Failed to update following: {}", e))?;

    log::info!("➕ {} now follows {}", user_id, hotel_id);

    Ok(FollowResponse {
        success: true,
        already_following: false,
    })
}

/// Remove the relationship from both sides, again as two independent writes.
pub async fn unfollow(db: &MongoDB, user_id: &str, hotel_id: &str) -> Result<(), String> {
    let caller = load_user(db, user_id).await?;
    let hotel = load_hotel(db, hotel_id).await?;

    let users = db.collection::<User>("users");

    let updated_followers = apply_unfollow(&hotel.followers, user_id);
    let followers_bson = mongodb::bson::to_bson(&updated_followers)
        .map_err(|e| format!("Serialization error: {}", e))?;
    users
        .update_one(
            doc! { "user_id": hotel_id },
            doc! { "$set": { "followers": followers_bson } },
        )
        .await
        .map_err(|e| format!("Failed to update followers: {}", e))?;

    let following: Vec<FollowedHotel> = caller
        .following
        .iter()
        .filter(|f| f.user != hotel_id)
        .cloned()
        .collect();
    let following_bson =
        mongodb::bson::to_bson(&following).map_err(|e| format!("Serialization error: {}", e))?;
    users
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": { "following": following_bson } },
        )
        .await
        .map_err(|e| format!("Failed to update following: {}", e))?;

    log::info!("➖ {} unfollowed {}", user_id, hotel_id);
    Ok(())
}

/// Record a QR scan visit. A recent visit ("already scanned today") leaves
/// the counters untouched; otherwise the whole mutated followers array is
/// written back, matching how this field has always been updated.
pub async fn record_visit(
    db: &MongoDB,
    user_id: &str,
    hotel_id: &str,
) -> Result<VisitOutcome, String> {
    let hotel = load_hotel(db, hotel_id).await?;
    let now = Utc::now();

    let (updated_followers, outcome) = apply_visit(&hotel.followers, user_id, now)
        .ok_or_else(|| "Follow the hotel before recording a visit".to_string())?;

    if !outcome.is_recent_visit {
        let followers_bson = mongodb::bson::to_bson(&updated_followers)
            .map_err(|e| format!("Serialization error: {}", e))?;
        db.collection::<User>("users")
            .update_one(
                doc! { "user_id": hotel_id },
                doc! { "$set": { "followers": followers_bson } },
            )
            .await
            .map_err(|e| format!("Failed to record visit: {}", e))?;

        log::info!(
            "🎫 Visit {} recorded for {} at {}",
            outcome.number_of_visits,
            user_id,
            hotel_id
        );
    } else {
        log::info!("⏳ Recent visit, not counted: {} at {}", user_id, hotel_id);
    }

    Ok(outcome)
}

/// Build the payment deep link for the caller's bill and log that the flow
/// was initiated. The discount comes from the caller's lifetime visit count.
pub async fn pay(
    db: &MongoDB,
    user_id: &str,
    hotel_id: &str,
    amount: f64,
) -> Result<PayResponse, String> {
    if amount <= 0.0 {
        return Err("Amount must be positive".to_string());
    }

    let hotel = load_hotel(db, hotel_id).await?;
    let upi_id = hotel
        .upi_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| "Hotel has no payment id registered".to_string())?;

    let visits = hotel
        .followers
        .iter()
        .find(|f| f.user == user_id)
        .and_then(|f| f.visits.as_ref())
        .map(|v| v.number_of_visits)
        .unwrap_or(0);
    let discount_percent = discount_for_visits(visits);
    let final_amount = amount - (amount * discount_percent as f64) / 100.0;

    let hotel_name = hotel.hotel_name.clone().unwrap_or_default();
    let link = payment_link(upi_id, &hotel_name, final_amount);

    // Atomic append; nothing here confirms settlement
    let record = PaymentRecord {
        user: user_id.to_string(),
        amount,
        discount_percent,
        final_amount,
        paid_at: Utc::now().to_rfc3339(),
    };
    let record_bson =
        mongodb::bson::to_bson(&record).map_err(|e| format!("Serialization error: {}", e))?;
    db.collection::<User>("users")
        .update_one(
            doc! { "user_id": hotel_id },
            doc! { "$push": { "payments": record_bson } },
        )
        .await
        .map_err(|e| format!("Failed to record payment: {}", e))?;

    log::info!(
        "💳 Payment link issued: {} -> {} ({}% off)",
        user_id,
        hotel_id,
        discount_percent
    );

    Ok(PayResponse {
        success: true,
        payment_link: link,
        discount_percent,
        final_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn follower(user: &str, visits: Option<VisitRecord>) -> Follower {
        Follower {
            user: user.to_string(),
            phone: "9999900000".to_string(),
            visits,
        }
    }

    #[test]
    fn discount_is_monotonic_and_capped() {
        let mut previous = 0;
        for visits in 0..100u32 {
            let percent = discount_for_visits(visits);
            assert!(percent >= previous, "tier dropped at {} visits", visits);
            assert!(percent <= 50);
            previous = percent;
        }
        assert_eq!(discount_for_visits(0), 0);
        assert_eq!(discount_for_visits(1), 10);
        assert_eq!(discount_for_visits(2), 10);
        assert_eq!(discount_for_visits(3), 20);
        assert_eq!(discount_for_visits(5), 20);
        assert_eq!(discount_for_visits(6), 50);
        assert_eq!(discount_for_visits(1000), 50);
    }

    #[test]
    fn follow_is_idempotent() {
        let followers = vec![];
        let once = apply_follow(&followers, "u1", "123").expect("first follow appends");
        assert_eq!(once.len(), 1);

        // second follow with the same pair yields no write
        assert!(apply_follow(&once, "u1", "123").is_none());
        assert_eq!(once.iter().filter(|f| f.user == "u1").count(), 1);
    }

    #[test]
    fn unfollow_after_follow_removes_entry() {
        let followers = apply_follow(&[], "u1", "123").unwrap();
        let after = apply_unfollow(&followers, "u1");
        assert!(after.is_empty());
    }

    #[test]
    fn unfollow_keeps_other_followers() {
        let followers = vec![follower("u1", None), follower("u2", None)];
        let after = apply_unfollow(&followers, "u1");
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].user, "u2");
    }

    #[test]
    fn recency_boundary_is_strict() {
        let now = Utc::now();
        let just_under = (now - Duration::seconds(RECENCY_WINDOW_SECS - 1)).to_rfc3339();
        assert!(is_recent(&just_under, now));

        // at exactly six hours the visit is no longer recent
        let exact = (now - Duration::seconds(RECENCY_WINDOW_SECS)).to_rfc3339();
        assert!(!is_recent(&exact, now));

        let over = (now - Duration::seconds(RECENCY_WINDOW_SECS + 1)).to_rfc3339();
        assert!(!is_recent(&over, now));
    }

    #[test]
    fn first_visit_then_rescan_within_window() {
        let now = Utc::now();
        let followers = apply_follow(&[], "u1", "123").unwrap();

        // first scan: counted, lowest tier
        let (followers, outcome) = apply_visit(&followers, "u1", now).unwrap();
        assert_eq!(outcome.number_of_visits, 1);
        assert!(!outcome.is_recent_visit);
        assert_eq!(outcome.discount_percent, 10);

        // re-scan one hour later: recent, counter unchanged
        let later = now + Duration::hours(1);
        let (followers, outcome) = apply_visit(&followers, "u1", later).unwrap();
        assert_eq!(outcome.number_of_visits, 1);
        assert!(outcome.is_recent_visit);
        assert_eq!(
            followers[0].visits.as_ref().unwrap().number_of_visits,
            1
        );
    }

    #[test]
    fn visit_after_window_increments() {
        let now = Utc::now();
        let followers = vec![follower(
            "u1",
            Some(VisitRecord {
                number_of_visits: 2,
                last_visit: (now - Duration::hours(7)).to_rfc3339(),
            }),
        )];

        let (_, outcome) = apply_visit(&followers, "u1", now).unwrap();
        assert_eq!(outcome.number_of_visits, 3);
        assert!(!outcome.is_recent_visit);
        assert_eq!(outcome.discount_percent, 20);
    }

    #[test]
    fn visit_by_non_follower_is_rejected() {
        assert!(apply_visit(&[], "u1", Utc::now()).is_none());
    }

    #[test]
    fn payment_link_encodes_payee_and_name() {
        let link = payment_link("spice@upi", "Spice & Garden", 135.0);
        assert_eq!(
            link,
            "payapp://pay?payee=spice%40upi&name=Spice%20%26%20Garden&amount=135&currency=INR"
        );
    }
}
