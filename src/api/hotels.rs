use crate::middleware::auth::Claims;
use crate::models::User;
use crate::services::{follower_service, menu_service};
use crate::{database::MongoDB, services::offer_service};
use actix_web::{get, post, web, HttpResponse, Responder};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HotelInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub verified: bool,
    pub followers_count: usize,
    /// Whether the pay flow is available for this hotel
    pub accepts_payments: bool,
}

impl From<&User> for HotelInfo {
    fn from(user: &User) -> Self {
        HotelInfo {
            id: user.user_id.clone(),
            hotel_name: user.hotel_name.clone(),
            area: user.area.clone(),
            location: user.location.clone(),
            category: user.category.clone(),
            verified: user.verified.unwrap_or(false),
            followers_count: user.followers.len(),
            accepts_payments: user.upi_id.as_deref().map(|id| !id.is_empty()).unwrap_or(false),
        }
    }
}

/// GET /api/v1/hotels - verified hotels for the discovery page
#[get("")]
pub async fn list_hotels(db: web::Data<MongoDB>) -> impl Responder {
    let collection = db.collection::<User>("users");

    match collection
        .find(doc! { "role": "hotel", "verified": true, "account_status": "active" })
        .await
    {
        Ok(mut cursor) => {
            let mut hotels = Vec::new();
            while let Some(result) = cursor.next().await {
                match result {
                    Ok(user) => hotels.push(HotelInfo::from(&user)),
                    Err(e) => log::error!("❌ Error reading hotel: {}", e),
                }
            }

            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "total": hotels.len(),
                "hotels": hotels
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch hotels: {}", e)
        })),
    }
}

/// GET /api/v1/hotels/{id} - public hotel page: profile, menu and offers
#[get("/{id}")]
pub async fn get_hotel(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let hotel_id = path.into_inner();

    let collection = db.collection::<User>("users");
    let hotel = match collection
        .find_one(doc! { "user_id": &hotel_id, "role": "hotel" })
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Hotel not found"
            }))
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to fetch hotel: {}", e)
            }))
        }
    };

    let menu = match menu_service::list_menu(&db, &hotel_id).await {
        Ok(items) => items,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    };

    let offers = match offer_service::list_hotel_active_offers(&db, &hotel_id).await {
        Ok(offers) => offers,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "hotel": HotelInfo::from(&hotel),
        "menu": menu,
        "offers": offers
    }))
}

/// POST /api/v1/hotels/{id}/follow
#[utoipa::path(
    post,
    path = "/api/v1/hotels/{id}/follow",
    tag = "Followers",
    responses(
        (status = 200, description = "Following (idempotent)", body = follower_service::FollowResponse),
        (status = 400, description = "Invalid hotel")
    ),
    security(("bearer_auth" = []))
)]
#[post("/{id}/follow")]
pub async fn follow_hotel(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    let hotel_id = path.into_inner();
    log::info!("➕ POST /hotels/{}/follow - {}", hotel_id, user.sub);

    match follower_service::follow(&db, &user.sub, &hotel_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/hotels/{id}/unfollow
#[post("/{id}/unfollow")]
pub async fn unfollow_hotel(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    let hotel_id = path.into_inner();
    log::info!("➖ POST /hotels/{}/unfollow - {}", hotel_id, user.sub);

    match follower_service::unfollow(&db, &user.sub, &hotel_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/hotels/{id}/visit - record a QR scan visit
#[utoipa::path(
    post,
    path = "/api/v1/hotels/{id}/visit",
    tag = "Followers",
    responses(
        (status = 200, description = "Visit outcome with discount tier", body = follower_service::VisitOutcome),
        (status = 400, description = "Caller does not follow the hotel")
    ),
    security(("bearer_auth" = []))
)]
#[post("/{id}/visit")]
pub async fn record_visit(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    let hotel_id = path.into_inner();
    log::info!("🎫 POST /hotels/{}/visit - {}", hotel_id, user.sub);

    match follower_service::record_visit(&db, &user.sub, &hotel_id).await {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "visit": outcome
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PayRequest {
    pub amount: f64,
}

/// POST /api/v1/hotels/{id}/pay - build the payment deep link for a bill
#[utoipa::path(
    post,
    path = "/api/v1/hotels/{id}/pay",
    tag = "Followers",
    request_body = PayRequest,
    responses(
        (status = 200, description = "Payment link issued", body = follower_service::PayResponse),
        (status = 400, description = "Hotel has no payment id or invalid amount")
    ),
    security(("bearer_auth" = []))
)]
#[post("/{id}/pay")]
pub async fn pay_hotel(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<PayRequest>,
) -> impl Responder {
    let hotel_id = path.into_inner();
    log::info!("💳 POST /hotels/{}/pay - {}", hotel_id, user.sub);

    match follower_service::pay(&db, &user.sub, &hotel_id, request.amount).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}
