use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::offer_service::{self, AddCommentRequest, AddOfferRequest};
use actix_web::{delete, get, post, web, HttpResponse, Responder};

/// GET /api/v1/offers - all currently active offers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/offers",
    tag = "Offers",
    responses(
        (status = 200, description = "Active offers across all hotels")
    )
)]
#[get("")]
pub async fn list_offers(db: web::Data<MongoDB>) -> impl Responder {
    match offer_service::list_active(&db).await {
        Ok(offers) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": offers.len(),
            "offers": offers
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// GET /api/v1/offers/{id}
#[get("/{id}")]
pub async fn get_offer(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let offer_id = path.into_inner();

    match offer_service::get_offer(&db, &offer_id).await {
        Ok(offer) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "offer": offer_service::OfferInfo::from(offer)
        })),
        Err(e) if e.contains("not found") => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/offers/{id}/enquiry - a viewer tapped through to the hotel
#[post("/{id}/enquiry")]
pub async fn record_enquiry(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let offer_id = path.into_inner();

    // hotel id comes from the offer document, never from the caller
    let offer = match offer_service::get_offer(&db, &offer_id).await {
        Ok(offer) => offer,
        Err(e) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    };

    match offer_service::increment_enquiry(&db, &offer_id, &offer.hotel_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/offers/{id}/comments
#[utoipa::path(
    post,
    path = "/api/v1/offers/{id}/comments",
    tag = "Offers",
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment appended"),
        (status = 404, description = "Offer not found")
    )
)]
#[post("/{id}/comments")]
pub async fn add_comment(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<AddCommentRequest>,
) -> impl Responder {
    let offer_id = path.into_inner();
    log::info!("💬 POST /offers/{}/comments", offer_id);

    match offer_service::add_comment(&db, &offer_id, request.into_inner()).await {
        Ok(comment) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "comment": comment
        })),
        Err(e) if e.contains("not found") => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/offers/{id}/comments/{comment_id}/like
#[post("/{id}/comments/{comment_id}/like")]
pub async fn like_comment(
    db: web::Data<MongoDB>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (offer_id, comment_id) = path.into_inner();

    match offer_service::increment_like(&db, &offer_id, &comment_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) if e.contains("not found") => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

// -------- hotel-side management, mounted behind the auth middleware --------

fn require_hotel(claims: &Claims) -> Result<(), HttpResponse> {
    if claims.role != "hotel" {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Only partner accounts can manage offers"
        })));
    }
    Ok(())
}

/// GET /api/v1/my/offers - the caller's offers, active or not
#[get("")]
pub async fn list_my_offers(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    match offer_service::list_hotel_offers(&db, &user.sub).await {
        Ok(offers) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": offers.len(),
            "offers": offers
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/my/offers
#[utoipa::path(
    post,
    path = "/api/v1/my/offers",
    tag = "Offers",
    request_body = AddOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = offer_service::OfferInfo),
        (status = 400, description = "Bad window or price"),
        (status = 403, description = "Caller is not a hotel")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn create_offer(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<AddOfferRequest>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    log::info!("🏷️ POST /my/offers - hotel {}", user.sub);

    match offer_service::add_offer(&db, &user.sub, request.into_inner()).await {
        Ok(offer) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "offer": offer
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// DELETE /api/v1/my/offers/{id}
#[delete("/{id}")]
pub async fn delete_offer(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    let offer_id = path.into_inner();
    log::info!("🗑️ DELETE /my/offers/{} - hotel {}", offer_id, user.sub);

    match offer_service::delete_offer(&db, &user.sub, &offer_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Offer deleted"
        })),
        Err(e) if e.contains("not found") => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}
