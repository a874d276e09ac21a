use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::admin_service::{self, AssignQrRequest};
use crate::services::offer_service;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::Deserialize;

fn require_superadmin(claims: &Claims) -> Result<(), HttpResponse> {
    if claims.role != "superadmin" {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Super-admin access required"
        })));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct PartnersQuery {
    pub verified: Option<bool>,
}

/// GET /api/v1/admin/partners?verified=false - the verification queue
#[utoipa::path(
    get,
    path = "/api/v1/admin/partners",
    tag = "Admin",
    params(
        ("verified" = Option<bool>, Query, description = "Filter by verification state")
    ),
    responses(
        (status = 200, description = "Partner accounts", body = [admin_service::PartnerInfo]),
        (status = 403, description = "Caller is not a super-admin")
    ),
    security(("bearer_auth" = []))
)]
#[get("/partners")]
pub async fn list_partners(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    query: web::Query<PartnersQuery>,
) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    match admin_service::list_partners(&db, query.verified).await {
        Ok(partners) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": partners.len(),
            "partners": partners
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/admin/partners/{id}/verify
#[post("/partners/{id}/verify")]
pub async fn verify_partner(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    let hotel_id = path.into_inner();
    set_verified(&db, &hotel_id, true).await
}

/// POST /api/v1/admin/partners/{id}/revoke
#[post("/partners/{id}/revoke")]
pub async fn revoke_partner(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    let hotel_id = path.into_inner();
    set_verified(&db, &hotel_id, false).await
}

async fn set_verified(db: &MongoDB, hotel_id: &str, verified: bool) -> HttpResponse {
    match admin_service::set_partner_verified(db, hotel_id, verified).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "verified": verified
        })),
        Err(e) if e.contains("not found") => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/admin/qrcodes - point a printed code at a hotel
#[utoipa::path(
    post,
    path = "/api/v1/admin/qrcodes",
    tag = "Admin",
    request_body = AssignQrRequest,
    responses(
        (status = 200, description = "QR code assigned"),
        (status = 404, description = "Hotel not found"),
        (status = 403, description = "Caller is not a super-admin")
    ),
    security(("bearer_auth" = []))
)]
#[post("/qrcodes")]
pub async fn assign_qr(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<AssignQrRequest>,
) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    log::info!("🔗 POST /admin/qrcodes - {}", user.sub);

    match admin_service::assign_qr(&db, &request).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "QR code assigned"
        })),
        Err(e) if e.contains("not found") => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// GET /api/v1/admin/qrcodes
#[get("/qrcodes")]
pub async fn list_qrcodes(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    match admin_service::list_qrcodes(&db).await {
        Ok(codes) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": codes.len(),
            "qrcodes": codes
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// GET /api/v1/admin/offers - every offer in the system, active or not
#[get("/offers")]
pub async fn list_all_offers(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    match offer_service::list_all_offers(&db).await {
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

/// GET /api/v1/admin/hotels/{id}/offers - oversight view of any hotel's offers
#[get("/hotels/{id}/offers")]
pub async fn list_hotel_offers(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    let hotel_id = path.into_inner();

    match offer_service::list_hotel_offers(&db, &hotel_id).await {
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

/// DELETE /api/v1/admin/offers/{id} - remove any offer regardless of owner
#[delete("/offers/{id}")]
pub async fn delete_offer(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_superadmin(&user) {
        return forbidden;
    }

    let offer_id = path.into_inner();

    let offer = match offer_service::get_offer(&db, &offer_id).await {
        Ok(offer) => offer,
        Err(e) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    };

    log::warn!("🗑️ Admin {} removing offer {}", user.sub, offer_id);

    match offer_service::delete_offer(&db, &offer.hotel_id, &offer_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Offer deleted"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}
