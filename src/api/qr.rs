use crate::database::MongoDB;
use crate::services::qr_service;
use crate::utils::AppError;
use actix_web::{get, http::header, web, HttpResponse, Responder};

/// GET /qrScan/{id} - scanned from a printed code, always ends in a redirect
#[utoipa::path(
    get,
    path = "/qrScan/{id}",
    tag = "QR",
    responses(
        (status = 302, description = "Redirect to the hotel page with scan provenance"),
        (status = 404, description = "Unknown QR code")
    )
)]
#[get("/qrScan/{id}")]
pub async fn qr_scan(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let qr_id = path.into_inner();

    let frontend_url =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    match qr_service::resolve_scan(&db, &frontend_url, &qr_id).await {
        Ok(resolution) => HttpResponse::Found()
            .insert_header((header::LOCATION, resolution.redirect_url))
            .finish(),
        Err(e @ AppError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        })),
    }
}
