use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::category_service::{self, AddCategoryRequest};
use actix_web::{delete, get, post, web, HttpResponse, Responder};

fn require_hotel(claims: &Claims) -> Result<(), HttpResponse> {
    if claims.role != "hotel" {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Only partner accounts can manage categories"
        })));
    }
    Ok(())
}

/// GET /api/v1/categories - the caller's category labels
#[get("")]
pub async fn list_categories(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    match category_service::list_categories(&db, &user.sub).await {
        Ok(categories) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": categories.len(),
            "categories": categories
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/categories
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Categories",
    request_body = AddCategoryRequest,
    responses(
        (status = 201, description = "Category created (or the existing duplicate)", body = category_service::CategoryInfo),
        (status = 400, description = "Empty name")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn add_category(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<AddCategoryRequest>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    match category_service::add_category(&db, &user.sub, request.into_inner()).await {
        Ok(category) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "category": category
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// DELETE /api/v1/categories/{id}
#[delete("/{id}")]
pub async fn delete_category(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    let category_id = path.into_inner();

    match category_service::delete_category(&db, &user.sub, &category_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Category deleted"
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
