use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::menu_service::{self, AddMenuItemRequest, UpdateMenuItemRequest};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

fn require_hotel(claims: &Claims) -> Result<(), HttpResponse> {
    if claims.role != "hotel" {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Only partner accounts can manage a menu"
        })));
    }
    Ok(())
}

/// GET /api/v1/menu - the caller's own menu
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    tag = "Menu",
    responses(
        (status = 200, description = "Menu items for the authenticated hotel"),
        (status = 403, description = "Caller is not a hotel")
    ),
    security(("bearer_auth" = []))
)]
#[get("")]
pub async fn list_menu(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    match menu_service::list_menu(&db, &user.sub).await {
        Ok(items) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": items.len(),
            "items": items
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// POST /api/v1/menu
#[utoipa::path(
    post,
    path = "/api/v1/menu",
    tag = "Menu",
    request_body = AddMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = menu_service::MenuItemInfo),
        (status = 403, description = "Caller is not a hotel")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn add_item(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<AddMenuItemRequest>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    log::info!("🍽️ POST /menu - hotel {}", user.sub);

    match menu_service::add_item(&db, &user.sub, request.into_inner()).await {
        Ok(item) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "item": item
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// PATCH /api/v1/menu/{id}
#[patch("/{id}")]
pub async fn update_item(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateMenuItemRequest>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    let item_id = path.into_inner();

    match menu_service::update_item(&db, &user.sub, &item_id, request.into_inner()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Menu item updated"
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

/// DELETE /api/v1/menu/{id}
#[delete("/{id}")]
pub async fn delete_item(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(forbidden) = require_hotel(&user) {
        return forbidden;
    }

    let item_id = path.into_inner();
    log::info!("🗑️ DELETE /menu/{} - hotel {}", item_id, user.sub);

    match menu_service::delete_item(&db, &user.sub, &item_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Menu item deleted"
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
