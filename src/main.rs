mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    log::info!("🚀 Starting Cravings Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // QR scan redirect (hit straight from the printed code)
            .service(api::qr::qr_scan)
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/register", web::post().to(api::auth::register))
                    .route("/register-partner", web::post().to(api::auth::register_partner))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .route("/google", web::get().to(api::auth::google_auth))
                    .route("/callback", web::get().to(api::auth::google_callback))
                    .route("/verify", web::get().to(api::auth::verify_token)),
            )
            // Account: profile and soft deletion - Requires JWT
            .service(
                web::scope("/api/v1/account")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("/me", web::get().to(api::auth::get_me))
                    .route("/profile", web::patch().to(api::auth::update_profile))
                    .route("", web::delete().to(api::auth::delete_account)),
            )
            // Hotels: public discovery plus follower actions
            .service(
                web::scope("/api/v1/hotels")
                    .service(api::hotels::list_hotels)
                    .service(api::hotels::get_hotel)
                    // Follower actions need a signed-in user
                    .service(
                        web::scope("")
                            .wrap(middleware::auth::AuthMiddleware)
                            .service(api::hotels::follow_hotel)
                            .service(api::hotels::unfollow_hotel)
                            .service(api::hotels::record_visit)
                            .service(api::hotels::pay_hotel),
                    ),
            )
            // Offers: public browsing, comments and likes
            .service(
                web::scope("/api/v1/offers")
                    .service(api::offers::list_offers)
                    .service(api::offers::record_enquiry)
                    .service(api::offers::add_comment)
                    .service(api::offers::like_comment)
                    .service(api::offers::get_offer), // catch-all, keep last
            )
            // Offers: hotel-side management - Requires JWT
            .service(
                web::scope("/api/v1/my/offers")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::offers::list_my_offers)
                    .service(api::offers::create_offer)
                    .service(api::offers::delete_offer),
            )
            // Menu management - Requires JWT
            .service(
                web::scope("/api/v1/menu")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::menu::list_menu)
                    .service(api::menu::add_item)
                    .service(api::menu::update_item)
                    .service(api::menu::delete_item),
            )
            // Categories - Requires JWT
            .service(
                web::scope("/api/v1/categories")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::categories::list_categories)
                    .service(api::categories::add_category)
                    .service(api::categories::delete_category),
            )
            // Super-admin console - Requires JWT
            .service(
                web::scope("/api/v1/admin")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::admin::list_partners)
                    .service(api::admin::verify_partner)
                    .service(api::admin::revoke_partner)
                    .service(api::admin::assign_qr)
                    .service(api::admin::list_qrcodes)
                    .service(api::admin::list_all_offers)
                    .service(api::admin::list_hotel_offers)
                    .service(api::admin::delete_offer),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
