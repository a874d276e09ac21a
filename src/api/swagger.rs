use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cravings API",
        version = "1.0.0",
        description = "Restaurant food-offer deals platform. \n\n**Authentication:** Account, follower, menu, offer management and admin endpoints require a JWT Bearer token.\n\n**Features:**\n- Email/password and Google sign-in\n- Hotel discovery with followers and visit-based discounts\n- Time-bounded offers with comments and likes\n- QR scan redirects with scan counting\n- Super-admin partner verification and QR assignment",
        contact(
            name = "Cravings Team",
            email = "support@cravings.example"
        )
    ),
    paths(
        // Auth & account
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::register_partner,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health
        crate::api::health::health_check,

        // Followers & payments
        crate::api::hotels::follow_hotel,
        crate::api::hotels::record_visit,
        crate::api::hotels::pay_hotel,

        // Menu
        crate::api::menu::list_menu,
        crate::api::menu::add_item,

        // Offers
        crate::api::offers::list_offers,
        crate::api::offers::add_comment,
        crate::api::offers::create_offer,

        // Categories
        crate::api::categories::add_category,

        // QR
        crate::api::qr::qr_scan,

        // Admin
        crate::api::admin::list_partners,
        crate::api::admin::assign_qr,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RegisterPartnerRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,

            // Health
            crate::api::health::HealthResponse,

            // Followers & payments
            crate::api::hotels::PayRequest,
            crate::services::follower_service::FollowResponse,
            crate::services::follower_service::VisitOutcome,
            crate::services::follower_service::PayResponse,

            // Menu
            crate::services::menu_service::AddMenuItemRequest,
            crate::services::menu_service::MenuItemInfo,

            // Offers
            crate::services::offer_service::AddOfferRequest,
            crate::services::offer_service::AddCommentRequest,
            crate::services::offer_service::OfferInfo,

            // Categories
            crate::services::category_service::AddCategoryRequest,
            crate::services::category_service::CategoryInfo,

            // Admin
            crate::services::admin_service::PartnerInfo,
            crate::services::admin_service::AssignQrRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints. Supports email/password and Google sign-in plus partner registration."),
        (name = "Account", description = "Profile management and soft account deletion for the signed-in user."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Followers", description = "Follow a hotel, record QR visits and pay a bill with the visit-based discount applied."),
        (name = "Menu", description = "Per-hotel menu item management for partner accounts."),
        (name = "Offers", description = "Time-bounded discounts on menu items, with public comments and likes."),
        (name = "Categories", description = "Per-hotel category labels used by the menu and offer forms."),
        (name = "QR", description = "Printed QR code resolution and scan counting."),
        (name = "Admin", description = "Super-admin console: partner verification, QR assignment and offer oversight."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
