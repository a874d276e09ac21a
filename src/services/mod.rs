pub mod admin_service;
pub mod auth_service;
pub mod category_service;
pub mod follower_service;
pub mod menu_service;
pub mod offer_service;
pub mod qr_service;

pub use admin_service::*;
pub use category_service::*;
pub use follower_service::*;
pub use menu_service::*;
pub use offer_service::*;
pub use qr_service::*;
