pub mod category;
pub mod menu_item;
pub mod offer;
pub mod qrcode;
pub mod user;

pub use category::*;
pub use menu_item::*;
pub use offer::*;
pub use qrcode::*;
pub use user::*;
