pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod hotels;
pub mod menu;
pub mod offers;
pub mod qr;
pub mod swagger;
