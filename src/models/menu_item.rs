use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A dish on a hotel's menu. Owned by exactly one hotel account; every query
/// and mutation is filtered by `hotel_id`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MenuItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub hotel_id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Highlighted on the hotel page
    #[serde(default)]
    pub is_top: bool,
}
