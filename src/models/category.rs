use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Free-form menu category label, scoped to one hotel.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub hotel_id: String,
    pub name: String,
}
