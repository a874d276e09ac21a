// ==================== MENU MANAGEMENT ====================
// Per-hotel menu item CRUD. Every operation is scoped to the hotel id taken
// from the caller's token, never from the request body.

use crate::{database::MongoDB, models::MenuItem};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "menu_items";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddMenuItemRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_top: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_top: Option<bool>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MenuItemInfo {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub is_top: bool,
}

impl From<MenuItem> for MenuItemInfo {
    fn from(item: MenuItem) -> Self {
        MenuItemInfo {
            id: item._id.map(|id| id.to_hex()).unwrap_or_default(),
            hotel_id: item.hotel_id,
            name: item.name,
            price: item.price,
            image: item.image,
            description: item.description,
            category: item.category,
            is_top: item.is_top,
        }
    }
}

pub fn parse_item_id(id: &str) -> Result<ObjectId, String> {
    ObjectId::parse_str(id).map_err(|_| "Invalid menu item ID".to_string())
}

pub async fn list_menu(db: &MongoDB, hotel_id: &str) -> Result<Vec<MenuItemInfo>, String> {
    let collection = db.collection::<MenuItem>(COLLECTION);

    let mut cursor = collection
        .find(doc! { "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Failed to fetch menu: {}", e))?;

    let mut items = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(item) => items.push(MenuItemInfo::from(item)),
            Err(e) => log::error!("❌ Error reading menu item: {}", e),
        }
    }

    Ok(items)
}

pub async fn get_menu_item(db: &MongoDB, hotel_id: &str, item_id: &str) -> Result<MenuItem, String> {
    let object_id = parse_item_id(item_id)?;
    db.collection::<MenuItem>(COLLECTION)
        .find_one(doc! { "_id": object_id, "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "Menu item not found".to_string())
}

pub async fn add_item(
    db: &MongoDB,
    hotel_id: &str,
    request: AddMenuItemRequest,
) -> Result<MenuItemInfo, String> {
    let collection = db.collection::<MenuItem>(COLLECTION);

    let item = MenuItem {
        _id: None,
        hotel_id: hotel_id.to_string(),
        name: request.name,
        price: request.price,
        image: request.image,
        description: request.description,
        category: request.category,
        is_top: request.is_top,
    };

    let result = collection
        .insert_one(&item)
        .await
        .map_err(|e| format!("Failed to add menu item: {}", e))?;

    let mut stored = item;
    stored._id = result.inserted_id.as_object_id();

    log::info!("🍽️ Menu item added for hotel {}: {}", hotel_id, stored.name);
    Ok(MenuItemInfo::from(stored))
}

pub async fn update_item(
    db: &MongoDB,
    hotel_id: &str,
    item_id: &str,
    request: UpdateMenuItemRequest,
) -> Result<(), String> {
    let object_id = parse_item_id(item_id)?;
    let collection = db.collection::<MenuItem>(COLLECTION);

    let mut update_set = doc! {};
    if let Some(ref name) = request.name {
        update_set.insert("name", name);
    }
    if let Some(price) = request.price {
        update_set.insert("price", price);
    }
    if let Some(ref image) = request.image {
        update_set.insert("image", image);
    }
    if let Some(ref description) = request.description {
        update_set.insert("description", description);
    }
    if let Some(ref category) = request.category {
        update_set.insert("category", category);
    }
    if let Some(is_top) = request.is_top {
        update_set.insert("is_top", is_top);
    }

    if update_set.is_empty() {
        return Err("No fields to update".to_string());
    }

    let result = collection
        .update_one(
            doc! { "_id": object_id, "hotel_id": hotel_id },
            doc! { "$set": update_set },
        )
        .await
        .map_err(|e| format!("Failed to update menu item: {}", e))?;

    if result.matched_count == 0 {
        return Err("Menu item not found".to_string());
    }

    Ok(())
}

pub async fn delete_item(db: &MongoDB, hotel_id: &str, item_id: &str) -> Result<(), String> {
    let object_id = parse_item_id(item_id)?;
    let collection = db.collection::<MenuItem>(COLLECTION);

    let result = collection
        .delete_one(doc! { "_id": object_id, "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Failed to delete menu item: {}", e))?;

    if result.deleted_count == 0 {
        return Err("Menu item not found".to_string());
    }

    log::info!("🗑️ Menu item {} deleted for hotel {}", item_id, hotel_id);
    Ok(())
}
