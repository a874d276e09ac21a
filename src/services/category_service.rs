// Per-hotel category labels used by the menu and offer forms.

use crate::{database::MongoDB, models::Category};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "categories";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoryInfo {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        CategoryInfo {
            id: category._id.map(|id| id.to_hex()).unwrap_or_default(),
            hotel_id: category.hotel_id,
            name: category.name,
        }
    }
}

pub async fn list_categories(db: &MongoDB, hotel_id: &str) -> Result<Vec<CategoryInfo>, String> {
    let collection = db.collection::<Category>(COLLECTION);

    let mut cursor = collection
        .find(doc! { "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Failed to fetch categories: {}", e))?;

    let mut categories = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(category) => categories.push(CategoryInfo::from(category)),
            Err(e) => log::error!("❌ Error reading category: {}", e),
        }
    }

    Ok(categories)
}

pub async fn add_category(
    db: &MongoDB,
    hotel_id: &str,
    request: AddCategoryRequest,
) -> Result<CategoryInfo, String> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err("Category name cannot be empty".to_string());
    }

    let collection = db.collection::<Category>(COLLECTION);

    // Same label twice for one hotel is a no-op style duplicate check
    let existing = collection
        .find_one(doc! { "hotel_id": hotel_id, "name": &name })
        .await
        .map_err(|e| format!("Database error: {}", e))?;
    if let Some(existing) = existing {
        return Ok(CategoryInfo::from(existing));
    }

    let category = Category {
        _id: None,
        hotel_id: hotel_id.to_string(),
        name,
    };

    let result = collection
        .insert_one(&category)
        .await
        .map_err(|e| format!("Failed to add category: {}", e))?;

    let mut stored = category;
    stored._id = result.inserted_id.as_object_id();

    Ok(CategoryInfo::from(stored))
}

pub async fn delete_category(db: &MongoDB, hotel_id: &str, category_id: &str) -> Result<(), String> {
    let object_id =
        ObjectId::parse_str(category_id).map_err(|_| "Invalid category ID".to_string())?;
    let collection = db.collection::<Category>(COLLECTION);

    let result = collection
        .delete_one(doc! { "_id": object_id, "hotel_id": hotel_id })
        .await
        .map_err(|e| format!("Failed to delete category: {}", e))?;

    if result.deleted_count == 0 {
        return Err("Category not found".to_string());
    }

    Ok(())
}
