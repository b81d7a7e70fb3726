/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named shopping list ("shop")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub created_at: String, // ISO 8601 format from SQLite
}

/// A category bucket with its matching keywords
///
/// Keywords are an ordered list of lowercase strings, stored as a JSON
/// array. New keywords are only ever appended, never removed, so insertion
/// order is stable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub keywords: String, // JSON array
    pub position: i64,
    pub created_at: String, // ISO 8601 format from SQLite
}

impl Category {
    /// Parse keywords from JSON string
    pub fn keyword_list(&self) -> Vec<String> {
        serde_json::from_str(&self.keywords).unwrap_or_default()
    }

    /// Set keywords as JSON string
    pub fn set_keyword_list(&mut self, keywords: Vec<String>) -> Result<(), serde_json::Error> {
        self.keywords = serde_json::to_string(&keywords)?;
        Ok(())
    }
}

/// A single shopping-list entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub category: Option<String>, // NULL when unassigned
    pub qty: Option<String>,
    pub done: bool,
    pub created_at: String, // ISO 8601 format from SQLite
    pub updated_at: String, // ISO 8601 format from SQLite
}

/// Input for inserting a new item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInput {
    pub shop_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub qty: Option<String>,
}
