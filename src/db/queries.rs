/// SQL query functions for database operations
///
/// All queries use sqlx for compile-time verification and type safety.

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use chrono::Utc;
use sqlx::Row;

/// Name of the shop created on first run
pub const DEFAULT_SHOP_NAME: &str = "Dom";

impl Database {
    // ---- shops ----

    /// Get the first shop, creating the default one if none exist
    ///
    /// Used by the CLI when no shop is named explicitly.
    pub async fn ensure_default_shop(&self) -> Result<Shop> {
        if let Some(shop) =
            sqlx::query_as::<_, Shop>("SELECT * FROM shops ORDER BY id LIMIT 1")
                .fetch_optional(self.pool())
                .await?
        {
            return Ok(shop);
        }

        let shop = sqlx::query_as::<_, Shop>("INSERT INTO shops (name) VALUES (?) RETURNING *")
            .bind(DEFAULT_SHOP_NAME)
            .fetch_one(self.pool())
            .await?;

        Ok(shop)
    }

    /// Create a new shop
    pub async fn create_shop(&self, name: &str) -> Result<Shop> {
        let shop = sqlx::query_as::<_, Shop>("INSERT INTO shops (name) VALUES (?) RETURNING *")
            .bind(name)
            .fetch_one(self.pool())
            .await?;

        Ok(shop)
    }

    /// Get all shops
    pub async fn get_shops(&self) -> Result<Vec<Shop>> {
        let shops = sqlx::query_as::<_, Shop>("SELECT * FROM shops ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(shops)
    }

    /// Get a shop by name
    pub async fn get_shop_by_name(&self, name: &str) -> Result<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>("SELECT * FROM shops WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;

        Ok(shop)
    }

    /// Delete a shop and all its items (cascade)
    pub async fn delete_shop(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM shops WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // ---- categories ----

    /// Get all categories ordered by position
    ///
    /// This is the snapshot handed to the classifier and the learning
    /// coordinator; it is fetched fresh before every classification call.
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY position, id")
                .fetch_all(self.pool())
                .await?;

        Ok(categories)
    }

    /// Get a category by name
    pub async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;

        Ok(category)
    }

    /// Create a category with an initial keyword list
    ///
    /// Keywords are lowercased on the way in; the classifier assumes stored
    /// keywords are already lowercase. The new category is placed last.
    pub async fn create_category(&self, name: &str, keywords: &[String]) -> Result<Category> {
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let keywords_json = serde_json::to_string(&lowered)?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, keywords, position)
            VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0) FROM categories))
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(keywords_json)
        .fetch_one(self.pool())
        .await?;

        Ok(category)
    }

    /// Replace a category's keyword list
    ///
    /// This is the persistence side of keyword learning: the coordinator
    /// computes the extended list and hands it here through its callback.
    pub async fn update_category_keywords(&self, id: i64, keywords: &[String]) -> Result<()> {
        let keywords_json = serde_json::to_string(keywords)?;

        sqlx::query("UPDATE categories SET keywords = ? WHERE id = ?")
            .bind(keywords_json)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Delete a category
    ///
    /// Items keep their stored category label; they simply stop matching a
    /// real category and group under the unassigned label at display time.
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    // ---- items ----

    /// Insert a new item
    pub async fn add_item(&self, input: ItemInput) -> Result<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (shop_id, name, category, qty)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(input.shop_id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.qty)
        .fetch_one(self.pool())
        .await?;

        Ok(item)
    }

    /// Get all items for a shop, newest first
    pub async fn get_items(&self, shop_id: i64) -> Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE shop_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(shop_id)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    /// Get item by ID
    pub async fn get_item_by_id(&self, id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(item)
    }

    /// Update an item's name, quantity and category
    pub async fn update_item(
        &self,
        id: i64,
        name: &str,
        qty: Option<&str>,
        category: Option<&str>,
    ) -> Result<Item> {
        let now = Utc::now().to_rfc3339();

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET name = ?, qty = ?, category = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(qty)
        .bind(category)
        .bind(now)
        .bind(id)
        .fetch_one(self.pool())
        .await?;

        Ok(item)
    }

    /// Toggle done status of an item
    pub async fn toggle_done(&self, id: i64) -> Result<bool> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE items SET done = NOT done, updated_at = ? WHERE id = ? RETURNING done",
        )
        .bind(now)
        .bind(id)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Delete an item
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Delete all items from a shop
    pub async fn clear_items(&self, shop_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM items WHERE shop_id = ?")
            .bind(shop_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_default_shop() {
        let db = Database::new_test().await.unwrap();

        let shop = db.ensure_default_shop().await.unwrap();
        assert_eq!(shop.name, DEFAULT_SHOP_NAME);

        // Second call returns the same shop, not a new one
        let again = db.ensure_default_shop().await.unwrap();
        assert_eq!(again.id, shop.id);
        assert_eq!(db.get_shops().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_and_find_shop() {
        let db = Database::new_test().await.unwrap();

        let shop = db.create_shop("Biedronka").await.unwrap();
        assert!(shop.id > 0);

        let found = db.get_shop_by_name("Biedronka").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, shop.id);

        assert!(db.get_shop_by_name("Lidl").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_shop_cascades_items() {
        let db = Database::new_test().await.unwrap();
        let shop = db.create_shop("Biedronka").await.unwrap();

        db.add_item(ItemInput {
            shop_id: shop.id,
            name: "Mleko".to_string(),
            category: None,
            qty: None,
        })
        .await
        .unwrap();

        db.delete_shop(shop.id).await.unwrap();

        let stats = db.stats().await.unwrap();
        assert_eq!(stats.total_items, 0);
    }

    #[tokio::test]
    async fn test_category_crud() {
        let db = Database::new_test().await.unwrap();

        let owoce = db
            .create_category("Owoce", &["Banan".to_string(), "jabłko".to_string()])
            .await
            .unwrap();
        // Keywords are lowercased on insert
        assert_eq!(owoce.keyword_list(), vec!["banan", "jabłko"]);

        let nabial = db.create_category("Nabiał", &[]).await.unwrap();
        assert!(nabial.position > owoce.position);

        let all = db.get_categories().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Owoce");

        db.delete_category(owoce.id).await.unwrap();
        assert_eq!(db.get_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_category_keywords() {
        let db = Database::new_test().await.unwrap();

        let category = db
            .create_category("Owoce", &["banan".to_string()])
            .await
            .unwrap();

        db.update_category_keywords(
            category.id,
            &["banan".to_string(), "jabłko".to_string()],
        )
        .await
        .unwrap();

        let reloaded = db.get_category_by_name("Owoce").await.unwrap().unwrap();
        assert_eq!(reloaded.keyword_list(), vec!["banan", "jabłko"]);
    }

    #[tokio::test]
    async fn test_item_crud() {
        let db = Database::new_test().await.unwrap();
        let shop = db.ensure_default_shop().await.unwrap();

        let item = db
            .add_item(ItemInput {
                shop_id: shop.id,
                name: "Mleko".to_string(),
                category: Some("Nabiał".to_string()),
                qty: Some("2".to_string()),
            })
            .await
            .unwrap();
        assert!(item.id > 0);
        assert!(!item.done);

        let updated = db
            .update_item(item.id, "Mleko kokosowe", Some("1"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Mleko kokosowe");
        assert!(updated.category.is_none());

        let done = db.toggle_done(item.id).await.unwrap();
        assert!(done);
        let done = db.toggle_done(item.id).await.unwrap();
        assert!(!done);

        db.delete_item(item.id).await.unwrap();
        assert!(db.get_item_by_id(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_items_newest_first() {
        let db = Database::new_test().await.unwrap();
        let shop = db.ensure_default_shop().await.unwrap();

        for name in ["Mleko", "Chleb", "Masło"] {
            db.add_item(ItemInput {
                shop_id: shop.id,
                name: name.to_string(),
                category: None,
                qty: None,
            })
            .await
            .unwrap();
        }

        let items = db.get_items(shop.id).await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Masło");
    }

    #[tokio::test]
    async fn test_clear_items() {
        let db = Database::new_test().await.unwrap();
        let shop = db.ensure_default_shop().await.unwrap();
        let other = db.create_shop("Biedronka").await.unwrap();

        for shop_id in [shop.id, other.id] {
            db.add_item(ItemInput {
                shop_id,
                name: "Mleko".to_string(),
                category: None,
                qty: None,
            })
            .await
            .unwrap();
        }

        db.clear_items(shop.id).await.unwrap();

        assert!(db.get_items(shop.id).await.unwrap().is_empty());
        assert_eq!(db.get_items(other.id).await.unwrap().len(), 1);
    }
}
