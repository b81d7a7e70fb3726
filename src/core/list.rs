// Shopping list operations
//
// Wires the classifier and the learning coordinator to storage. Flow for a
// new item: classify first; if nothing matches the caller is told so and
// can re-add with an explicit category, which is when learning kicks in.

use crate::core::classifier::classify;
use crate::core::grouping::ItemCategory;
use crate::core::learning::{LearningConfig, LearningCoordinator};
use crate::db::{Database, Item, ItemInput};
use crate::error::{KoszykError, Result};
use std::sync::Arc;

/// Result of adding an item
#[derive(Debug)]
pub struct AddedItem {
    pub item: Item,
    pub category: ItemCategory,
    /// True when the classifier picked the category on its own
    pub auto_classified: bool,
    /// True when a new keyword was learned from an explicit choice
    pub learned: bool,
}

/// Result of editing an item
#[derive(Debug)]
pub struct EditedItem {
    pub item: Item,
    pub category: ItemCategory,
    pub learned: bool,
}

/// High-level shopping list operations on top of the database
pub struct ListService {
    db: Arc<Database>,
    coordinator: LearningCoordinator,
}

impl ListService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            coordinator: LearningCoordinator::new(),
        }
    }

    pub fn with_config(db: Arc<Database>, config: LearningConfig) -> Self {
        Self {
            db,
            coordinator: LearningCoordinator::with_config(config),
        }
    }

    /// Add an item to a shop.
    ///
    /// With `chosen_category` the choice is recorded through the learning
    /// coordinator (this is the path after the classifier came up empty and
    /// the user answered). Without it the classifier decides; a no-match
    /// saves the item unassigned.
    pub async fn add_item(
        &self,
        shop_id: i64,
        name: &str,
        qty: Option<&str>,
        chosen_category: Option<&str>,
    ) -> Result<AddedItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KoszykError::InvalidItem("empty name".to_string()));
        }

        let categories = self.db.get_categories().await?;

        let (category, learned, auto_classified) = match chosen_category {
            Some(chosen) => {
                let db = Arc::clone(&self.db);
                let outcome = self
                    .coordinator
                    .record_new_item_category(name, chosen, &categories, move |category_id, keywords| async move {
                        db.update_category_keywords(category_id, &keywords).await
                    })
                    .await?;
                (outcome.category, outcome.learned, false)
            }
            None => match classify(name, &categories) {
                Some(matched) => (ItemCategory::Assigned(matched.to_string()), false, true),
                None => (ItemCategory::Unassigned, false, false),
            },
        };

        let item = self
            .db
            .add_item(ItemInput {
                shop_id,
                name: name.to_string(),
                category: category.to_stored(),
                qty: qty.map(|q| q.to_string()),
            })
            .await?;

        Ok(AddedItem {
            item,
            category,
            auto_classified,
            learned,
        })
    }

    /// Edit an item's name, quantity and/or category.
    ///
    /// The explicit category defaults to the item's currently stored label,
    /// mirroring an edit form with the selector pre-filled. Passing the
    /// empty string asks for re-classification of the (possibly new) name.
    pub async fn edit_item(
        &self,
        id: i64,
        name: Option<&str>,
        qty: Option<&str>,
        category: Option<&str>,
    ) -> Result<EditedItem> {
        let item = self
            .db
            .get_item_by_id(id)
            .await?
            .ok_or(KoszykError::ItemNotFound(id))?;

        let new_name = name.map(str::trim).unwrap_or(&item.name);
        if new_name.is_empty() {
            return Err(KoszykError::InvalidItem("empty name".to_string()));
        }

        let explicit = category.unwrap_or_else(|| item.category.as_deref().unwrap_or(""));

        let categories = self.db.get_categories().await?;
        let db = Arc::clone(&self.db);
        let outcome = self
            .coordinator
            .record_edited_item_category(new_name, explicit, &categories, move |category_id, keywords| async move {
                db.update_category_keywords(category_id, &keywords).await
            })
            .await?;

        let new_qty = qty.or(item.qty.as_deref());
        let stored = outcome.category.to_stored();
        let item = self
            .db
            .update_item(id, new_name, new_qty, stored.as_deref())
            .await?;

        Ok(EditedItem {
            item,
            category: outcome.category,
            learned: outcome.learned,
        })
    }
}
