// Keyword learning from user category choices
//
// When the user picks or overrides a category for an item, the item's name
// becomes a new keyword for that category. The coordinator only computes
// the extended keyword list; writing it is delegated to an injected async
// callback, so this module knows nothing about storage.

use crate::core::classifier::classify;
use crate::core::grouping::{ItemCategory, UNASSIGNED_LABEL};
use crate::db::Category;
use crate::error::Result;
use std::future::Future;

/// Tunable learning behavior
#[derive(Debug, Clone, Default)]
pub struct LearningConfig {
    /// Whether picking the unassigned label in an edit counts as an
    /// explicit category choice. Off by default: choosing "Inne" then
    /// never triggers a learning attempt. On, the choice is treated like
    /// any other name and learning proceeds only if a category with that
    /// literal name actually exists.
    pub learn_from_unassigned_label: bool,
}

/// What a learning call decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningOutcome {
    /// The category to save on the item
    pub category: ItemCategory,
    /// Whether a new keyword was persisted
    pub learned: bool,
}

/// Decides when a user's category choice should extend a category's
/// keyword list
#[derive(Debug, Clone, Default)]
pub struct LearningCoordinator {
    config: LearningConfig,
}

impl LearningCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LearningConfig) -> Self {
        Self { config }
    }

    /// Record the category the user picked for a brand-new item.
    ///
    /// Called after the classifier found no match and the user chose a
    /// category by hand. Picking nothing or the unassigned label resolves
    /// to unassigned and nothing is learned. Otherwise the lowercased item
    /// name is appended to the chosen category's keywords (if not already
    /// present) and handed to `persist_keywords` exactly once.
    ///
    /// A chosen name that matches no known category is tolerated: the name
    /// is still resolved as the category to save, but no learning happens.
    pub async fn record_new_item_category<F, Fut>(
        &self,
        item_name: &str,
        chosen_category: &str,
        categories: &[Category],
        persist_keywords: F,
    ) -> Result<LearningOutcome>
    where
        F: FnOnce(i64, Vec<String>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let resolved = ItemCategory::from_choice(chosen_category);

        if let ItemCategory::Assigned(name) = &resolved {
            let keyword = item_name.to_lowercase();
            if let Some(learned) =
                try_learn(name, keyword, categories, persist_keywords).await?
            {
                return Ok(LearningOutcome {
                    category: resolved,
                    learned,
                });
            }
        }

        Ok(LearningOutcome {
            category: resolved,
            learned: false,
        })
    }

    /// Record the category state of an edited item.
    ///
    /// Re-runs the classifier to find what the automatic category would be.
    /// The resolved category is the explicit choice if there is one, else
    /// the automatic result, else unassigned. Learning triggers only when
    /// the user is overriding: the explicit choice is non-empty and differs
    /// from what the classifier would have picked. The keyword appended is
    /// the trimmed, lowercased item name.
    pub async fn record_edited_item_category<F, Fut>(
        &self,
        item_name: &str,
        explicit_category: &str,
        categories: &[Category],
        persist_keywords: F,
    ) -> Result<LearningOutcome>
    where
        F: FnOnce(i64, Vec<String>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let auto_category = classify(item_name, categories);

        let resolved = if !explicit_category.is_empty() {
            ItemCategory::from_choice(explicit_category)
        } else if let Some(name) = auto_category {
            ItemCategory::Assigned(name.to_string())
        } else {
            ItemCategory::Unassigned
        };

        let is_override =
            !explicit_category.is_empty() && auto_category != Some(explicit_category);
        let counts_as_explicit = self.config.learn_from_unassigned_label
            || explicit_category != UNASSIGNED_LABEL;

        if is_override && counts_as_explicit {
            let keyword = item_name.trim().to_lowercase();
            if let Some(learned) =
                try_learn(explicit_category, keyword, categories, persist_keywords).await?
            {
                return Ok(LearningOutcome {
                    category: resolved,
                    learned,
                });
            }
        }

        Ok(LearningOutcome {
            category: resolved,
            learned: false,
        })
    }
}

/// Append `keyword` to the named category and persist the new list.
///
/// Returns `Ok(None)` when the category name is unknown (silently
/// tolerated), `Ok(Some(false))` when the keyword was already present, and
/// `Ok(Some(true))` when the extended list was handed to the callback.
async fn try_learn<F, Fut>(
    category_name: &str,
    keyword: String,
    categories: &[Category],
    persist_keywords: F,
) -> Result<Option<bool>>
where
    F: FnOnce(i64, Vec<String>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let Some(category) = categories.iter().find(|c| c.name == category_name) else {
        return Ok(None);
    };

    let mut keywords = category.keyword_list();
    if keyword.is_empty() || keywords.contains(&keyword) {
        return Ok(Some(false));
    }

    keywords.push(keyword);
    persist_keywords(category.id, keywords).await?;

    Ok(Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn category(id: i64, name: &str, keywords: &[&str]) -> Category {
        Category {
            id,
            name: name.to_string(),
            keywords: serde_json::to_string(keywords).unwrap(),
            position: id,
            created_at: "2025-11-25T00:00:00Z".to_string(),
        }
    }

    /// Persist callback that records what it was called with
    struct PersistSpy {
        calls: Mutex<Vec<(i64, Vec<String>)>>,
    }

    impl PersistSpy {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, id: i64, keywords: Vec<String>) {
            self.calls.lock().unwrap().push((id, keywords));
        }

        fn calls(&self) -> Vec<(i64, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_new_item_learns_keyword() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(1, "Owoce", &["banan"])];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_new_item_category("Jabłko", "Owoce", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert_eq!(outcome.category, ItemCategory::Assigned("Owoce".to_string()));
        assert!(outcome.learned);
        assert_eq!(
            spy.calls(),
            vec![(1, vec!["banan".to_string(), "jabłko".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_new_item_known_keyword_is_not_repersisted() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(1, "Owoce", &["jabłko"])];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_new_item_category("Jabłko", "Owoce", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert_eq!(outcome.category, ItemCategory::Assigned("Owoce".to_string()));
        assert!(!outcome.learned);
        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_new_item_unassigned_choice_skips_learning() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(1, "Owoce", &["banan"])];
        let spy = PersistSpy::new();

        for choice in ["", UNASSIGNED_LABEL] {
            let outcome = coordinator
                .record_new_item_category("Jabłko", choice, &categories, |id, kws| {
                    spy.record(id, kws);
                    async { Ok(()) }
                })
                .await
                .unwrap();

            assert_eq!(outcome.category, ItemCategory::Unassigned);
            assert!(!outcome.learned);
        }

        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_new_item_unknown_category_is_tolerated() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(1, "Owoce", &["banan"])];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_new_item_category("Jabłko", "Warzywa", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        // The chosen name is still honored, but nothing is learned
        assert_eq!(
            outcome.category,
            ItemCategory::Assigned("Warzywa".to_string())
        );
        assert!(!outcome.learned);
        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_without_explicit_choice_resolves_automatically() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(2, "Nabiał", &["mleko"])];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_edited_item_category("Mleko", "", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        // Resolved via the classifier; no override, so no learning
        assert_eq!(outcome.category, ItemCategory::Assigned("Nabiał".to_string()));
        assert!(!outcome.learned);
        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_override_learns_trimmed_keyword() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![
            category(1, "Owoce", &["banan"]),
            category(2, "Nabiał", &["mleko"]),
        ];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_edited_item_category("  Mleko  ", "Owoce", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        // Classifier would say Nabiał; the user insists on Owoce
        assert_eq!(outcome.category, ItemCategory::Assigned("Owoce".to_string()));
        assert!(outcome.learned);
        assert_eq!(
            spy.calls(),
            vec![(1, vec!["banan".to_string(), "mleko".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_edit_matching_auto_result_does_not_learn() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(2, "Nabiał", &["mleko"])];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_edited_item_category("Mleko", "Nabiał", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert_eq!(outcome.category, ItemCategory::Assigned("Nabiał".to_string()));
        assert!(!outcome.learned);
        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_no_match_and_no_choice_resolves_unassigned() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(1, "Owoce", &["banan"])];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_edited_item_category("Śrubokręt", "", &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert_eq!(outcome.category, ItemCategory::Unassigned);
        assert!(!outcome.learned);
        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_unassigned_label_is_not_explicit_by_default() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![
            category(2, "Nabiał", &["mleko"]),
            category(3, UNASSIGNED_LABEL, &[]),
        ];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_edited_item_category("Mleko", UNASSIGNED_LABEL, &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        // Resolves to unassigned and, with the default config, never even
        // attempts a keyword update
        assert_eq!(outcome.category, ItemCategory::Unassigned);
        assert!(!outcome.learned);
        assert!(spy.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_unassigned_label_can_count_as_explicit() {
        let coordinator = LearningCoordinator::with_config(LearningConfig {
            learn_from_unassigned_label: true,
        });
        let categories = vec![
            category(2, "Nabiał", &["mleko"]),
            category(3, UNASSIGNED_LABEL, &[]),
        ];
        let spy = PersistSpy::new();

        let outcome = coordinator
            .record_edited_item_category("Mleko", UNASSIGNED_LABEL, &categories, |id, kws| {
                spy.record(id, kws);
                async { Ok(()) }
            })
            .await
            .unwrap();

        // With the flag on the label is a real override, so the category
        // that happens to carry that name learns the keyword
        assert_eq!(outcome.category, ItemCategory::Unassigned);
        assert!(outcome.learned);
        assert_eq!(spy.calls(), vec![(3, vec!["mleko".to_string()])]);
    }

    #[tokio::test]
    async fn test_persist_failure_propagates() {
        let coordinator = LearningCoordinator::new();
        let categories = vec![category(1, "Owoce", &["banan"])];

        let result = coordinator
            .record_new_item_category("Jabłko", "Owoce", &categories, |_, _| async {
                Err(crate::error::KoszykError::Generic("write failed".to_string()))
            })
            .await;

        assert!(result.is_err());
    }
}
