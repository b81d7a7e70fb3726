/// Core functionality modules
///
/// Contains the classification engine, keyword learning, category grouping
/// and the list operations built on top of them.

pub mod classifier;
pub mod grouping;
pub mod learning;
pub mod list;

pub use classifier::classify;
pub use grouping::{group_by_category, Categorized, CategoryGroup, ItemCategory, UNASSIGNED_LABEL};
pub use learning::{LearningConfig, LearningCoordinator, LearningOutcome};
pub use list::{AddedItem, EditedItem, ListService};
