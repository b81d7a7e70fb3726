/// Grouping and category normalization
///
/// Storage historically carried three spellings of "no category": NULL, the
/// empty string, and the literal label "Inne". In memory there is exactly
/// one representation, `ItemCategory`; the conversion happens here, at the
/// boundary, and nowhere else.

/// Display label for items with no assigned category.
/// Not a real category; never written to storage.
pub const UNASSIGNED_LABEL: &str = "Inne";

/// An item's category, with "no category" as an explicit state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCategory {
    Assigned(String),
    Unassigned,
}

impl ItemCategory {
    /// Build from a stored column value (NULL, empty and legacy literal
    /// "Inne" all mean unassigned)
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some(name) if !name.trim().is_empty() && name != UNASSIGNED_LABEL => {
                ItemCategory::Assigned(name.to_string())
            }
            _ => ItemCategory::Unassigned,
        }
    }

    /// Build from a user's category choice (empty or the unassigned label
    /// both mean "no category")
    pub fn from_choice(raw: &str) -> Self {
        if raw.is_empty() || raw == UNASSIGNED_LABEL {
            ItemCategory::Unassigned
        } else {
            ItemCategory::Assigned(raw.to_string())
        }
    }

    /// The label shown to the user
    pub fn label(&self) -> &str {
        match self {
            ItemCategory::Assigned(name) => name,
            ItemCategory::Unassigned => UNASSIGNED_LABEL,
        }
    }

    /// The value written to storage: a real name, or NULL
    pub fn to_stored(&self) -> Option<String> {
        match self {
            ItemCategory::Assigned(name) => Some(name.clone()),
            ItemCategory::Unassigned => None,
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Anything that carries an optional category label
pub trait Categorized {
    fn category(&self) -> Option<&str>;
}

impl Categorized for crate::db::Item {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// A group of items sharing one category label
#[derive(Debug)]
pub struct CategoryGroup<'a, T> {
    pub label: String,
    pub items: Vec<&'a T>,
}

/// Group items by category label.
///
/// Groups appear in first-occurrence order of the input; item order within
/// a group is preserved. Items without a category land under
/// [`UNASSIGNED_LABEL`].
pub fn group_by_category<T: Categorized>(items: &[T]) -> Vec<CategoryGroup<'_, T>> {
    let mut groups: Vec<CategoryGroup<'_, T>> = Vec::new();

    for item in items {
        let label = ItemCategory::from_stored(item.category()).label().to_string();

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                label,
                items: vec![item],
            }),
        }
    }

    groups
}
