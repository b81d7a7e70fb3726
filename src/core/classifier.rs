// Assigns a category to an item name by matching against category keywords
//
// Three passes, strictest first. The first pass that matches anything wins;
// passes are never blended.

use crate::db::Category;
use regex::Regex;

/// Classify an item name against a set of categories.
///
/// Returns the owning category's name, or `None` when nothing matches.
/// `None` is a normal outcome, not an error; the decision to fall back to
/// the unassigned label belongs to the caller.
///
/// Matching order:
/// 1. exact match against a keyword (case/whitespace-insensitive)
/// 2. keyword as a whole word inside the name
/// 3. keyword as a substring anywhere in the name, longest keyword wins
///
/// Categories are scanned in the order given, keywords in the order stored,
/// so earlier entries win ties within a pass.
pub fn classify<'a>(item_name: &str, categories: &'a [Category]) -> Option<&'a str> {
    let normalized = item_name.trim().to_lowercase();
    if normalized.is_empty() || categories.is_empty() {
        return None;
    }

    // Keywords live as JSON in storage; parse each list once up front.
    let keyword_lists: Vec<Vec<String>> =
        categories.iter().map(|c| c.keyword_list()).collect();

    // First pass: exact matches
    for (category, keywords) in categories.iter().zip(&keyword_lists) {
        for keyword in keywords {
            if normalized == keyword.to_lowercase() {
                return Some(&category.name);
            }
        }
    }

    // Second pass: whole-word matches. Keeps "ham" from hitting "hamburger".
    for (category, keywords) in categories.iter().zip(&keyword_lists) {
        for keyword in keywords {
            let keyword = keyword.to_lowercase();
            if keyword.is_empty() {
                continue;
            }
            let pattern = format!(r"\b{}\b", regex::escape(&keyword));
            let Ok(word_boundary) = Regex::new(&pattern) else {
                continue;
            };
            if word_boundary.is_match(&normalized) {
                return Some(&category.name);
            }
        }
    }

    // Third pass: substring matches, longest keyword wins. Longer keywords
    // are assumed more intentional. Ties keep scan order.
    let mut best: Option<(&'a str, usize)> = None;
    for (category, keywords) in categories.iter().zip(&keyword_lists) {
        for keyword in keywords {
            let keyword = keyword.to_lowercase();
            if keyword.is_empty() || !normalized.contains(&keyword) {
                continue;
            }
            let length = keyword.chars().count();
            if best.map_or(true, |(_, best_length)| length > best_length) {
                best = Some((&category.name, length));
            }
        }
    }

    best.map(|(name, _)| name)
}
