/// koszyk library
///
/// Core functionality for a shopping list that learns item categories.

pub mod core;
pub mod db;
pub mod error;

// Re-exports for convenience
pub use db::Database;
pub use error::{KoszykError, Result};
