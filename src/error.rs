/// Error types for koszyk
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for koszyk operations
#[derive(Error, Debug)]
pub enum KoszykError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Shop not found by name
    #[error("Shop not found: {0}")]
    ShopNotFound(String),

    /// Item not found by id
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Category not found by name
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Invalid item input (empty name, etc.)
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for koszyk operations
pub type Result<T> = std::result::Result<T, KoszykError>;

/// Convert KoszykError to a user-friendly error message
impl KoszykError {
    pub fn user_message(&self) -> String {
        match self {
            KoszykError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            KoszykError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            KoszykError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            KoszykError::ShopNotFound(name) => {
                format!("Shop '{}' does not exist. Run 'koszyk shops' to list them.", name)
            }
            KoszykError::ItemNotFound(id) => {
                format!("No item with id {}. Run 'koszyk list' to see items.", id)
            }
            KoszykError::CategoryNotFound(name) => {
                format!(
                    "Category '{}' does not exist. Run 'koszyk categories' to list them.",
                    name
                )
            }
            KoszykError::InvalidItem(reason) => {
                format!("Invalid item: {}", reason)
            }
            KoszykError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            KoszykError::Generic(msg) => msg.clone(),
        }
    }
}
