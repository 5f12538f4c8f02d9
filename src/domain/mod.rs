pub mod errors;
pub mod ids;
pub mod listing;
pub mod repositories;
pub mod wallpapers;

// Re-exports
pub use errors::RepositoryError;
