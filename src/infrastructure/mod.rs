pub mod auth;
pub mod database;
pub mod image_archive;
pub mod repositories;
