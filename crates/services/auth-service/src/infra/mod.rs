//! Infrastructure layer - credential database.

mod db;
pub mod migrations;

pub use db::Database;
pub use migrations::Migrator;
