//! SeaORM entities.

pub mod credential;
