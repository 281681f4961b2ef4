//! # Blogly Infrastructure
//!
//! Concrete implementations of the ports defined in `blogly-core`, backed by SeaORM.
//!
//! ## Feature Flags
//!
//! - `sqlite` - SQLite support in addition to PostgreSQL

pub mod database;

pub use database::{DatabaseConfig, SeaOrmStore, connect};
