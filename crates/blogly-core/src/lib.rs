//! # Blogly Core
//!
//! The domain layer of Blogly: users, posts and tags.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
