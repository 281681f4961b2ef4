//! Database access: entities, repositories and request-scoped transactions.

mod base;
mod connections;
mod repositories;
mod unit_of_work;

pub mod entity;

pub use base::{Listing, SeaOrmRepository};
pub use connections::{DatabaseConfig, connect};
pub use repositories::{SeaOrmPostRepository, SeaOrmTagRepository, SeaOrmUserRepository};
pub use unit_of_work::{SeaOrmStore, SeaOrmUnitOfWork};
