//! Migration CLI tool.
//!
//! Run once per deployment, e.g. `migration up`. The server never creates tables itself.
//! `run_cli` installs its own tracing subscriber, so none is set up here.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(migration::Migrator).await;
}
