use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

static MIGRATOR: Migrator = sqlx::migrate!("./db/migrations");

#[tokio::main]
async fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=db/migrations");

    let out_dir: PathBuf = env::var("OUT_DIR").context("OUT_DIR is not set")?.into();
    setup_db(out_dir.join("library.db")).await
}

/// Builds a schema-only database so the `query!` macros can check statements.
async fn setup_db(db_path: PathBuf) -> Result<()> {
    // start clean so an edited migration never trips a checksum mismatch
    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }
    let db_url = format!("sqlite://{}", db_path.display());

    let connect_options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await?;

    MIGRATOR.run(&pool).await?;
    pool.close().await;

    // DATABASE_URL is read by sqlx at compile time only
    println!("cargo::rustc-env=DATABASE_URL={}", db_url);

    Ok(())
}
