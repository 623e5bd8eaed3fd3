use anyhow::Result;
use axum::extract::FromRef;
use serde::Deserialize;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_url")]
    pub url: String,
    #[serde(default = "Settings::default_max_connections")]
    pub max_connections: u32,
}

impl Settings {
    fn default_url() -> String {
        "sqlite://library.db".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
        }
    }
}

/// Opens the pool and brings the schema up to date.
pub async fn create_pool(settings: &Settings) -> Result<SqlitePool> {
    match Sqlite::database_exists(&settings.url).await? {
        true => tracing::info!("Database already exists"),
        false => Sqlite::create_database(&settings.url).await?,
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await?;

    sqlx::migrate!("db/migrations").run(&pool).await?;
    tracing::info!(max_connections = settings.max_connections, "Database pool ready");

    Ok(pool)
}

/// Pool handle handed to the book handlers.
#[derive(Clone)]
pub struct Database(SqlitePool);

impl AsRef<SqlitePool> for Database {
    fn as_ref(&self) -> &SqlitePool {
        &self.0
    }
}

impl FromRef<crate::AppState> for Database {
    fn from_ref(app: &crate::AppState) -> Self {
        Self(app.db.clone())
    }
}
