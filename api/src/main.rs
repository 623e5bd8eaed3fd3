mod books;
mod error;
mod extract;
mod settings;
mod sqlite;

use settings::Settings;

use anyhow::Result;
use sqlx::SqlitePool;
use tokio::{net::TcpListener, time::Instant};

use axum::{serve, Router};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    db: SqlitePool,
}

fn create_app(db: SqlitePool) -> Router {
    Router::new()
        .merge(books::router())
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(AppState { db })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let start = Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load()?;
    let db = sqlite::create_pool(&settings.sqlite).await?;
    info!(url = %settings.sqlite.url, "Connected to database");

    let app = create_app(db.clone());

    let listener = TcpListener::bind(settings.server.addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    // Create a shutdown signal handler
    let shutdown = async move {
        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = signal::ctrl_c() => {},
            _ = terminate => {},
        }
        let duration = start.elapsed();
        info!("Shutting down gracefully... in {:?}", duration);
    };

    // Start the server with graceful shutdown
    let server = serve(listener, app).with_graceful_shutdown(shutdown);

    if let Err(e) = server.await {
        tracing::error!("Server error: {}", e);
    }

    db.close().await;
    info!("Database pool closed");

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use tracing_test::traced_test;

    use crate::books::Book;
    use crate::error::ErrorBody;

    pub async fn create_test_pool() -> SqlitePool {
        // a single connection keeps every request on the same in-memory database
        sqlite::create_pool(&sqlite::Settings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap()
    }

    pub async fn create_test_server() -> TestServer {
        let app = create_app(create_test_pool().await);

        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_closed_pool_is_internal_error() {
        let db = create_test_pool().await;
        let server = TestServer::new(create_app(db.clone())).unwrap();
        db.close().await;

        let response = server.get("/api/books").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "Internal server error");
        assert!(logs_contain("request failed"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_book_lifecycle() {
        let server = create_test_server().await;

        let response = server
            .post("/api/books")
            .json(&serde_json::json!({ "title": "Dune", "author": "Herbert", "isbn": "111" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Book = response.json();
        assert_eq!(created.title, "Dune");
        let path = format!("/api/books/{}", created.id);

        let response = server.get(&path).await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Book>(), created);

        let response = server
            .put(&path)
            .json(&serde_json::json!({ "title": "Dune: Messiah", "author": "Herbert", "isbn": "111" }))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Book>().title, "Dune: Messiah");

        let response = server.delete(&path).await;
        response.assert_status(StatusCode::OK);
        response.assert_json(&serde_json::json!({ "message": "Book deleted successfully" }));

        let response = server.get(&path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&serde_json::json!({ "error": "Book not found" }));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unknown_route() {
        let server = create_test_server().await;
        let response = server.get("/api/authors").await;
        assert_eq!(response.status_code(), 404);
    }
}
