mod book;

pub use book::*;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path};
use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{sqlite::Database, AppState};

const NOT_FOUND: AppError = AppError::NotFound("Book not found");

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/api/books", get(get_books).post(create_book))
        .route(
            "/api/books/{id}",
            get(get_book_by_id).put(update_book).delete(delete_book),
        )
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(db))]
pub async fn get_books(State(db): State<Database>) -> AppResult<Json<Vec<Book>>> {
    let books = Book::all(db.as_ref()).await?;
    tracing::debug!(count = books.len(), "Listed books");

    Ok(Json(books))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(db))]
pub async fn get_book_by_id(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    match Book::from_id(id, db.as_ref()).await? {
        Some(book) => Ok(Json(book)),
        None => Err(NOT_FOUND),
    }
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(db))]
pub async fn create_book(
    State(db): State<Database>,
    JsonBody(params): JsonBody<BookParams>,
) -> AppResult<impl IntoResponse> {
    let book = Book::create(params, db.as_ref()).await?;
    tracing::info!(id = book.id, "Created book");

    Ok((StatusCode::CREATED, Json(book)))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(db))]
pub async fn update_book(
    State(db): State<Database>,
    Path(id): Path<i64>,
    JsonBody(params): JsonBody<BookParams>,
) -> AppResult<Json<Book>> {
    let book = Book::update(id, params, db.as_ref())
        .await?
        .ok_or(NOT_FOUND)?;

    Ok(Json(book))
}

#[debug_handler(state = AppState)]
#[tracing::instrument(skip(db))]
pub async fn delete_book(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageBody>> {
    Book::delete(id, db.as_ref()).await?.ok_or(NOT_FOUND)?;
    tracing::info!(id, "Deleted book");

    Ok(Json(MessageBody {
        message: "Book deleted successfully".to_string(),
    }))
}
