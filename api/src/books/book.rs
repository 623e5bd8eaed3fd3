use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
}

/// Body of a create or update. Missing fields are written as NULL and left to the schema.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BookParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl Book {
    pub async fn all(db: &SqlitePool) -> AppResult<Vec<Self>> {
        let books = sqlx::query_as!(
            Book,
            r#"
            SELECT id as "id!", title as "title!", author as "author!", isbn as "isbn?"
            FROM books
            "#
        )
        .fetch_all(db)
        .await?;

        Ok(books)
    }

    pub async fn from_id(id: i64, db: &SqlitePool) -> AppResult<Option<Self>> {
        let book = sqlx::query_as!(
            Book,
            r#"
            SELECT id as "id!", title as "title!", author as "author!", isbn as "isbn?"
            FROM books
            WHERE id = ?
            "#,
            id
        )
        .fetch_optional(db)
        .await?;

        Ok(book)
    }

    pub async fn create(params: BookParams, db: &SqlitePool) -> AppResult<Self> {
        let book = sqlx::query_as!(
            Book,
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES (?, ?, ?)
            RETURNING id as "id!", title as "title!", author as "author!", isbn as "isbn?"
            "#,
            params.title,
            params.author,
            params.isbn
        )
        .fetch_one(db)
        .await?;

        Ok(book)
    }

    /// Replaces all three fields at once; `None` when no row has this id.
    pub async fn update(id: i64, params: BookParams, db: &SqlitePool) -> AppResult<Option<Self>> {
        let book = sqlx::query_as!(
            Book,
            r#"
            UPDATE books
            SET title = ?, author = ?, isbn = ?
            WHERE id = ?
            RETURNING id as "id!", title as "title!", author as "author!", isbn as "isbn?"
            "#,
            params.title,
            params.author,
            params.isbn,
            id
        )
        .fetch_optional(db)
        .await?;

        Ok(book)
    }

    pub async fn delete(id: i64, db: &SqlitePool) -> AppResult<Option<Self>> {
        let book = sqlx::query_as!(
            Book,
            r#"
            DELETE FROM books
            WHERE id = ?
            RETURNING id as "id!", title as "title!", author as "author!", isbn as "isbn?"
            "#,
            id
        )
        .fetch_optional(db)
        .await?;

        Ok(book)
    }
}
