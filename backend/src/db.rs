use std::str::FromStr;

use anyhow::Context;
use chrono::Utc;
use shared::{CreateNoteRequest, Note, NoteChanges, NoteVector};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::structs::{NoteRow, ValidationError};

const NOTE_COLUMNS: &str = "id, title, content, color, created_at, updated_at";

pub enum Update {
    Applied(Note),
    NotFound,
    Rejected(ValidationError),
}

/// Opens the pool and makes sure the schema exists.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database; the data lives as long as the pool.
pub async fn memory() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            color TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create notes table")?;
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

pub async fn list_notes(pool: &SqlitePool) -> anyhow::Result<NoteVector> {
    let rows = sqlx::query_as::<_, NoteRow>(&format!(
        "SELECT {} FROM notes ORDER BY id DESC",
        NOTE_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Note::from).collect())
}

pub async fn get_note(pool: &SqlitePool, id: i64) -> anyhow::Result<Option<Note>> {
    let row = sqlx::query_as::<_, NoteRow>(&format!(
        "SELECT {} FROM notes WHERE id = ?1",
        NOTE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Note::from))
}

/// Inserts a note with `created_at == updated_at == now`.
pub async fn create_note(pool: &SqlitePool, request: CreateNoteRequest) -> anyhow::Result<Note> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, NoteRow>(&format!(
        r#"
        INSERT INTO notes ( title, content, color, created_at, updated_at )
        VALUES ( ?1, ?2, ?3, ?4, ?4 )
        RETURNING {}
        "#,
        NOTE_COLUMNS
    ))
    .bind(request.title)
    .bind(request.content)
    .bind(request.color)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Merges `changes` into the stored note and validates the result before
/// writing it back.
pub async fn update_note(pool: &SqlitePool, id: i64, changes: NoteChanges) -> anyhow::Result<Update> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, NoteRow>(&format!(
        "SELECT {} FROM notes WHERE id = ?1",
        NOTE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(mut row) = current else {
        return Ok(Update::NotFound);
    };
    row.apply(changes, Utc::now());
    if let Err(err) = row.validate() {
        return Ok(Update::Rejected(err));
    }

    let row = sqlx::query_as::<_, NoteRow>(&format!(
        r#"
        UPDATE notes
        SET title = ?1, content = ?2, color = ?3, updated_at = ?4
        WHERE id = ?5
        RETURNING {}
        "#,
        NOTE_COLUMNS
    ))
    .bind(row.title)
    .bind(row.content)
    .bind(row.color)
    .bind(row.updated_at)
    .bind(row.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Update::Applied(row.into()))
}

pub async fn delete_note(pool: &SqlitePool, id: i64) -> anyhow::Result<bool> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM notes
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}
