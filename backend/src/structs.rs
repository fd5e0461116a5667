use chrono::{DateTime, Utc};
use shared::{is_hex_color, CreateNoteRequest, Note, NoteChanges};
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 255;

/// A row of the `notes` table.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct NoteRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NoteRow {
    /// Merges a partial update. `updated_at` never moves backwards.
    pub fn apply(&mut self, changes: NoteChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        self.updated_at = self.updated_at.max(now);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.content, self.color.as_deref())
    }
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id.to_string(),
            title: row.title,
            content: row.content,
            color: row.color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title and content cannot both be empty")]
    Empty,
    #[error("Title must be at most 255 characters")]
    TitleTooLong,
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

pub fn validate_create(request: &CreateNoteRequest) -> Result<(), ValidationError> {
    validate_fields(&request.title, &request.content, request.color.as_deref())
}

fn validate_fields(title: &str, content: &str, color: Option<&str>) -> Result<(), ValidationError> {
    if title.trim().is_empty() && content.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    match color {
        Some(color) if !is_hex_color(color) => Err(ValidationError::InvalidColor(color.to_string())),
        _ => Ok(()),
    }
}
