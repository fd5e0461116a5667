use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Colours offered by the editor, in display order.
pub const PALETTE: [&str; 8] = [
    "#f9e2af", "#fab387", "#f38ba8", "#cba6f7", "#89b4fa", "#94e2d5", "#a6e3a1", "#f2cdcd",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type NoteVector = Vec<Note>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Partial update of a note. Fields left as `None` keep their stored value.
///
/// `color` has three states: `None` (keep), `Some(None)` (clear) and
/// `Some(Some(hex))` (set).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateNoteRequest {
    pub id: String,
    #[serde(flatten)]
    pub changes: NoteChanges,
}

impl UpdateNoteRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            changes: NoteChanges::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.changes.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.changes.content = Some(content.into());
        self
    }

    pub fn color(mut self, color: Option<String>) -> Self {
        self.changes.color = Some(color);
        self
    }
}

/// Body of `PUT /api/notes/{id}`: the update request without its id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<Option<String>>,
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.color.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeleteNoteRequest {
    pub id: String,
}

// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Checks for the `#RRGGBB` form.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
