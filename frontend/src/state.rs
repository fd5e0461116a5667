use shared::{Envelope, Note, NoteVector};
use tracing::debug;

use crate::service::{NoteService, LIST_FAILED};
use crate::transport::Transport;

/// Identifies one `load()`; later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued after this one; the response was dropped.
    Stale,
    Failed(String),
}

/// The session's notes, newest first, plus the current search query.
///
/// Only `finish_load` and the `apply_*` methods change the list, and each one
/// swaps or edits it in a single step. The filtered view is computed from
/// the list and the query on every call.
#[derive(Debug, Clone, Default)]
pub struct NoteCollection {
    notes: NoteVector,
    query: String,
    issued: u64,
    settled: u64,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Replaces the whole list with a successful response, unless a newer
    /// load has been issued since `ticket`.
    pub fn finish_load(&mut self, ticket: LoadTicket, envelope: Envelope<NoteVector>) -> LoadOutcome {
        if ticket.0 < self.issued {
            debug!(ticket = ticket.0, latest = self.issued, "dropping stale load");
            return LoadOutcome::Stale;
        }
        self.settled = ticket.0;
        match envelope.into_result(LIST_FAILED) {
            Ok(notes) => {
                self.notes = notes;
                LoadOutcome::Applied
            }
            Err(message) => LoadOutcome::Failed(message),
        }
    }

    pub async fn load<T: Transport>(&mut self, service: &NoteService<T>) -> LoadOutcome {
        let ticket = self.begin_load();
        let envelope = service.list_notes().await;
        self.finish_load(ticket, envelope)
    }

    pub fn apply_create(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    /// Replaces the note with the same id in place. Unknown ids are ignored.
    pub fn apply_update(&mut self, note: Note) {
        if let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) {
            *slot = note;
        }
    }

    pub fn apply_delete(&mut self, id: &str) {
        self.notes.retain(|n| n.id != id);
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Notes whose title or content contains the query, ignoring case.
    /// A blank query matches everything.
    pub fn filtered(&self) -> Vec<&Note> {
        if self.query.trim().is_empty() {
            return self.notes.iter().collect();
        }
        let needle = self.query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| {
                n.title.to_lowercase().contains(&needle) || n.content.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
