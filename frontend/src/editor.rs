use shared::{CreateNoteRequest, Envelope, Note, UpdateNoteRequest};
use tracing::debug;

use crate::service::{NoteService, CREATE_FAILED, UPDATE_FAILED};
use crate::state::NoteCollection;
use crate::transport::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Closed,
    CreatingNew,
    Editing(Note),
}

/// A validated save, ready to be sent. `generation` ties it to the session
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create {
        generation: u64,
        request: CreateNoteRequest,
    },
    Update {
        generation: u64,
        request: UpdateNoteRequest,
    },
}

impl SaveRequest {
    pub async fn dispatch<T: Transport>(self, service: &NoteService<T>) -> SaveResponse {
        match self {
            SaveRequest::Create { generation, request } => SaveResponse::Created {
                generation,
                envelope: service.create_note(&request).await,
            },
            SaveRequest::Update { generation, request } => SaveResponse::Updated {
                generation,
                envelope: service.update_note(&request).await,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResponse {
    Created {
        generation: u64,
        envelope: Envelope<Note>,
    },
    Updated {
        generation: u64,
        envelope: Envelope<Note>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to save; the editor stays open.
    Rejected,
    Created(Note),
    Updated(Note),
    Failed(String),
}

/// Working state of the note dialog.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    mode: EditorMode,
    title: String,
    content: String,
    color: Option<String>,
    generation: u64,
    // Generation of the save awaiting its response, if any.
    pending: Option<u64>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn open_new(&mut self) {
        self.reset(EditorMode::CreatingNew);
    }

    pub fn open_edit(&mut self, note: &Note) {
        self.reset(EditorMode::Editing(note.clone()));
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.color = note.color.clone();
    }

    pub fn cancel(&mut self) {
        self.reset(EditorMode::Closed);
    }

    /// Closes the editor if it is showing the note with this id.
    pub fn discard_if_editing(&mut self, id: &str) {
        if matches!(&self.mode, EditorMode::Editing(note) if note.id == id) {
            self.cancel();
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// `None` means no colour is selected.
    pub fn select_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    pub fn can_save(&self) -> bool {
        !(self.title.trim().is_empty() && self.content.trim().is_empty())
    }

    /// True while a save issued by this session has not completed.
    pub fn is_saving(&self) -> bool {
        self.pending == Some(self.generation)
    }

    /// Like [`prepare_save`](Self::prepare_save), but marks the save as in
    /// flight. Returns `None` until that save completes, so one session never
    /// sends two requests.
    pub fn start_save(&mut self) -> Option<SaveRequest> {
        if self.is_saving() {
            debug!(generation = self.generation, "save already in flight");
            return None;
        }
        let request = self.prepare_save()?;
        self.pending = Some(self.generation);
        Some(request)
    }

    /// Validates the working fields and builds the request to send, or
    /// `None` when the editor is closed or both fields are blank.
    pub fn prepare_save(&self) -> Option<SaveRequest> {
        if !self.can_save() {
            return None;
        }
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();

        match &self.mode {
            EditorMode::Closed => None,
            EditorMode::CreatingNew => Some(SaveRequest::Create {
                generation: self.generation,
                request: CreateNoteRequest {
                    title,
                    content,
                    color: self.color.clone(),
                },
            }),
            EditorMode::Editing(original) => {
                let mut request = UpdateNoteRequest::new(original.id.clone())
                    .title(title)
                    .content(content);
                match (&self.color, &original.color) {
                    (Some(color), _) => request = request.color(Some(color.clone())),
                    (None, Some(_)) => request = request.color(None),
                    (None, None) => {}
                }
                Some(SaveRequest::Update {
                    generation: self.generation,
                    request,
                })
            }
        }
    }

    /// Applies a finished save to the collection. The session closes only if
    /// it is still the one that issued the save.
    pub fn complete_save(&mut self, response: SaveResponse, collection: &mut NoteCollection) -> SaveOutcome {
        let generation = match &response {
            SaveResponse::Created { generation, .. } | SaveResponse::Updated { generation, .. } => *generation,
        };
        if self.pending == Some(generation) {
            self.pending = None;
        }
        match response {
            SaveResponse::Created { generation, envelope } => match envelope.into_result(CREATE_FAILED) {
                Ok(note) => {
                    collection.apply_create(note.clone());
                    self.close_if_current(generation);
                    SaveOutcome::Created(note)
                }
                Err(message) => SaveOutcome::Failed(message),
            },
            SaveResponse::Updated { generation, envelope } => match envelope.into_result(UPDATE_FAILED) {
                Ok(note) => {
                    collection.apply_update(note.clone());
                    self.close_if_current(generation);
                    SaveOutcome::Updated(note)
                }
                Err(message) => SaveOutcome::Failed(message),
            },
        }
    }

    pub async fn save<T: Transport>(
        &mut self,
        service: &NoteService<T>,
        collection: &mut NoteCollection,
    ) -> SaveOutcome {
        let Some(request) = self.start_save() else {
            debug!("nothing to save");
            return SaveOutcome::Rejected;
        };
        let response = request.dispatch(service).await;
        self.complete_save(response, collection)
    }

    fn close_if_current(&mut self, generation: u64) {
        if generation == self.generation {
            self.cancel();
        }
    }

    fn reset(&mut self, mode: EditorMode) {
        self.generation += 1;
        self.pending = None;
        self.mode = mode;
        self.title.clear();
        self.content.clear();
        self.color = None;
    }
}
