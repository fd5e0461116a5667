use std::cell::{Cell, RefCell};

use chrono::Utc;
use serde::Serialize;
use shared::{CreateNoteRequest, Envelope, Note, NoteChanges};

use crate::config::ApiConfig;
use crate::service::NoteService;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

pub const BASE_URL: &str = "http://notes.test";

pub fn service(server: FakeNoteServer) -> NoteService<FakeNoteServer> {
    NoteService::new(ApiConfig::new(BASE_URL), server)
}

pub fn note(id: &str, title: &str, content: &str) -> Note {
    let now = Utc::now();
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        color: None,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory stand-in for the note store, speaking the same routes and
/// envelopes over the [`Transport`] seam.
#[derive(Default)]
pub struct FakeNoteServer {
    notes: RefCell<Vec<Note>>,
    next_id: Cell<u64>,
    offline: Cell<bool>,
    canned: RefCell<Option<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeNoteServer {
    pub fn with_notes(notes: &[(&str, &str)]) -> Self {
        let server = Self::default();
        for (title, content) in notes {
            server.insert(CreateNoteRequest {
                title: title.to_string(),
                content: content.to_string(),
                color: None,
            });
        }
        server
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.borrow().clone()
    }

    pub fn go_offline(&self) {
        self.offline.set(true);
    }

    /// The next request gets this raw response instead of being routed.
    pub fn respond_with(&self, status: u16, body: &str) {
        *self.canned.borrow_mut() = Some(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    fn insert(&self, request: CreateNoteRequest) -> Note {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let now = Utc::now();
        let note = Note {
            id: id.to_string(),
            title: request.title,
            content: request.content,
            color: request.color,
            created_at: now,
            updated_at: now,
        };
        self.notes.borrow_mut().insert(0, note.clone());
        note
    }

    fn update(&self, id: &str, changes: NoteChanges) -> Option<Note> {
        let mut notes = self.notes.borrow_mut();
        let note = notes.iter_mut().find(|n| n.id == id)?;
        if let Some(title) = changes.title {
            note.title = title;
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        if let Some(color) = changes.color {
            note.color = color;
        }
        note.updated_at = note.updated_at.max(Utc::now());
        Some(note.clone())
    }

    fn remove(&self, id: &str) -> bool {
        let mut notes = self.notes.borrow_mut();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        notes.len() != before
    }

    fn route(&self, request: &HttpRequest) -> Option<String> {
        let path = request.url.strip_prefix(BASE_URL)?;
        let rest = path.strip_prefix("/api/notes")?;
        let id = rest.trim_start_matches('/');
        let body = request.body.as_deref().unwrap_or("");

        let reply = match (request.method, id) {
            (Method::Get, "") => json(&Envelope::ok(self.notes())),
            (Method::Post, "") => {
                let create: CreateNoteRequest = serde_json::from_str(body).ok()?;
                json(&Envelope::ok(self.insert(create)).with_message("Note created successfully"))
            }
            (Method::Get, id) => match self.notes().into_iter().find(|n| n.id == id) {
                Some(note) => json(&Envelope::ok(note)),
                None => json(&Envelope::<Note>::failure("Note not found")),
            },
            (Method::Put, id) => {
                let changes: NoteChanges = serde_json::from_str(body).ok()?;
                match self.update(id, changes) {
                    Some(note) => json(&Envelope::ok(note)),
                    None => json(&Envelope::<Note>::failure("Note not found")),
                }
            }
            (Method::Delete, id) => match self.remove(id) {
                true => json(&Envelope::ok(true)),
                false => json(&Envelope::<bool>::failure("Note not found")),
            },
            _ => return None,
        };
        Some(reply)
    }
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}

impl Transport for FakeNoteServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        if self.offline.get() {
            return Err(TransportError::Network("connection refused".to_string()));
        }
        if let Some(canned) = self.canned.borrow_mut().take() {
            return Ok(canned);
        }
        Ok(match self.route(&request) {
            Some(body) => HttpResponse { status: 200, body },
            None => HttpResponse {
                status: 404,
                body: String::new(),
            },
        })
    }
}
