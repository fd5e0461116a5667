use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{CreateNoteRequest, DeleteNoteRequest, Envelope, Note, NoteVector, UpdateNoteRequest};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::transport::{FetchTransport, HttpRequest, Method, Transport};

const NOTES_PATH: &str = "/api/notes";

// Characters that would end or split a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const LIST_FAILED: &str = "Failed to fetch notes";
pub const GET_FAILED: &str = "Failed to fetch note";
pub const CREATE_FAILED: &str = "Failed to create note";
pub const UPDATE_FAILED: &str = "Failed to update note";
pub const DELETE_FAILED: &str = "Failed to delete note";

/// Client for the remote note store.
///
/// Every operation makes exactly one request and answers with an
/// [`Envelope`]. Transport faults, non-2xx statuses and undecodable bodies all
/// come back as a failure envelope carrying the operation's fixed message.
#[derive(Debug, Clone)]
pub struct NoteService<T = FetchTransport> {
    config: ApiConfig,
    transport: T,
}

impl NoteService<FetchTransport> {
    pub fn browser(config: ApiConfig) -> Self {
        Self::new(config, FetchTransport)
    }
}

impl<T: Transport> NoteService<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_notes(&self) -> Envelope<NoteVector> {
        self.exchange(Method::Get, NOTES_PATH.to_string(), None, LIST_FAILED)
            .await
    }

    pub async fn get_note(&self, id: &str) -> Envelope<Note> {
        self.exchange(Method::Get, note_path(id), None, GET_FAILED)
            .await
    }

    pub async fn create_note(&self, request: &CreateNoteRequest) -> Envelope<Note> {
        let Some(body) = encode(request) else {
            return Envelope::failure(CREATE_FAILED);
        };
        self.exchange(Method::Post, NOTES_PATH.to_string(), Some(body), CREATE_FAILED)
            .await
    }

    /// Sends only the fields set on `request`; the id goes in the path.
    pub async fn update_note(&self, request: &UpdateNoteRequest) -> Envelope<Note> {
        let Some(body) = encode(&request.changes) else {
            return Envelope::failure(UPDATE_FAILED);
        };
        self.exchange(Method::Put, note_path(&request.id), Some(body), UPDATE_FAILED)
            .await
    }

    pub async fn delete_note(&self, request: &DeleteNoteRequest) -> Envelope<bool> {
        self.exchange(Method::Delete, note_path(&request.id), None, DELETE_FAILED)
            .await
    }

    async fn exchange<R: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
        fallback: &str,
    ) -> Envelope<R> {
        let url = self.config.url(&path);
        debug!(method = method.as_str(), %url, "note store request");

        let response = match self.transport.send(HttpRequest { method, url, body }).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, "{}", fallback);
                return Envelope::failure(fallback);
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "{}", fallback);
            return Envelope::failure(fallback);
        }

        match serde_json::from_str::<Envelope<R>>(&response.body) {
            Ok(envelope) => checked(envelope, fallback),
            Err(err) => {
                warn!(%err, "undecodable note store response");
                Envelope::failure(fallback)
            }
        }
    }
}

fn note_path(id: &str) -> String {
    format!("{}/{}", NOTES_PATH, utf8_percent_encode(id, SEGMENT))
}

fn encode<B: Serialize>(body: &B) -> Option<String> {
    serde_json::to_string(body)
        .map_err(|err| warn!(%err, "failed to encode request body"))
        .ok()
}

// A success without data, or a failure without an error, is repaired so
// callers can rely on the convention.
fn checked<R>(mut envelope: Envelope<R>, fallback: &str) -> Envelope<R> {
    if envelope.success && envelope.data.is_none() {
        warn!("note store reported success without data");
        return Envelope::failure(fallback);
    }
    if !envelope.success {
        envelope.data = None;
        if envelope.error.is_none() {
            envelope.error = Some(fallback.to_string());
        }
    }
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{service, FakeNoteServer};

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let service = service(FakeNoteServer::default());

        let created = service
            .create_note(&CreateNoteRequest {
                title: "A".into(),
                content: "B".into(),
                color: None,
            })
            .await;
        let created = created.into_result(CREATE_FAILED).unwrap();

        let notes = service.list_notes().await.into_result(LIST_FAILED).unwrap();
        let listed = notes.iter().find(|n| n.id == created.id).unwrap();
        assert_eq!(listed.title, "A");
        assert_eq!(listed.content, "B");
        assert!(!listed.id.is_empty());
        assert_eq!(listed.created_at, listed.updated_at);
    }

    #[tokio::test]
    async fn update_of_missing_note_is_a_domain_failure() {
        let service = service(FakeNoteServer::default());
        let envelope = service
            .update_note(&UpdateNoteRequest::new("missing-id").title("X"))
            .await;
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Note not found"));
        assert_eq!(envelope.data, None);
    }

    #[tokio::test]
    async fn update_sends_only_provided_fields_to_the_note_path() {
        let server = FakeNoteServer::with_notes(&[("Groceries", "milk")]);
        let id = server.notes()[0].id.clone();
        let service = service(server);

        let envelope = service
            .update_note(&UpdateNoteRequest::new(id.clone()).content("milk, eggs"))
            .await;
        let note = envelope.into_result(UPDATE_FAILED).unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk, eggs");
        assert!(note.updated_at >= note.created_at);

        let request = service.transport().last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, format!("http://notes.test/api/notes/{}", id));
        assert_eq!(request.body.as_deref(), Some(r#"{"content":"milk, eggs"}"#));
    }

    #[tokio::test]
    async fn delete_of_missing_note_fails_without_panicking() {
        let service = service(FakeNoteServer::default());
        let envelope = service
            .delete_note(&DeleteNoteRequest { id: "42".into() })
            .await;
        assert_eq!(envelope.error.as_deref(), Some("Note not found"));
    }

    #[tokio::test]
    async fn reserved_characters_stay_inside_the_id_segment() {
        let service = service(FakeNoteServer::with_notes(&[("kept", "safe")]));

        let fetched = service.get_note("a/b?c").await;
        assert_eq!(fetched.error.as_deref(), Some("Note not found"));
        assert_eq!(
            service.transport().last_request().unwrap().url,
            "http://notes.test/api/notes/a%2Fb%3Fc"
        );

        service
            .update_note(&UpdateNoteRequest::new("note 7#x").title("X"))
            .await;
        assert_eq!(
            service.transport().last_request().unwrap().url,
            "http://notes.test/api/notes/note%207%23x"
        );

        let deleted = service.delete_note(&DeleteNoteRequest { id: "../1".into() }).await;
        assert!(!deleted.success);
        assert_eq!(
            service.transport().last_request().unwrap().url,
            "http://notes.test/api/notes/..%2F1"
        );
        assert_eq!(service.transport().notes().len(), 1);
    }

    #[tokio::test]
    async fn transport_fault_becomes_fixed_message() {
        let server = FakeNoteServer::default();
        server.go_offline();
        let service = service(server);

        assert_eq!(
            service.list_notes().await,
            Envelope::failure("Failed to fetch notes")
        );
        assert_eq!(
            service.delete_note(&DeleteNoteRequest { id: "1".into() }).await,
            Envelope::failure("Failed to delete note")
        );
    }

    #[tokio::test]
    async fn error_status_is_treated_like_a_transport_fault() {
        let server = FakeNoteServer::default();
        server.respond_with(503, r#"{"success":false,"error":"maintenance"}"#);
        let service = service(server);

        let envelope = service
            .create_note(&CreateNoteRequest {
                title: "t".into(),
                content: "c".into(),
                color: None,
            })
            .await;
        assert_eq!(envelope, Envelope::failure("Failed to create note"));
    }

    #[tokio::test]
    async fn malformed_success_envelope_is_downgraded() {
        let server = FakeNoteServer::default();
        server.respond_with(200, r#"{"success":true}"#);
        let service = service(server);
        assert_eq!(
            service.list_notes().await,
            Envelope::failure("Failed to fetch notes")
        );
    }

    #[tokio::test]
    async fn undecodable_body_is_downgraded() {
        let server = FakeNoteServer::default();
        server.respond_with(200, "<html>gateway</html>");
        let service = service(server);
        assert_eq!(service.get_note("1").await, Envelope::failure("Failed to fetch note"));
    }

    #[tokio::test]
    async fn failure_without_error_gets_fallback_message() {
        let server = FakeNoteServer::default();
        server.respond_with(200, r#"{"success":false}"#);
        let service = service(server);
        let envelope = service.get_note("1").await;
        assert_eq!(envelope.error.as_deref(), Some("Failed to fetch note"));
    }

    #[tokio::test]
    async fn every_operation_makes_one_request() {
        let server = FakeNoteServer::with_notes(&[("a", "b")]);
        let id = server.notes()[0].id.clone();
        let service = service(server);

        service.list_notes().await;
        service.get_note(&id).await;
        service.delete_note(&DeleteNoteRequest { id }).await;

        let methods: Vec<Method> = service
            .transport()
            .requests()
            .iter()
            .map(|r| r.method)
            .collect();
        assert_eq!(methods, vec![Method::Get, Method::Get, Method::Delete]);
    }
}
