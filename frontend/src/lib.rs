//! Client-side note synchronization: the store client, the in-memory
//! collection it feeds, and the editor session that writes back to both.

pub mod config;
pub mod editor;
pub mod service;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ApiConfig;
pub use editor::{EditorMode, EditorSession, SaveOutcome, SaveRequest, SaveResponse};
pub use service::NoteService;
pub use state::{LoadOutcome, LoadTicket, NoteCollection};
pub use transport::{FetchTransport, HttpRequest, HttpResponse, Method, Transport, TransportError};
