//! Wire types exchanged between the note store and its clients.

mod envelope;
mod structs;

pub use envelope::Envelope;
pub use structs::{
    is_hex_color, CreateNoteRequest, DeleteNoteRequest, Note, NoteChanges, NoteVector,
    UpdateNoteRequest, PALETTE,
};
