use yew::prelude::*;

use frontend::service::DELETE_FAILED;
use frontend::{
    ApiConfig, EditorMode, EditorSession, LoadOutcome, LoadTicket, NoteCollection, NoteService, SaveOutcome,
    SaveResponse,
};
use shared::{DeleteNoteRequest, Envelope, Note, NoteVector, PALETTE};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};

enum Msg {
    Loaded(LoadTicket, Envelope<NoteVector>),
    Search(String),

    NewNote,
    Edit(Note),
    Cancel,
    EditTitle(String),
    EditContent(String),
    PickColor(Option<String>),
    Save,
    Saved(SaveResponse),

    Delete(String),
    Deleted(String, Envelope<bool>),
}

enum Notice {
    Success(String),
    Error(String),
}

struct Model {
    service: NoteService,
    notes: NoteCollection,
    editor: EditorSession,
    notice: Option<Notice>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            service: NoteService::browser(ApiConfig::from_build_env()),
            notes: NoteCollection::new(),
            editor: EditorSession::new(),
            notice: None,
        };
        model.load(ctx);
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(ticket, envelope) => match self.notes.finish_load(ticket, envelope) {
                LoadOutcome::Applied => {}
                LoadOutcome::Stale => return false,
                LoadOutcome::Failed(message) => self.notice = Some(Notice::Error(message)),
            },
            Msg::Search(query) => {
                self.notes.set_filter(query);
            }

            Msg::NewNote => {
                self.editor.open_new();
            }
            Msg::Edit(note) => {
                self.editor.open_edit(&note);
            }
            Msg::Cancel => {
                self.editor.cancel();
            }
            Msg::EditTitle(value) => {
                self.editor.set_title(value);
            }
            Msg::EditContent(value) => {
                self.editor.set_content(value);
            }
            Msg::PickColor(color) => {
                self.editor.select_color(color);
            }
            Msg::Save => {
                // Blank notes and repeat clicks are refused before anything is sent
                let Some(request) = self.editor.start_save() else {
                    return false;
                };
                let service = self.service.clone();
                ctx.link()
                    .send_future(async move { Msg::Saved(request.dispatch(&service).await) });
            }
            Msg::Saved(response) => {
                self.notice = match self.editor.complete_save(response, &mut self.notes) {
                    SaveOutcome::Created(_) => Some(Notice::Success("Note created successfully".into())),
                    SaveOutcome::Updated(_) => Some(Notice::Success("Note updated successfully".into())),
                    SaveOutcome::Failed(message) => Some(Notice::Error(message)),
                    SaveOutcome::Rejected => return false,
                };
            }

            Msg::Delete(id) => {
                let service = self.service.clone();
                ctx.link().send_future(async move {
                    let envelope = service.delete_note(&DeleteNoteRequest { id: id.clone() }).await;
                    Msg::Deleted(id, envelope)
                });
                return false;
            }
            Msg::Deleted(id, envelope) => match envelope.into_result(DELETE_FAILED) {
                Ok(_) => {
                    // A note being edited must not outlive its deletion
                    self.editor.discard_if_editing(&id);
                    self.notes.apply_delete(&id);
                    self.notice = Some(Notice::Success("Note deleted successfully".into()));
                }
                Err(message) => self.notice = Some(Notice::Error(message)),
            },
        }

        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div>
                <header>
                    <h1>{ "notes" }</h1>
                    <button onclick={link.callback(|_| Msg::NewNote)}>{ "New Note" }</button>
                    <input
                        class="search"
                        placeholder="Search notes..."
                        value={self.notes.query().to_string()}
                        oninput={link.callback(|e: InputEvent| {
                            Msg::Search(e.target_unchecked_into::<HtmlInputElement>().value())
                        })}
                    />
                </header>
                <div class="mainContent">{ self.view_notes(ctx) }</div>
                { self.view_editor(ctx) }
                { self.view_notice() }
            </div>
        }
    }
}

impl Model {
    fn load(&mut self, ctx: &Context<Self>) {
        let ticket = self.notes.begin_load();
        let service = self.service.clone();
        ctx.link()
            .send_future(async move { Msg::Loaded(ticket, service.list_notes().await) });
    }

    fn view_note(&self, ctx: &Context<Self>, note: &Note) -> Html {
        let link = ctx.link();
        let edit = note.clone();
        let id = note.id.clone();
        let style = note
            .color
            .as_ref()
            .map(|color| format!("background-color: {}", color));

        html! {
            <div class="note" style={style}>
                <div class="noteChanged">{ "Changed: " }{ note.updated_at.format("%Y-%m-%d %H:%M").to_string() }</div>
                <div class="noteTitle">
                    <b>{ note.title.clone() }</b>
                </div>
                <div class="noteContent">
                    { note.content.clone() }
                </div>
                <div class="noteButtons">
                    <button onclick={link.callback(move |_| Msg::Edit(edit.clone()))}>{ "Edit" }</button>
                    <button onclick={link.callback(move |_| Msg::Delete(id.clone()))}>{ "Delete" }</button>
                </div>
            </div>
        }
    }

    fn view_notes(&self, ctx: &Context<Self>) -> Html {
        if self.notes.is_loading() && self.notes.is_empty() {
            return html! { <p class="loading">{ "Loading notes..." }</p> };
        }

        let visible = self.notes.filtered();
        if visible.is_empty() {
            let text = if self.notes.query().trim().is_empty() {
                "No notes yet. Create one to get started."
            } else {
                "No notes match your search."
            };
            return html! { <p class="empty">{ text.to_string() }</p> };
        }

        html! {
            <>
                { for visible.into_iter().map(|note| self.view_note(ctx, note)) }
            </>
        }
    }

    fn view_palette(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let swatches = PALETTE.iter().map(|&color| {
            let selected = self.editor.color() == Some(color);
            html! {
                <button
                    class={classes!("swatch", selected.then_some("selected"))}
                    style={format!("background-color: {}", color)}
                    onclick={link.callback(move |_| Msg::PickColor(Some(color.to_string())))}
                />
            }
        });

        html! {
            <div class="palette">
                <button
                    class={classes!("swatch", self.editor.color().is_none().then_some("selected"))}
                    onclick={link.callback(|_| Msg::PickColor(None))}
                >{ "x" }</button>
                { for swatches }
            </div>
        }
    }

    fn view_editor(&self, ctx: &Context<Self>) -> Html {
        let heading = match self.editor.mode() {
            EditorMode::Closed => return html! {},
            EditorMode::CreatingNew => "Create New Note",
            EditorMode::Editing(_) => "Edit Note",
        };
        let action = match self.editor.mode() {
            EditorMode::Editing(_) => "Update",
            _ => "Create",
        };
        let link = ctx.link();

        html! {
            <div class="editor">
                <h2>{ heading.to_string() }</h2>
                <input
                    placeholder="Note title..."
                    value={self.editor.title().to_string()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::EditTitle(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <textarea rows="8"
                    placeholder="Start writing your note..."
                    value={self.editor.content().to_string()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::EditContent(e.target_unchecked_into::<HtmlTextAreaElement>().value())
                    })}
                />
                { self.view_palette(ctx) }
                <div class="editorButtons">
                    <button onclick={link.callback(|_| Msg::Cancel)}>{ "Cancel" }</button>
                    <button
                        disabled={!self.editor.can_save() || self.editor.is_saving()}
                        onclick={link.callback(|_| Msg::Save)}
                    >{ action.to_string() }</button>
                </div>
            </div>
        }
    }

    fn view_notice(&self) -> Html {
        match &self.notice {
            None => html! {},
            Some(Notice::Success(text)) => html! { <div class="result">{ text.clone() }</div> },
            Some(Notice::Error(text)) => html! { <div class="result error">{ text.clone() }</div> },
        }
    }
}

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    yew::Renderer::<Model>::new().render();
}
