use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, delete, get, options, post, put, State};
use serde::Serialize;
use shared::{CreateNoteRequest, Envelope, Note, NoteChanges, NoteVector};
use sqlx::sqlite::SqlitePool;
use tracing::{error, info};

use crate::config::Settings;
use crate::db::{self, Update};
use crate::structs::{validate_create, ValidationError};

pub const NOT_FOUND: &str = "Note not found";

type Reply<T> = (Status, Json<Envelope<T>>);

fn ok<T>(envelope: Envelope<T>) -> Reply<T> {
    (Status::Ok, Json(envelope))
}

fn not_found<T>() -> Reply<T> {
    (Status::Ok, Json(Envelope::failure(NOT_FOUND)))
}

fn rejected<T>(err: ValidationError) -> Reply<T> {
    (Status::UnprocessableEntity, Json(Envelope::failure(err.to_string())))
}

fn storage_failure<T>(err: anyhow::Error) -> Reply<T> {
    error!(error = %err, "note storage failed");
    (Status::InternalServerError, Json(Envelope::failure(err.to_string())))
}

// Ids are integers in storage; anything else cannot name a note.
fn parse_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

// Routes //////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize)]
pub struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    environment: &'static str,
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    database: &'static str,
    message: &'static str,
}

#[get("/")]
pub fn index(settings: &State<Settings>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Notes API is running!",
        version: env!("CARGO_PKG_VERSION"),
        environment: settings.environment.as_str(),
    })
}

#[get("/health")]
pub async fn health(pool: &State<SqlitePool>) -> Json<Health> {
    let healthy = db::ping(pool).await;
    Json(Health {
        status: if healthy { "healthy" } else { "unhealthy" },
        database: if healthy { "healthy" } else { "unhealthy" },
        message: "API is operational",
    })
}

#[get("/notes")]
pub async fn get_notes(pool: &State<SqlitePool>) -> Reply<NoteVector> {
    match db::list_notes(pool).await {
        Ok(notes) => ok(Envelope::ok(notes)),
        Err(err) => storage_failure(err),
    }
}

#[get("/notes/<id>")]
pub async fn get_note(pool: &State<SqlitePool>, id: &str) -> Reply<Note> {
    let Some(id) = parse_id(id) else {
        return not_found();
    };
    match db::get_note(pool, id).await {
        Ok(Some(note)) => ok(Envelope::ok(note)),
        Ok(None) => not_found(),
        Err(err) => storage_failure(err),
    }
}

#[post("/notes", data = "<request>")]
pub async fn create_note(pool: &State<SqlitePool>, request: Json<CreateNoteRequest>) -> Reply<Note> {
    let request = request.into_inner();
    if let Err(err) = validate_create(&request) {
        return rejected(err);
    }
    match db::create_note(pool, request).await {
        Ok(note) => {
            info!(id = %note.id, "note created");
            ok(Envelope::ok(note).with_message("Note created successfully"))
        }
        Err(err) => storage_failure(err),
    }
}

#[put("/notes/<id>", data = "<changes>")]
pub async fn update_note(pool: &State<SqlitePool>, id: &str, changes: Json<NoteChanges>) -> Reply<Note> {
    let Some(id) = parse_id(id) else {
        return not_found();
    };
    match db::update_note(pool, id, changes.into_inner()).await {
        Ok(Update::Applied(note)) => {
            info!(id = %note.id, "note updated");
            ok(Envelope::ok(note).with_message("Note updated successfully"))
        }
        Ok(Update::NotFound) => not_found(),
        Ok(Update::Rejected(err)) => rejected(err),
        Err(err) => storage_failure(err),
    }
}

#[delete("/notes/<id>")]
pub async fn delete_note(pool: &State<SqlitePool>, id: &str) -> Reply<bool> {
    let Some(id) = parse_id(id) else {
        return not_found();
    };
    match db::delete_note(pool, id).await {
        Ok(true) => {
            info!(id, "note deleted");
            ok(Envelope::ok(true).with_message("Note deleted successfully"))
        }
        Ok(false) => not_found(),
        Err(err) => storage_failure(err),
    }
}

// Important for handling CORS preflight
#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::Ok
}

// Catchers ////////////////////////////////////////////////////////////////////////////////////////

#[catch(400)]
pub fn bad_request() -> Json<Envelope<()>> {
    Json(Envelope::failure("Malformed request"))
}

#[catch(404)]
pub fn unknown_route() -> Json<Envelope<()>> {
    Json(Envelope::failure("Resource not found"))
}

#[catch(422)]
pub fn unprocessable() -> Json<Envelope<()>> {
    Json(Envelope::failure("Invalid request body"))
}

#[catch(500)]
pub fn internal_error() -> Json<Envelope<()>> {
    Json(Envelope::failure("Internal server error"))
}
