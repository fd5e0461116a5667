//! HTTP note store: CRUD over SQLite, every answer wrapped in an
//! [`shared::Envelope`].

use rocket::fs::FileServer;
use rocket::{catchers, routes, Build, Rocket};
use sqlx::sqlite::SqlitePool;
use tracing::info;

pub mod config;
pub mod cors;
pub mod db;
pub mod routes;
pub mod structs;

use config::Settings;
use cors::Cors;

pub fn build(pool: SqlitePool, settings: Settings) -> Rocket<Build> {
    let mut rocket = rocket::custom(settings.figment())
        .attach(Cors::new(settings.cors_origins.clone()))
        .manage::<SqlitePool>(pool)
        .mount("/", routes![routes::preflight])
        .mount(
            "/api",
            routes![
                routes::index,
                routes::health,
                routes::get_notes,
                routes::get_note,
                routes::create_note,
                routes::update_note,
                routes::delete_note,
            ],
        )
        .register(
            "/",
            catchers![
                routes::bad_request,
                routes::unknown_route,
                routes::unprocessable,
                routes::internal_error,
            ],
        );

    if settings.static_dir.is_dir() {
        info!(dir = %settings.static_dir.display(), "serving frontend bundle");
        rocket = rocket.mount("/", FileServer::from(&settings.static_dir));
    }

    rocket.manage(settings)
}
