use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

pub struct Cors {
    origins: Vec<String>,
}

impl Cors {
    /// An empty list allows every origin.
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    fn allowed_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.origins.is_empty() {
            return Some("*".to_string());
        }
        origin
            .filter(|origin| self.origins.iter().any(|allowed| allowed == origin))
            .map(String::from)
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let Some(origin) = self.allowed_origin(request.headers().get_one("Origin")) else {
            return;
        };
        if origin != "*" {
            response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
            response.set_header(Header::new("Vary", "Origin"));
        }
        response.set_header(Header::new("Access-Control-Allow-Origin", origin));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}
