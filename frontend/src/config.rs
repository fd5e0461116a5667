/// Where the note store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub const DEVELOPMENT_URL: &'static str = "http://127.0.0.1:8000";

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `NOTES_API_URL` at build time wins. Otherwise debug builds talk to the
    /// local development server and release builds use the page's own origin.
    pub fn from_build_env() -> Self {
        match option_env!("NOTES_API_URL") {
            Some(url) => Self::new(url),
            None if cfg!(debug_assertions) => Self::new(Self::DEVELOPMENT_URL),
            None => Self::new(""),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
