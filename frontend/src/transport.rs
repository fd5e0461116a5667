use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// One HTTP exchange. Implementations never retry.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Browser transport over the Fetch API.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn describe(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let init = web_sys::RequestInit::new();
        init.set_method(request.method.as_str());
        if let Some(body) = &request.body {
            init.set_body(&JsValue::from_str(body));
        }

        let fetch_request = web_sys::Request::new_with_str_and_init(&request.url, &init)
            .map_err(|e| TransportError::Build(describe(e)))?;
        fetch_request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| TransportError::Build(describe(e)))?;

        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("no window available".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(|e| TransportError::Network(describe(e)))?;
        let response: web_sys::Response = value
            .dyn_into()
            .map_err(|e| TransportError::Network(describe(e)))?;

        let text = response.text().map_err(|e| TransportError::Body(describe(e)))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| TransportError::Body(describe(e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: body.as_string().unwrap_or_default(),
        })
    }
}
