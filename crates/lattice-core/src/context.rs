/// Runtime context for provider requests
///
/// Carried from the HTTP layer into provider calls so backends can
/// inspect the originating request without depending on axum
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP request parts (method, URI, headers, extensions)
    pub parts: http::request::Parts,
}

impl RequestContext {
    /// Create a minimal context for embedded (non-HTTP) use
    ///
    /// Contains empty headers and a placeholder method/URI
    #[must_use]
    pub fn empty() -> Self {
        let (parts, ()) = http::Request::builder()
            .method(http::Method::GET)
            .uri("/")
            .body(())
            .expect("valid minimal request")
            .into_parts();

        Self { parts }
    }

    /// Access request headers
    #[must_use]
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }
}
