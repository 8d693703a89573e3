use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use lattice_core::RequestContext;

/// Middleware that constructs a [`RequestContext`] from the incoming request
///
/// Captures the HTTP parts so downstream handlers and providers can inspect
/// the originating request without depending on axum
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let context = RequestContext { parts: parts.clone() };

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(context);

    next.run(request).await
}
