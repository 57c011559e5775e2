//! Request id middleware.

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::{from_fn, FromFnLayer, Next},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;
type MiddlewareFn = fn(Request, Next) -> MiddlewareFuture;

/// Request ID extension type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Layer that reuses or generates a request id, runs the request inside
/// a span carrying it, and echoes it on the response.
pub fn request_id_layer() -> FromFnLayer<MiddlewareFn, (), (Request,)> {
    from_fn(request_id_middleware as MiddlewareFn)
}

fn request_id_middleware(mut request: Request, next: Next) -> MiddlewareFuture {
    Box::pin(async move {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        request
            .extensions_mut()
            .insert(RequestId(request_id.clone()));

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri(),
        );

        let mut response = next.run(request).instrument(span).await;

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        response
    })
}
