//! Request tracing middleware.
//!
//! Every request runs inside one `api_request` span. The span carries the
//! method, path and final status, the league action once the handler has
//! parsed the body, and the caller's trace id when a well-formed W3C
//! `traceparent` header is present.

use axum::{body::Body, http::Request, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{field::Empty, info_span, Instrument, Span};

/// Field on the request span that holds the dispatched action name.
pub const ACTION_FIELD: &str = "league.action";

/// Record `action` on the request span the caller is running in.
pub fn record_action(action: &str) {
    Span::current().record(ACTION_FIELD, action);
}

#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let span = info_span!(
            "api_request",
            http.method = %req.method(),
            http.target = %req.uri().path(),
            http.status_code = Empty,
            league.action = Empty,
            trace_id = Empty,
            parent_span_id = Empty,
            otel.kind = "server",
            otel.status_code = Empty,
        );
        if let Some(parent) = TraceParent::from_request(&req) {
            span.record("trace_id", parent.trace_id.as_str());
            span.record("parent_span_id", parent.parent_id.as_str());
        }

        Box::pin(
            async move {
                let result = inner.call(req).await;

                let span = Span::current();
                let status = result.as_ref().ok().map(|response| response.status());
                if let Some(status) = status {
                    span.record("http.status_code", status.as_u16());
                }
                let ok = status.is_some_and(|s| s.is_success());
                span.record("otel.status_code", if ok { "OK" } else { "ERROR" });

                result
            }
            .instrument(span),
        )
    }
}

/// The identifying parts of a `traceparent` header
/// (`00-<32 hex trace id>-<16 hex parent id>-<2 hex flags>`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct TraceParent {
    trace_id: String,
    parent_id: String,
}

impl TraceParent {
    fn from_request<B>(req: &Request<B>) -> Option<Self> {
        Self::parse(req.headers().get("traceparent")?.to_str().ok()?)
    }

    fn parse(header: &str) -> Option<Self> {
        let mut parts = header.trim().split('-');
        let (version, trace_id, parent_id, flags) =
            (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let hex = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit());
        if !hex(version, 2) || !hex(trace_id, 32) || !hex(parent_id, 16) || !hex(flags, 2) {
            return None;
        }
        // All-zero ids are invalid.
        if trace_id.bytes().all(|b| b == b'0') || parent_id.bytes().all(|b| b == b'0') {
            return None;
        }
        Some(Self {
            trace_id: trace_id.to_ascii_lowercase(),
            parent_id: parent_id.to_ascii_lowercase(),
        })
    }
}
