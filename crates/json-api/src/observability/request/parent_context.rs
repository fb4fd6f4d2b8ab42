//! W3C `traceparent` extraction for request spans.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

/// Incoming headers viewed as a propagation carrier.
#[derive(Debug)]
struct Carrier<'a>(&'a HeaderMap);

impl Extractor for Carrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

/// The caller's trace context, or `None` when the headers carry no valid
/// one. Extraction starts from an empty context so a request without trace
/// headers never joins whatever span is current in this process.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    let context = global::get_text_map_propagator(|propagator| {
        propagator.extract_with_context(&Context::new(), &Carrier(headers))
    });

    let valid = context.span().span_context().is_valid();

    valid.then_some(context)
}
