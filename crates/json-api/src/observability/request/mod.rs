//! Per-request span, access log and HTTP metrics.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, field, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use self::request_ids::{REQUEST_ID_HEADER, RequestId};
use super::{metrics, settings};

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    // Scrapes would drown out real traffic.
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let diagnostics = settings::diagnostics();

    let request_id = RequestId::from_header(
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    request_id.echo(res);

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let route = spans::route_template(&path);
    let span_name = format!("{method} {route}");
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %span_name,
        otel.kind = "server",
        %request_id,
        %method,
        %path,
        remote_addr = %req.remote_addr(),
        status = field::Empty,
        duration_ms = field::Empty
    );

    if diagnostics.continue_remote_traces
        && let Some(parent) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to continue remote trace: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);

    metrics::observe_request(
        method.as_str(),
        &route,
        status.as_u16(),
        elapsed.as_secs_f64(),
    );

    span.record("status", status.as_u16());
    span.record("duration_ms", elapsed.as_millis());

    span.in_scope(|| log_completion(status, elapsed, diagnostics.slow_request));
}

fn log_completion(status: StatusCode, elapsed: Duration, slow_request: Duration) {
    let status = status.as_u16();
    let duration_ms = elapsed.as_millis();

    match status {
        500.. => error!(status, duration_ms, "request failed"),
        400..500 => warn!(status, duration_ms, "request rejected"),
        _ => info!(status, duration_ms, "request completed"),
    }

    if elapsed > slow_request {
        warn!(
            duration_ms,
            threshold_ms = slow_request.as_millis(),
            "slow request"
        );
    }
}

#[cfg(test)]
mod tests {
    use salvo::{prelude::*, test::TestClient};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn make_service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("catalog").get(ok)),
        )
    }

    fn echoed_id(res: &Response) -> Option<&str> {
        res.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn incoming_request_id_is_echoed() {
        let res = TestClient::get("http://example.com/catalog")
            .add_header(REQUEST_ID_HEADER, "req-123", true)
            .send(&make_service())
            .await;

        assert_eq!(echoed_id(&res), Some("req-123"));
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() {
        let res = TestClient::get("http://example.com/catalog")
            .send(&make_service())
            .await;

        let generated = echoed_id(&res).unwrap_or_default();

        assert!(
            uuid::Uuid::parse_str(generated).is_ok(),
            "generated request id should be a uuid"
        );
    }
}
