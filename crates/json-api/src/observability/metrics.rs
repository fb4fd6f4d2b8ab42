//! Prometheus metrics and the `/metrics` exposition endpoint.
//!
//! Request metrics are recorded by the request logging hoop. Storefront
//! events are counted by the handlers that complete them.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Basket and order milestones counted in `megano_json_storefront_events_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StorefrontEvent {
    BasketItemAdded,
    BasketItemRemoved,
    OrderCheckedOut,
    OrderConfirmed,
    OrderPaid,
    UserRegistered,
}

impl StorefrontEvent {
    const fn as_str(self) -> &'static str {
        match self {
            Self::BasketItemAdded => "basket_item_added",
            Self::BasketItemRemoved => "basket_item_removed",
            Self::OrderCheckedOut => "order_checked_out",
            Self::OrderConfirmed => "order_confirmed",
            Self::OrderPaid => "order_paid",
            Self::UserRegistered => "user_registered",
        }
    }
}

#[derive(Debug)]
struct ServerMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    storefront_events_total: IntCounterVec,
}

static SERVER_METRICS: OnceLock<Option<ServerMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static ServerMetrics> {
    SERVER_METRICS.get_or_init(build_metrics).as_ref()
}

/// Decrements the in-flight gauge when the request finishes, however it ends.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[
            method,
            route,
            status_class(status_code),
            status_code_label.as_str(),
        ])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

pub(crate) fn record_event(event: StorefrontEvent) {
    if let Some(metrics) = metrics() {
        metrics
            .storefront_events_total
            .with_label_values(&[event.as_str()])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

/// Create `metric` and add it to `registry`, logging and giving up on failure.
fn register<M>(registry: &Registry, metric: prometheus::Result<M>) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<ServerMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "megano_json_http_requests_total",
                "HTTP requests by method, route, status class and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "megano_json_http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "megano_json_http_requests_in_flight",
            "HTTP requests currently being served.",
        )),
    )?;

    let storefront_events_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "megano_json_storefront_events_total",
                "Completed basket, order and account operations by event.",
            ),
            &["event"],
        ),
    )?;

    Some(ServerMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        storefront_events_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    async fn scrape() -> TestResult<String> {
        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let body = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        Ok(body)
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_metrics() -> TestResult {
        observe_request("GET", "/catalog", 200, 0.042);
        observe_request("POST", "/basket", 500, 0.123);

        let body = scrape().await?;

        assert!(
            body.contains("megano_json_http_requests_total"),
            "expected requests_total metric in response"
        );
        assert!(
            body.contains("megano_json_http_request_duration_seconds"),
            "expected request_duration metric in response"
        );
        assert!(
            body.contains("megano_json_http_requests_in_flight"),
            "expected in-flight metric in response"
        );

        Ok(())
    }

    #[tokio::test]
    async fn storefront_events_are_labelled_by_event() -> TestResult {
        record_event(StorefrontEvent::OrderPaid);

        let body = scrape().await?;

        assert!(
            body.contains(r#"megano_json_storefront_events_total{event="order_paid"}"#),
            "expected order_paid event counter in response"
        );

        Ok(())
    }

    #[test]
    fn status_codes_group_by_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(409), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }
}
