//! Low-cardinality route labels for spans and metrics.

use uuid::Uuid;

/// Replaces id segments so `/orders/<uuid>` and `/product/42` collapse to
/// `/orders/{uuid}` and `/product/{id}`.
pub(super) fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else if segment.bytes().all(|byte| byte.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_are_collapsed() {
        assert_eq!(
            route_template("/orders/0190f3a2-8c4e-7b1d-9a55-3c2f1e0d4b6a"),
            "/orders/{uuid}"
        );
        assert_eq!(route_template("/product/42/reviews"), "/product/{id}/reviews");
    }

    #[test]
    fn static_routes_are_kept() {
        assert_eq!(route_template("/"), "/");
        assert_eq!(route_template("/catalog/popular"), "/catalog/popular");
    }
}
