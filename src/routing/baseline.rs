use axum::http::{HeaderValue, header};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use super::handler::{Handler, Middleware};

/// Response headers every registered route carries.
///
/// Applied directly around the terminal handler, so it is the innermost
/// layer of each chain. Values are overriding: whatever a handler set for
/// these headers is replaced, and wrapping twice still yields one value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Baseline;

impl Baseline {
    pub const CONTENT_TYPE: &'static str = "application/json";
    pub const ALLOW_ORIGIN: &'static str = "*";
}

impl Middleware for Baseline {
    fn wrap(&self, next: Handler) -> Handler {
        let service = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(Self::ALLOW_ORIGIN),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_TYPE,
                HeaderValue::from_static(Self::CONTENT_TYPE),
            ))
            .service(next);

        Handler::from_service(service)
    }
}
