use std::convert::Infallible;
use std::future::Future;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::Response;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceExt, service_fn};

type BoxedRoute = BoxCloneSyncService<Request, Response, Infallible>;

/// A type-erased request handler: either a terminal business handler or a
/// handler already wrapped by one or more [`Middleware`]s.
///
/// Cloning is cheap and every clone drives the same underlying service, so a
/// composed chain can be shared by all concurrent requests without locking.
#[derive(Clone)]
pub struct Handler(BoxedRoute);

impl Handler {
    pub fn from_service<S>(service: S) -> Self
    where
        S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        Self(BoxCloneSyncService::new(service))
    }

    /// Binds an axum handler function to its state. Extractors such as
    /// `Path`, `Json` or [`Identity`](crate::middleware::auth::Identity) work
    /// as usual inside it.
    pub fn from_axum<H, T, S>(handler: H, state: S) -> Self
    where
        H: axum::handler::Handler<T, S>,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        Self::from_service(handler.with_state(state))
    }

    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::from_service(service_fn(move |req: Request| {
            let fut = f(req);
            async move { Ok::<_, Infallible>(fut.await) }
        }))
    }

    /// Runs the handler to completion on one request.
    pub async fn dispatch(&self, req: Request) -> Response {
        match self.0.clone().oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

impl Service<Request> for Handler {
    type Response = Response;
    type Error = Infallible;
    type Future = <BoxedRoute as Service<Request>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.0.call(req)
    }
}

/// A request interceptor that wraps the next handler in the chain.
///
/// `wrap` runs once, at registration time. The returned handler decides per
/// request whether to call `next` or to answer on its own, which halts the
/// chain.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}
