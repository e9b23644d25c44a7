use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::MethodFilter;
use thiserror::Error;
use tracing::debug;

use super::baseline::Baseline;
use super::handler::{Handler, Middleware};
use super::table::DispatchTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {0} has no handler")]
    MissingHandler(String),
    #[error("invalid route path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },
    #[error("unsupported method {0}")]
    UnsupportedMethod(Method),
    #[error("route path {path:?} conflicts with {existing:?}")]
    ConflictingPath { path: String, existing: String },
}

/// Declaration of one endpoint: method, path pattern, terminal handler and
/// the middlewares to run before it, in order.
///
/// ```ignore
/// Route::new(Method::PUT, "/api/appointments/{id}")
///     .handler(Handler::from_axum(update_appointment, state.clone()))
///     .middleware(RequireAuth::new(resolver))
///     .middleware(RequireRoles::new([roles::DOCTOR]))
///     .register(&mut table)?;
/// ```
pub struct Route {
    method: Method,
    path: String,
    handler: Option<Handler>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            handler: None,
            middlewares: Vec::new(),
        }
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Appends to the declared middlewares; calling it twice accumulates.
    pub fn middlewares<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    pub fn key(&self) -> String {
        route_key(&self.method, &self.path)
    }

    /// Composes the chain and binds it into `table` under `"<METHOD> <path>"`.
    ///
    /// Baseline goes directly around the terminal handler. The declared
    /// middlewares wrap that in reverse, so the first one declared is the
    /// outermost and sees the request first.
    pub fn register(self, table: &mut DispatchTable) -> Result<String, RouteError> {
        let key = self.key();
        validate_path(&self.path)?;
        let filter = MethodFilter::try_from(self.method.clone())
            .map_err(|_| RouteError::UnsupportedMethod(self.method.clone()))?;
        let handler = self.handler.ok_or_else(|| RouteError::MissingHandler(key.clone()))?;

        let composed = self
            .middlewares
            .iter()
            .rev()
            .fold(Baseline.wrap(handler), |next, middleware| middleware.wrap(next));

        table.insert(key.clone(), filter, self.path, composed)?;
        debug!(route = %key, middlewares = self.middlewares.len(), "route registered");
        Ok(key)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_handler", &self.handler.is_some())
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

pub(crate) fn route_key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

/// Literal segments and whole-segment `{name}` placeholders only.
fn validate_path(path: &str) -> Result<(), RouteError> {
    let invalid = |reason| RouteError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let Some(rest) = path.strip_prefix('/') else {
        return Err(invalid("must start with '/'"));
    };
    if rest.is_empty() {
        return Ok(());
    }

    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }
        if segment.contains('*') {
            return Err(invalid("wildcards are not supported"));
        }

        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                let valid_name = !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if !valid_name {
                    return Err(invalid("placeholder names must be alphanumeric"));
                }
            }
            None if segment.contains(['{', '}']) => {
                return Err(invalid("placeholder must span the whole segment"));
            }
            None => {}
        }
    }

    Ok(())
}
