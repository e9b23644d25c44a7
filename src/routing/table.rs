use std::collections::{BTreeMap, HashMap};

use axum::Router;
use axum::routing::{MethodFilter, MethodRouter};
use tracing::warn;

use super::handler::Handler;
use super::route::RouteError;

struct Entry {
    filter: MethodFilter,
    path: String,
    handler: Handler,
}

/// Composed handlers keyed by `"<METHOD> <path>"`.
///
/// Filled during startup, then consumed by [`DispatchTable::into_router`].
/// Nothing mutates it once the server is running.
#[derive(Default)]
pub struct DispatchTable {
    entries: HashMap<String, Entry>,
    /// Path with placeholder names erased, mapped to the path that claimed it.
    shapes: HashMap<String, String>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects a path that matches the same requests as an already
    /// registered path under different placeholder names, e.g. `/x/{a}` and
    /// `/x/{b}`. The router cannot hold both.
    pub(crate) fn insert(
        &mut self,
        key: String,
        filter: MethodFilter,
        path: String,
        handler: Handler,
    ) -> Result<(), RouteError> {
        let shape = path_shape(&path);
        if let Some(existing) = self.shapes.get(&shape)
            && *existing != path
        {
            return Err(RouteError::ConflictingPath {
                path,
                existing: existing.clone(),
            });
        }
        self.shapes.insert(shape, path.clone());

        let entry = Entry {
            filter,
            path,
            handler,
        };
        if self.entries.insert(key.clone(), entry).is_some() {
            warn!(route = %key, "route registered twice, keeping the last registration");
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Handler> {
        self.entries.get(key).map(|entry| &entry.handler)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Groups the entries by path into axum method routers.
    ///
    /// Requests with no matching path get axum's 404; a known path with an
    /// unregistered method gets 405. Conflicting paths were already refused
    /// by [`DispatchTable::insert`], so building the router cannot fail.
    pub fn into_router(self) -> Router {
        let mut by_path: BTreeMap<String, MethodRouter> = BTreeMap::new();
        for entry in self.entries.into_values() {
            let method_router = by_path.remove(&entry.path).unwrap_or_default();
            by_path.insert(entry.path, method_router.on_service(entry.filter, entry.handler));
        }

        by_path
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            })
    }
}

fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| if segment.starts_with('{') { "{}" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}
