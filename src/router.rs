use axum::{Router, middleware};
use tracing::info;

use crate::logging::logging_middleware;
use crate::modules::appointments::router::register_appointment_routes;
use crate::modules::auth::router::register_auth_routes;
use crate::modules::patients::router::register_patient_routes;
use crate::routing::{DispatchTable, RouteError};
use crate::state::AppState;

/// Registers every endpoint of the service.
pub fn init_routes(state: &AppState) -> Result<DispatchTable, RouteError> {
    let mut table = DispatchTable::new();

    register_auth_routes(&mut table, state)?;
    register_patient_routes(&mut table, state)?;
    register_appointment_routes(&mut table, state)?;

    info!(routes = table.len(), "routes registered");
    Ok(table)
}

pub fn init_router(state: AppState) -> Result<Router, RouteError> {
    let router = init_routes(&state)?
        .into_router()
        .layer(middleware::from_fn(logging_middleware));

    Ok(router)
}
