use axum::http::Method;

use crate::middleware::auth::RequireAuth;
use crate::routing::{DispatchTable, Handler, Route, RouteError};
use crate::state::AppState;

use super::controller::{
    create_patient, delete_patient, get_patient, get_patients, update_patient,
};

pub fn register_patient_routes(
    table: &mut DispatchTable,
    state: &AppState,
) -> Result<(), RouteError> {
    let auth = RequireAuth::new(state.identity_resolver());

    Route::new(Method::GET, "/api/patients")
        .handler(Handler::from_axum(get_patients, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::POST, "/api/patients")
        .handler(Handler::from_axum(create_patient, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::GET, "/api/patients/{id}")
        .handler(Handler::from_axum(get_patient, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::PUT, "/api/patients/{id}")
        .handler(Handler::from_axum(update_patient, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::DELETE, "/api/patients/{id}")
        .handler(Handler::from_axum(delete_patient, state.clone()))
        .middleware(auth)
        .register(table)?;

    Ok(())
}
