use axum::http::Method;

use crate::middleware::auth::RequireAuth;
use crate::middleware::role::RequireRoles;
use crate::modules::users::model::roles;
use crate::routing::{DispatchTable, Handler, Route, RouteError};
use crate::state::AppState;

use super::controller::{
    create_appointment, delete_appointment, get_appointment, get_appointments,
    get_appointments_by_date, get_patient_appointments, update_appointment,
};

pub fn register_appointment_routes(
    table: &mut DispatchTable,
    state: &AppState,
) -> Result<(), RouteError> {
    let auth = RequireAuth::new(state.identity_resolver());

    Route::new(Method::GET, "/api/appointments")
        .handler(Handler::from_axum(get_appointments, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::GET, "/api/appointments/date/{date}")
        .handler(Handler::from_axum(get_appointments_by_date, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::GET, "/api/patients/{patientId}/appointments")
        .handler(Handler::from_axum(get_patient_appointments, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::POST, "/api/patients/{patientId}/appointments")
        .handler(Handler::from_axum(create_appointment, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::GET, "/api/appointments/{id}")
        .handler(Handler::from_axum(get_appointment, state.clone()))
        .middleware(auth.clone())
        .register(table)?;

    Route::new(Method::PUT, "/api/appointments/{id}")
        .handler(Handler::from_axum(update_appointment, state.clone()))
        .middleware(auth.clone())
        .middleware(RequireRoles::new([roles::DOCTOR]))
        .register(table)?;

    Route::new(Method::DELETE, "/api/appointments/{id}")
        .handler(Handler::from_axum(delete_appointment, state.clone()))
        .middleware(auth)
        .register(table)?;

    Ok(())
}
