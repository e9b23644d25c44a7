use axum::http::Method;

use crate::middleware::auth::RequireAuth;
use crate::routing::{DispatchTable, Handler, Route, RouteError};
use crate::state::AppState;

use super::controller::{login_user, logout_user};

pub fn register_auth_routes(table: &mut DispatchTable, state: &AppState) -> Result<(), RouteError> {
    Route::new(Method::POST, "/api/auth/login")
        .handler(Handler::from_axum(login_user, state.clone()))
        .register(table)?;

    Route::new(Method::POST, "/api/auth/logout")
        .handler(Handler::from_axum(logout_user, state.clone()))
        .middleware(RequireAuth::new(state.identity_resolver()))
        .register(table)?;

    Ok(())
}
