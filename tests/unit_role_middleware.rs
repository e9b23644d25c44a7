mod common;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use tower::ServiceExt;

use carebook::middleware::auth::RequireAuth;
use carebook::middleware::role::RequireRoles;
use carebook::modules::users::model::roles;
use carebook::routing::{DispatchTable, Handler, Route};
use common::{TestApp, body_text, request, setup_test_app};

fn gated_router(app: &TestApp, allowed: RequireRoles) -> axum::Router {
    let mut table = DispatchTable::new();
    Route::new(Method::GET, "/gated")
        .handler(Handler::from_fn(|_req| async {
            (StatusCode::OK, "reached").into_response()
        }))
        .middleware(RequireAuth::new(app.state.identity_resolver()))
        .middleware(allowed)
        .register(&mut table)
        .unwrap();
    table.into_router()
}

#[tokio::test]
async fn test_allowed_role_reaches_handler() {
    let app = setup_test_app().await;
    let router = gated_router(&app, RequireRoles::new([roles::DOCTOR]));

    let response = router
        .oneshot(request(Method::GET, "/gated", Some(&app.doctor_token()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "reached");
}

#[tokio::test]
async fn test_other_role_forbidden() {
    let app = setup_test_app().await;
    let router = gated_router(&app, RequireRoles::new([roles::DOCTOR]));

    let response = router
        .oneshot(request(Method::GET, "/gated", Some(&app.patient_token()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "Forbidden");
}

#[tokio::test]
async fn test_any_of_several_roles() {
    let app = setup_test_app().await;

    for token in [app.doctor_token(), app.patient_token()] {
        let router = gated_router(&app, RequireRoles::new([roles::DOCTOR, roles::PATIENT]));
        let response = router
            .oneshot(request(Method::GET, "/gated", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_empty_role_set_denies_everyone() {
    let app = setup_test_app().await;
    let router = gated_router(&app, RequireRoles::new(Vec::<String>::new()));

    let response = router
        .oneshot(request(Method::GET, "/gated", Some(&app.doctor_token()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_gate_without_authentication_fails_closed() {
    let mut table = DispatchTable::new();
    Route::new(Method::GET, "/gated")
        .handler(Handler::from_fn(|_req| async { StatusCode::OK.into_response() }))
        .middleware(RequireRoles::new([roles::DOCTOR]))
        .register(&mut table)
        .unwrap();

    let response = table
        .into_router()
        .oneshot(Request::builder().uri("/gated").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Unauthorized");
}

#[tokio::test]
async fn test_missing_token_stops_before_role_check() {
    let app = setup_test_app().await;
    let router = gated_router(&app, RequireRoles::new([roles::DOCTOR]));

    let response = router
        .oneshot(request(Method::GET, "/gated", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Unauthorized");
}
