mod common;

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Request};
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use tower::ServiceExt;

use carebook::middleware::auth::{Identity, RequireAuth};
use carebook::router::init_routes;
use carebook::routing::{DispatchTable, Handler, Middleware, Route, RouteError};
use common::{body_text, request, setup_test_app};

type Log = Arc<Mutex<Vec<String>>>;

fn recording(name: &'static str, log: Log) -> impl Middleware {
    move |next: Handler| {
        let log = log.clone();
        Handler::from_fn(move |req: Request| {
            let log = log.clone();
            let next = next.clone();
            async move {
                log.lock().unwrap().push(format!("{name}>"));
                let response = next.dispatch(req).await;
                log.lock().unwrap().push(format!("<{name}"));
                response
            }
        })
    }
}

fn denying() -> impl Middleware {
    |_next: Handler| Handler::from_fn(|_req| async { StatusCode::FORBIDDEN.into_response() })
}

fn terminal(log: Log) -> Handler {
    Handler::from_fn(move |_req| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push("handler".to_string());
            (StatusCode::OK, "done").into_response()
        }
    })
}

fn get(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_declared_order_is_execution_order() {
    let log: Log = Arc::default();
    let mut table = DispatchTable::new();

    let key = Route::new(Method::GET, "/ordered")
        .handler(terminal(log.clone()))
        .middleware(recording("A", log.clone()))
        .middleware(recording("B", log.clone()))
        .register(&mut table)
        .unwrap();
    assert_eq!(key, "GET /ordered");

    let response = table.into_router().oneshot(get("/ordered")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["A>", "B>", "handler", "<B", "<A"]
    );
}

#[tokio::test]
async fn test_middlewares_list_keeps_order() {
    let log: Log = Arc::default();
    let mut table = DispatchTable::new();
    let declared: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(recording("first", log.clone())),
        Arc::new(recording("second", log.clone())),
    ];

    Route::new(Method::GET, "/listed")
        .middlewares(declared)
        .middleware(recording("third", log.clone()))
        .handler(terminal(log.clone()))
        .register(&mut table)
        .unwrap();

    table.into_router().oneshot(get("/listed")).await.unwrap();

    let entries: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.ends_with('>'))
        .cloned()
        .collect();
    assert_eq!(entries, vec!["first>", "second>", "third>"]);
}

#[tokio::test]
async fn test_short_circuit_skips_rest_of_chain() {
    let log: Log = Arc::default();
    let mut table = DispatchTable::new();

    Route::new(Method::GET, "/denied")
        .handler(terminal(log.clone()))
        .middleware(denying())
        .middleware(recording("B", log.clone()))
        .register(&mut table)
        .unwrap();

    let response = table.into_router().oneshot(get("/denied")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_baseline_headers_override_handler() {
    let mut table = DispatchTable::new();
    Route::new(Method::GET, "/plain")
        .handler(Handler::from_fn(|_req| async {
            ([(header::CONTENT_TYPE, "text/plain")], "hello").into_response()
        }))
        .register(&mut table)
        .unwrap();

    let response = table.into_router().oneshot(get("/plain")).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers.get_all(header::CONTENT_TYPE).iter().count(), 1);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_path_parameters_extracted_by_name() {
    let mut table = DispatchTable::new();
    Route::new(Method::GET, "/api/things/{thing_id}/parts/{part}")
        .handler(Handler::from_axum(
            |Path((thing_id, part)): Path<(String, String)>| async move {
                format!("{thing_id}:{part}")
            },
            (),
        ))
        .register(&mut table)
        .unwrap();

    let response = table
        .into_router()
        .oneshot(get("/api/things/42/parts/gear"))
        .await
        .unwrap();

    assert_eq!(body_text(response).await, "42:gear");
}

#[tokio::test]
async fn test_duplicate_registration_last_wins() {
    let mut table = DispatchTable::new();
    for status in [StatusCode::OK, StatusCode::ACCEPTED] {
        Route::new(Method::GET, "/twice")
            .handler(Handler::from_fn(move |_req| async move { status.into_response() }))
            .register(&mut table)
            .unwrap();
    }
    assert_eq!(table.len(), 1);

    let response = table.into_router().oneshot(get("/twice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_unregistered_method_and_path() {
    let mut table = DispatchTable::new();
    Route::new(Method::GET, "/only-get")
        .handler(Handler::from_fn(|_req| async { StatusCode::OK.into_response() }))
        .register(&mut table)
        .unwrap();
    let router = table.into_router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/only-get")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = router.oneshot(get("/elsewhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_register_errors() {
    let mut table = DispatchTable::new();
    let ok = || Handler::from_fn(|_req| async { StatusCode::OK.into_response() });

    assert!(matches!(
        Route::new(Method::GET, "/no-handler").register(&mut table),
        Err(RouteError::MissingHandler(_))
    ));
    assert!(matches!(
        Route::new(Method::GET, "/files/{*rest}").handler(ok()).register(&mut table),
        Err(RouteError::InvalidPath { .. })
    ));
    assert!(matches!(
        Route::new(Method::GET, "relative").handler(ok()).register(&mut table),
        Err(RouteError::InvalidPath { .. })
    ));
    assert!(matches!(
        Route::new(Method::from_bytes(b"BREW").unwrap(), "/coffee")
            .handler(ok())
            .register(&mut table),
        Err(RouteError::UnsupportedMethod(_))
    ));
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_conflicting_placeholder_names_rejected_at_registration() {
    let mut table = DispatchTable::new();
    let ok = || Handler::from_fn(|_req| async { StatusCode::OK.into_response() });

    Route::new(Method::GET, "/x/{a}")
        .handler(ok())
        .register(&mut table)
        .unwrap();
    let err = Route::new(Method::DELETE, "/x/{b}")
        .handler(ok())
        .register(&mut table)
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::ConflictingPath {
            path: "/x/{b}".to_string(),
            existing: "/x/{a}".to_string(),
        }
    );

    // A longer path may reuse the position under another name.
    Route::new(Method::GET, "/x/{b}/parts")
        .handler(ok())
        .register(&mut table)
        .unwrap();
    assert_eq!(table.keys(), vec!["GET /x/{a}", "GET /x/{b}/parts"]);

    let router = table.into_router();
    let response = router.clone().oneshot(get("/x/7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = router.oneshot(get("/x/7/parts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_handler_sees_authenticated_identity() {
    let app = setup_test_app().await;
    let mut table = DispatchTable::new();

    Route::new(Method::GET, "/api/patients")
        .handler(Handler::from_axum(
            |identity: Identity| async move {
                format!("{}:{}", identity.user_id(), identity.role())
            },
            (),
        ))
        .middleware(RequireAuth::new(app.state.identity_resolver()))
        .register(&mut table)
        .unwrap();

    let response = table
        .into_router()
        .oneshot(request(
            Method::GET,
            "/api/patients",
            Some(&app.patient_token()),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, format!("{}:patient", app.patient.id));
}

#[tokio::test]
async fn test_identity_without_auth_fails_closed() {
    let mut table = DispatchTable::new();
    Route::new(Method::GET, "/misconfigured")
        .handler(Handler::from_axum(
            |identity: Identity| async move { identity.email().to_string() },
            (),
        ))
        .register(&mut table)
        .unwrap();

    let response = table.into_router().oneshot(get("/misconfigured")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_service_routes_registered() {
    let app = setup_test_app().await;
    let table = init_routes(&app.state).unwrap();

    assert_eq!(
        table.keys(),
        vec![
            "DELETE /api/appointments/{id}",
            "DELETE /api/patients/{id}",
            "GET /api/appointments",
            "GET /api/appointments/date/{date}",
            "GET /api/appointments/{id}",
            "GET /api/patients",
            "GET /api/patients/{id}",
            "GET /api/patients/{patientId}/appointments",
            "POST /api/auth/login",
            "POST /api/auth/logout",
            "POST /api/patients",
            "POST /api/patients/{patientId}/appointments",
            "PUT /api/appointments/{id}",
            "PUT /api/patients/{id}",
        ]
    );
}
