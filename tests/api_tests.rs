use across::api::AppState;
use across::config::Config;
use across::domain::UserRoleType;
use across::models::user::NewUser;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Arc<AppState>, Router) {
    let run_id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("across-api-test-{run_id}.db"));
    let public_dir = std::env::temp_dir().join(format!("across-api-public-{run_id}"));
    std::fs::create_dir_all(&public_dir).unwrap();
    std::fs::write(
        public_dir.join("index.html"),
        "<!doctype html><title>ACROSS</title>",
    )
    .unwrap();

    let mut config = Config::default();
    config.database.url = Some(format!("sqlite:{}", db_path.display()));
    config.server.public_dir = public_dir.display().to_string();
    config.security.secret_key = "api-test-secret-0123456789".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = across::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    (state.clone(), across::api::router(state))
}

/// Creates a user holding `roles` and returns a fresh API token for them.
async fn token_for(state: &AppState, email: &str, roles: Vec<UserRoleType>) -> String {
    let user = state
        .identity()
        .register(NewUser {
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            roles,
        })
        .await
        .unwrap();

    state.identity().set_api_token(user.user.id).await.unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("X-Api-Key", token);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_hello() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/v0/hello", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("API says hello"));
}

#[tokio::test]
async fn test_rand() {
    let (_, app) = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/rand").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: i64 = std::str::from_utf8(&bytes).unwrap().parse().unwrap();
    assert!((0..=100).contains(&value));
}

#[tokio::test]
async fn test_rand_data() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/randData?params=5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let random = body["randomNumber"].as_i64().unwrap();
    assert!((0..=100).contains(&random));
    assert_eq!(body["params"], 5);
    assert_eq!(body["sumRandomParams"].as_i64().unwrap(), random + 5);

    let (status, body) = send(&app, "GET", "/randData", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"], 0);
    assert_eq!(body["sumRandomParams"], body["randomNumber"]);
}

#[tokio::test]
async fn test_health() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/v0/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let (_, app) = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_served_from_public_dir() {
    let (_, app) = spawn_app().await;

    for uri in ["/", "/index"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("<title>ACROSS</title>"));
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/missing.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_flow() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/register",
        None,
        Some(json!({
            "firstname": "Henrietta",
            "lastname": "Leavitt",
            "email": "Henrietta@Example.org",
            "password": "cepheids-1912",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "henrietta@example.org");
    assert_eq!(body["data"]["roles"], json!(["viewer"]));
    assert_eq!(body["data"]["verified"], false);
    let user_id = body["data"]["id"].as_i64().unwrap();
    let key = body["data"]["verification_key"].as_str().unwrap().to_string();

    // Same email again
    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/register",
        None,
        Some(json!({
            "firstname": "H",
            "lastname": "L",
            "email": "henrietta@example.org",
            "password": "cepheids-1912",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/token",
        None,
        Some(json!({"email": "henrietta@example.org", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/token",
        None,
        Some(json!({"email": "henrietta@example.org", "password": "cepheids-1912"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["api_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/v0/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64().unwrap(), user_id);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/verify",
        None,
        Some(json!({"user_id": user_id, "key": "not-the-key"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/verify",
        None,
        Some(json!({"user_id": user_id, "key": key})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], true);

    let (status, body) = send(&app, "GET", "/api/v0/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], true);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (state, app) = spawn_app().await;
    let admin = token_for(&state, "admin@example.org", vec![UserRoleType::Admin]).await;
    let viewer = token_for(&state, "annie@example.org", vec![UserRoleType::Viewer]).await;
    let request = json!({"email": "annie@example.org"});

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset",
        None,
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("data").is_none());

    // Holding an account is not enough, even for your own email.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset",
        Some(&viewer),
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset",
        Some(&admin),
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["expires_in"], 3600);
    let reset_token = body["data"]["reset_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset/confirm",
        None,
        Some(json!({"token": "garbage", "new_password": "new-password-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired token");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset/confirm",
        None,
        Some(json!({"token": reset_token, "new_password": "new-password-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "annie@example.org");

    // The token was bound to the old password and cannot be used twice.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset/confirm",
        None,
        Some(json!({"token": reset_token, "new_password": "new-password-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/token",
        None,
        Some(json!({"email": "annie@example.org", "password": "hunter2hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/token",
        None,
        Some(json!({"email": "annie@example.org", "password": "new-password-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset",
        Some(&admin),
        Some(json!({"email": "nobody@example.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_caller_cannot_reset_admin_password() {
    let (state, app) = spawn_app().await;
    let admin = state
        .identity()
        .register(NewUser {
            firstname: "Grace".to_string(),
            lastname: "Hopper".to_string(),
            email: "admin@nasa.gov".to_string(),
            password: "original-password".to_string(),
            roles: vec![UserRoleType::Admin],
        })
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset",
        None,
        Some(json!({"email": "admin@nasa.gov"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("data").is_none());

    // A token signed with a well-known placeholder key is worthless.
    let forged = across::services::reset_token::sign(
        admin.user.id,
        "",
        3600,
        chrono::Utc::now().timestamp(),
        b"change-me",
    )
    .unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/password-reset/confirm",
        None,
        Some(json!({"token": forged, "new_password": "attacker-owned"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/token",
        None,
        Some(json!({"email": "admin@nasa.gov", "password": "attacker-owned"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/auth/token",
        None,
        Some(json!({"email": "admin@nasa.gov", "password": "original-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_scope_enforcement() {
    let (state, app) = spawn_app().await;
    let viewer = token_for(&state, "viewer@example.org", vec![UserRoleType::Viewer]).await;
    let scheduler = token_for(
        &state,
        "scheduler@example.org",
        vec![UserRoleType::ScheduleEditor],
    )
    .await;
    let admin = token_for(&state, "admin@example.org", vec![UserRoleType::Admin]).await;

    let (status, _) = send(&app, "GET", "/api/v0/observatories", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/v0/observatories", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/v0/observatories", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let new_observatory = json!({"name": "Swift", "observatory_type": "space_based"});

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/observatories",
        Some(&viewer),
        Some(new_observatory.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/observatories",
        Some(&scheduler),
        Some(new_observatory.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Bearer works as well as X-Api-Key; admin passes every scope.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v0/observatories")
                .header("Authorization", format!("Bearer {admin}"))
                .header("Content-Type", "application/json")
                .body(Body::from(new_observatory.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The schedule editor has no viewer role, so reads are refused too.
    let (status, _) = send(&app, "GET", "/api/v0/observatories", Some(&scheduler), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_catalog_chain() {
    let (state, app) = spawn_app().await;
    let admin = token_for(&state, "admin@example.org", vec![UserRoleType::Admin]).await;
    let token = Some(admin.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/observatories",
        token,
        Some(json!({"name": "Las Cumbres", "observatory_type": "ground_based"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let observatory_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/api/v0/telescopes",
        token,
        Some(json!({"name": "1m0-08", "observatory_id": observatory_id})),
    )
    .await;
    let telescope_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/api/v0/instruments",
        token,
        Some(json!({"name": "Sinistro", "telescope_id": telescope_id})),
    )
    .await;
    let instrument_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/schedules",
        token,
        Some(json!({
            "name": "Night 1",
            "instrument_id": instrument_id,
            "schedule_type": "low_fidelity",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["schedule_status"], "planned");
    let schedule_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/observations",
        token,
        Some(json!({
            "schedule_id": schedule_id,
            "object_name": "SN 2023ixf",
            "object_position": {"lon": -149.55, "lat": 54.31},
            "obstime_start": "2024-05-01T02:00:00Z",
            "obstime_end": "2024-05-01T02:10:00Z",
            "exposure_time": 600.0,
            "observation_type": "photometric",
            "extension": {
                "kind": "photometric",
                "depth": 21.5,
                "depth_unit": "ab_mag",
                "filter_name": "r'",
            },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let observation_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["observation_status"], "planned");
    assert_eq!(body["data"]["extension"]["kind"], "photometric");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v0/observations/{observation_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["object_position"]["lat"], 54.31);
    assert_eq!(body["data"]["extension"]["filter_name"], "r'");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v0/observations/{observation_id}/observatory"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Las Cumbres");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v0/observatories/{observatory_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["telescopes"][0]["name"], "1m0-08");
    assert_eq!(
        body["data"]["telescopes"][0]["instruments"][0]["schedules"][0]["name"],
        "Night 1"
    );

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v0/observations/{observation_id}/status"),
        token,
        Some(json!({"observation_status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["observation_status"], "completed");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v0/observatories/{observatory_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v0/observations/{observation_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_rejects_bad_input() {
    let (state, app) = spawn_app().await;
    let admin = token_for(&state, "admin@example.org", vec![UserRoleType::Admin]).await;
    let token = Some(admin.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v0/telescopes",
        token,
        Some(json!({"name": "Orphan", "observatory_id": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Observatory 999 not found");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/observatories",
        token,
        Some(json!({"name": "X", "observatory_type": "underwater"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/api/v0/observatories/0", token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        &app,
        "POST",
        "/api/v0/observatories",
        token,
        Some(json!({"name": "Gemini", "observatory_type": "ground_based"})),
    )
    .await;
    let observatory_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/api/v0/telescopes",
        token,
        Some(json!({"name": "Gemini North", "observatory_id": observatory_id})),
    )
    .await;
    let telescope_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/api/v0/instruments",
        token,
        Some(json!({"name": "GMOS-N", "telescope_id": telescope_id})),
    )
    .await;
    let instrument_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        "/api/v0/schedules",
        token,
        Some(json!({
            "name": "Queue",
            "instrument_id": instrument_id,
            "schedule_type": "as_executed",
        })),
    )
    .await;
    let schedule_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/observations",
        token,
        Some(json!({
            "schedule_id": schedule_id,
            "object_name": "NGC 1068",
            "observation_type": "photometric",
            "extension": {"kind": "spectroscopic"},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v0/observations",
        token,
        Some(json!({
            "schedule_id": schedule_id,
            "object_name": "NGC 1068",
            "object_position": {"lon": 200.0, "lat": 0.0},
            "observation_type": "spectroscopic",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_footprints() {
    let (state, app) = spawn_app().await;
    let admin = token_for(&state, "admin@example.org", vec![UserRoleType::Admin]).await;
    let token = Some(admin.as_str());

    let (status, body) = send(&app, "POST", "/api/v0/footprints", token, None).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(&app, "GET", "/api/v0/footprints", token, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/v0/footprints/{id}"), token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/api/v0/footprints/{id}"), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
