//! HTTP API tests. Each test drives the router in-process against a fresh
//! in-memory database and a manually advanced clock.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use recruitdesk::clock::ManualClock;
use recruitdesk::config::AppConfig;
use recruitdesk::server::{AppState, create_router};
use recruitdesk::store::{SqliteStore, Store};

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    state: Arc<AppState>,
}

impl TestApp {
    fn new() -> Self {
        let store = SqliteStore::open_in_memory().expect("open store");
        store.initialize().expect("initialize schema");
        let store: Arc<dyn Store> = Arc::new(store);

        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        ));
        let state = Arc::new(AppState::new(store, clock.clone(), AppConfig::default()));
        state
            .authenticator
            .bootstrap_admin(&state.config.bootstrap)
            .expect("bootstrap admin");

        Self {
            router: create_router(state.clone()),
            clock,
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router.clone().oneshot(request).await.expect("send request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {username}: {body}");
        body["data"]["token"].as_str().expect("token").to_string()
    }

    async fn admin(&self) -> String {
        self.login("admin", "admin123").await
    }

    async fn add_user(&self, admin: &str, username: &str, role: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/admin/users",
                admin,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "password123",
                    "full_name": username.to_uppercase(),
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().expect("user id")
    }

    async fn add_candidate(&self, token: &str, email: &str, recruiter_id: Option<i64>) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/candidates",
                token,
                json!({
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": email,
                    "skills": "Rust, Analytical Engines",
                    "recruiter_id": recruiter_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().expect("candidate id")
    }
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|c| c["id"].as_i64().expect("id"))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let token = app.admin().await;
    let (status, body) = app.get("/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_requests_without_session_are_rejected() {
    let app = TestApp::new();

    let (status, _) = app.send(Method::GET, "/api/v1/candidates", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/candidates", "rd_not-a-session").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    let token = app.admin().await;

    let (status, _) = app.post("/api/v1/auth/logout", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_expires_after_timeout() {
    let app = TestApp::new();
    let token = app.admin().await;

    app.clock.advance(Duration::hours(23));
    let (status, _) = app.get("/api/v1/candidates", &token).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::hours(1) + Duration::minutes(1));
    let (status, body) = app.get("/api/v1/candidates", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Session expired, please log in again");
    assert!(app.state.sessions.is_empty());
}

#[tokio::test]
async fn test_permission_lookup() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.add_user(&admin, "vera", "viewer").await;
    let viewer = app.login("vera", "password123").await;

    let (_, body) = app.get("/api/v1/auth/permissions/export", &viewer).await;
    assert_eq!(body["data"]["allowed"], true);

    let (_, body) = app.get("/api/v1/auth/permissions/delete", &viewer).await;
    assert_eq!(body["data"]["allowed"], false);

    let (_, body) = app.get("/api/v1/auth/permissions/launch", &admin).await;
    assert_eq!(body["data"]["allowed"], false);
}

#[tokio::test]
async fn test_viewer_can_read_but_not_write() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.add_user(&admin, "vera", "viewer").await;
    let viewer = app.login("vera", "password123").await;
    let id = app.add_candidate(&admin, "ada@example.com", None).await;

    let (status, _) = app.get(&format!("/api/v1/candidates/{id}"), &viewer).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/export/candidates", &viewer).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/v1/candidates",
            &viewer,
            json!({ "first_name": "X", "last_name": "Y", "email": "x@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/candidates/{id}"), Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/v1/admin/users", &viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_candidate_validation_and_duplicates() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/api/v1/candidates",
            &admin,
            json!({
                "first_name": "",
                "last_name": "Lovelace",
                "email": "not-an-email",
                "years_of_experience": 99,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["first_name", "email", "years_of_experience"]);

    app.add_candidate(&admin, "ada@example.com", None).await;
    let (status, body) = app
        .post(
            "/api/v1/candidates",
            &admin,
            json!({ "first_name": "Ada", "last_name": "Again", "email": "ada@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already exists");
}

#[tokio::test]
async fn test_status_change_moves_candidate_between_searches() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let id = app.add_candidate(&admin, "ada@example.com", None).await;

    let (_, body) = app.get(&format!("/api/v1/candidates/{id}"), &admin).await;
    assert_eq!(body["data"]["status"], "Applied");

    let (_, body) = app
        .post("/api/v1/candidates/search", &admin, json!({ "status": "Applied" }))
        .await;
    assert_eq!(ids(&body), vec![id]);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/candidates/{id}/status"),
            Some(&admin),
            Some(json!({ "status": "Hired" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .post("/api/v1/candidates/search", &admin, json!({ "status": "Applied" }))
        .await;
    assert!(ids(&body).is_empty());

    let (_, body) = app
        .post(
            "/api/v1/candidates/search",
            &admin,
            json!({ "status": ["Offer", "Hired"], "search_text": "analytical" }),
        )
        .await;
    assert_eq!(ids(&body), vec![id]);
}

#[tokio::test]
async fn test_search_recruiter_null_means_unassigned() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let rita = app.add_user(&admin, "rita", "recruiter").await;
    let owned = app.add_candidate(&admin, "a@example.com", Some(rita)).await;
    let loose = app.add_candidate(&admin, "b@example.com", None).await;

    let (_, body) = app
        .post("/api/v1/candidates/search", &admin, json!({ "recruiter_id": null }))
        .await;
    assert_eq!(ids(&body), vec![loose]);

    let (_, body) = app
        .post("/api/v1/candidates/search", &admin, json!({ "recruiter_id": rita }))
        .await;
    assert_eq!(ids(&body), vec![owned]);
    assert_eq!(body["data"][0]["recruiter_name"], "RITA");

    let (_, all) = app.post("/api/v1/candidates/search", &admin, json!({})).await;
    let (_, listed) = app.get("/api/v1/candidates", &admin).await;
    assert_eq!(all, listed);
    assert_eq!(ids(&all), vec![loose, owned]);

    let (status, _) = app
        .post("/api/v1/candidates/search", &admin, json!({ "colour": "blue" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_statistics_and_leaderboard() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let rita = app.add_user(&admin, "rita", "recruiter").await;
    let first = app.add_candidate(&admin, "a@example.com", Some(rita)).await;
    app.add_candidate(&admin, "b@example.com", Some(rita)).await;
    app.add_candidate(&admin, "c@example.com", None).await;

    app.send(
        Method::PATCH,
        &format!("/api/v1/candidates/{first}/status"),
        Some(&admin),
        Some(json!({ "status": "Hired" })),
    )
    .await;

    let (status, body) = app.get("/api/v1/candidates/statistics", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["recent"], 3);
    assert_eq!(body["data"]["by_status"]["Applied"], 2);
    assert_eq!(body["data"]["by_status"]["Hired"], 1);
    assert_eq!(body["data"]["by_recruiter"][0]["label"], "RITA");
    assert_eq!(body["data"]["by_recruiter"][0]["count"], 2);

    // Separate read from the statistics above; the two views share no snapshot.
    let (_, body) = app.get("/api/v1/leaderboard", &admin).await;
    let board = body["data"].as_array().unwrap();
    assert_eq!(board[0]["recruiter_id"], rita);
    assert_eq!(board[0]["success_rate"], 50.0);
    assert_eq!(board[1]["recruiter_name"], "System Administrator");
    assert_eq!(board[1]["total"], 0);
}

#[tokio::test]
async fn test_interactions_and_followups() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let id = app.add_candidate(&admin, "ada@example.com", None).await;

    for (date, call_type) in [("2024-06-09", "Phone"), ("2024-06-12", "In-Person"), ("2024-06-10", "Email")] {
        let (status, body) = app
            .post(
                "/api/v1/interactions",
                &admin,
                json!({
                    "candidate_id": id,
                    "call_type": call_type,
                    "duration": 20,
                    "outcome": "Follow-up Required",
                    "next_action": "Call back",
                    "next_action_date": date,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["candidate_name"], "Ada Lovelace");
    }

    let (_, body) = app.get("/api/v1/interactions/followups", &admin).await;
    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["next_action_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-06-10", "2024-06-12"]);

    let (_, body) = app.get("/api/v1/interactions?limit=2", &admin).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .post("/api/v1/interactions", &admin, json!({ "candidate_id": 9999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_candidate_removes_interactions() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let id = app.add_candidate(&admin, "ada@example.com", None).await;

    let (_, body) = app
        .post("/api/v1/interactions", &admin, json!({ "candidate_id": id, "call_type": "Video" }))
        .await;
    let interaction = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/candidates/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/v1/interactions/{interaction}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/api/v1/admin/users",
            &admin,
            json!({
                "username": "sam",
                "email": "sam@example.com",
                "password": "password123",
                "full_name": "Sam",
                "role": "superuser",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let sam = app.add_user(&admin, "sam", "viewer").await;
    let old_token = app.login("sam", "password123").await;

    // A role change ends open sessions; the new role applies from the next login.
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/admin/users/{sam}/role"),
            Some(&admin),
            Some(json!({ "role": "recruiter" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "recruiter");
    let (status, _) = app.get("/api/v1/auth/me", &old_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let sam_token = app.login("sam", "password123").await;
    let (_, body) = app.get("/api/v1/auth/me", &sam_token).await;
    assert_eq!(body["data"]["role"], "recruiter");

    let (_, body) = app
        .post(&format!("/api/v1/admin/users/{sam}/toggle-active"), &admin, json!({}))
        .await;
    assert_eq!(body["data"]["is_active"], false);
    let (status, _) = app.get("/api/v1/auth/me", &sam_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "sam", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = app.get("/api/v1/admin/users", &admin).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/v1/admin/users?include_inactive=true", &admin).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_demoted_admin_loses_admin_access_immediately() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let boss = app.add_user(&admin, "boss", "admin").await;
    let boss_token = app.login("boss", "password123").await;

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/admin/users/{boss}/role"),
            Some(&admin),
            Some(json!({ "role": "viewer" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let new_admin = json!({
        "username": "mallory",
        "email": "mallory@example.com",
        "password": "password123",
        "full_name": "Mallory",
        "role": "admin",
    });
    let (status, _) = app.post("/api/v1/admin/users", &boss_token, new_admin.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let boss_token = app.login("boss", "password123").await;
    let (status, _) = app.post("/api/v1/admin/users", &boss_token, new_admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get("/api/v1/admin/users", &admin).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleted_recruiter_leaves_dangling_reference() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let rita = app.add_user(&admin, "rita", "recruiter").await;
    let id = app.add_candidate(&admin, "ada@example.com", Some(rita)).await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/admin/users/{rita}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get(&format!("/api/v1/candidates/{id}"), &admin).await;
    assert_eq!(body["data"]["recruiter_id"], rita);
    assert_eq!(body["data"]["recruiter_name"], Value::Null);

    let (_, body) = app.get("/api/v1/candidates/statistics", &admin).await;
    assert_eq!(body["data"]["by_recruiter"][0]["label"], "(removed user)");

    // Editing other fields keeps the existing assignment.
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/candidates/{id}"),
            Some(&admin),
            Some(json!({
                "first_name": "Ada",
                "last_name": "Byron",
                "email": "ada@example.com",
                "recruiter_id": rita,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["recruiter_id"], rita);
}

#[tokio::test]
async fn test_candidate_recruiter_must_be_active_recruiter() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.add_user(&admin, "rita", "recruiter").await;
    let vera = app.add_user(&admin, "vera", "viewer").await;
    let rita = app.login("rita", "password123").await;

    for target in [vera, 9999] {
        let (status, body) = app
            .post(
                "/api/v1/candidates",
                &rita,
                json!({
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": format!("ada{target}@example.com"),
                    "recruiter_id": target,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(body["details"][0]["field"], "recruiter_id");
    }

    let id = app.add_candidate(&rita, "ada@example.com", None).await;
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/candidates/{id}"),
            Some(&rita),
            Some(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "recruiter_id": vera,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "recruiter_id");

    let (_, body) = app.get(&format!("/api/v1/candidates/{id}"), &rita).await;
    assert_eq!(body["data"]["recruiter_id"], Value::Null);
}

#[tokio::test]
async fn test_bulk_reassignment_reports_counts() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let rita = app.add_user(&admin, "rita", "recruiter").await;
    let rex = app.add_user(&admin, "rex", "recruiter").await;
    let vera = app.add_user(&admin, "vera", "viewer").await;
    let a = app.add_candidate(&admin, "a@example.com", Some(rita)).await;
    let b = app.add_candidate(&admin, "b@example.com", Some(rita)).await;

    let (status, body) = app
        .post(
            "/api/v1/admin/candidates/reassign",
            &admin,
            json!({ "candidate_ids": [a, 9999, b], "to_recruiter_id": rex }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["attempted"], 3);
    assert_eq!(body["data"]["succeeded"], 2);
    assert_eq!(body["data"]["failed"][0]["candidate_id"], 9999);

    let (_, body) = app
        .post(
            "/api/v1/admin/candidates/reassign",
            &admin,
            json!({ "from_recruiter_id": rex, "to_recruiter_id": null }),
        )
        .await;
    assert_eq!(body["data"]["succeeded"], 2);

    let (status, _) = app
        .post(
            "/api/v1/admin/candidates/reassign",
            &admin,
            json!({ "candidate_ids": [a], "to_recruiter_id": vera }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // A missing target is rejected rather than read as "unassign".
    let (status, body) = app
        .post(
            "/api/v1/admin/candidates/reassign",
            &admin,
            json!({ "from_recruiter_id": rita }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "to_recruiter_id is required; use null to unassign");
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/v1/admin/candidates/{b}/recruiter"),
            Some(&admin),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = app.get(&format!("/api/v1/candidates/{b}"), &admin).await;
    assert_eq!(body["data"]["recruiter_id"], Value::Null);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/admin/candidates/{a}/recruiter"),
            Some(&admin),
            Some(json!({ "recruiter_id": rita })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["recruiter_id"], rita);
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, _) = app
        .post(
            "/api/v1/auth/password",
            &admin,
            json!({ "old_password": "nope-nope", "new_password": "a-much-better-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/v1/auth/password",
            &admin,
            json!({ "old_password": "admin123", "new_password": "a-much-better-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.login("admin", "a-much-better-one").await;
}

#[tokio::test]
async fn test_export_candidates() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.add_candidate(&admin, "a@example.com", None).await;
    app.add_candidate(&admin, "b@example.com", None).await;

    let (status, body) = app.get("/api/v1/export/candidates", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filename"], "candidates_20240610_090000.csv");

    let columns = body["data"]["columns"].as_array().unwrap();
    assert_eq!(columns[0], "id");
    let rows = body["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.as_array().unwrap().len() == columns.len()));
}
