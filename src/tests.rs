//! Integration tests for the AeroMed backend.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::dispatch::{self, DispatchBoard, Dispatcher};
use crate::{create_router, AppState};

/// Options for building a test server.
struct FixtureOptions {
    psk: Option<String>,
    delivery_delay: Option<Duration>,
    seed_demo: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            psk: Some("test-api-key".to_string()),
            delivery_delay: None,
            seed_demo: true,
        }
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

async fn build_state(options: &FixtureOptions, temp_dir: &TempDir) -> AppState {
    let db_path = temp_dir.path().join("test.sqlite");
    let pool = init_database(&db_path).await.expect("Failed to init DB");
    let repo = Arc::new(Repository::new(pool));

    let mut board = DispatchBoard::new();
    if options.seed_demo {
        dispatch::seed_demo(&mut board);
    }

    let config = Config {
        api_psk: options.psk.clone(),
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        delivery_delay: options.delivery_delay,
        seed_demo: options.seed_demo,
    };

    AppState {
        repo,
        dispatch: Dispatcher::new(board, options.delivery_delay),
        config: Arc::new(config),
    }
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_options(FixtureOptions::default()).await
    }

    async fn with_options(options: FixtureOptions) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = build_state(&options, &temp_dir).await;
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = options.psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn create_operator(&self, body: Value) -> Value {
        let (status, created) = self.post("/api/operators", body).await;
        assert_eq!(status, 201);
        created
    }
}

// ==================== HEALTH & AUTH ====================

#[tokio::test]
async fn test_health_check_bypasses_auth() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_router(build_state(&FixtureOptions::default(), &temp_dir).await);

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_auth_missing_and_invalid_psk() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_router(build_state(&FixtureOptions::default(), &temp_dir).await);

    let missing = app
        .clone()
        .oneshot(Request::get("/api/operators").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);
    let bytes = axum::body::to_bytes(missing.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let wrong = app
        .oneshot(
            Request::get("/api/requests")
                .header("x-api-key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);
}

#[tokio::test]
async fn test_auth_bearer_token_accepted() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/missions"))
        .bearer_auth("test-api-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_no_psk_allows_all() {
    let fixture = TestFixture::with_options(FixtureOptions {
        psk: None,
        ..Default::default()
    })
    .await;

    let (status, body) = fixture.get("/api/operators").await;
    assert_eq!(status, 200);
    assert!(body.as_array().unwrap().is_empty());
}

// ==================== OPERATORS ====================

#[tokio::test]
async fn test_create_operator_listed_first_with_server_fields() {
    let fixture = TestFixture::new().await;

    fixture
        .create_operator(json!({
            "name": "B. Kale",
            "role": "Coordinator",
            "subDistrict": "Gadhchiroli"
        }))
        .await;
    let created = fixture
        .create_operator(json!({
            "name": "A. Rao",
            "role": "Pilot",
            "subDistrict": "Chamorshi"
        }))
        .await;

    let id = created["_id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(created["status"], "Active");
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    let (status, list) = fixture.get("/api/operators").await;
    assert_eq!(status, 200);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["_id"], id);
    assert_eq!(list[0]["name"], "A. Rao");
    assert_eq!(list[0]["subDistrict"], "Chamorshi");
    assert_eq!(list.iter().filter(|op| op["_id"] == id).count(), 1);
}

#[tokio::test]
async fn test_create_operator_normalizes_contact() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .create_operator(json!({
            "name": "S. Patil",
            "role": "Technician",
            "subDistrict": "Chamorshi",
            "experience": "4 years",
            "phone": "98220 12345",
            "email": "patil@example.org"
        }))
        .await;

    assert_eq!(created["contact"]["phone"], "98220 12345");
    assert_eq!(created["contact"]["email"], "patil@example.org");
    assert!(created.get("phone").is_none());
    assert_eq!(created["experience"], "4 years");
}

#[tokio::test]
async fn test_create_operator_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/operators",
            json!({ "name": "", "role": "Pilot", "subDistrict": "Chamorshi" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = fixture
        .post(
            "/api/operators",
            json!({ "name": "X", "role": "Astronaut", "subDistrict": "Chamorshi" }),
        )
        .await;
    assert_eq!(status, 400);

    let (_, list) = fixture.get("/api/operators").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_operator_always_confirms() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .create_operator(json!({
            "name": "A. Rao",
            "role": "Pilot",
            "subDistrict": "Chamorshi"
        }))
        .await;
    let id = created["_id"].as_str().unwrap();

    let existing = fixture
        .client
        .delete(fixture.url(&format!("/api/operators/{}", id)))
        .send()
        .await
        .unwrap();
    let existing_status = existing.status();
    let existing_body = existing.text().await.unwrap();

    let missing = fixture
        .client
        .delete(fixture.url("/api/operators/does-not-exist"))
        .send()
        .await
        .unwrap();
    let missing_status = missing.status();
    let missing_body = missing.text().await.unwrap();

    assert_eq!(existing_status, 200);
    assert_eq!(existing_body, "\"Deleted\"");
    assert_eq!(missing_status, existing_status);
    assert_eq!(missing_body, existing_body);

    let (_, list) = fixture.get("/api/operators").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/operators",
            json!({
                "name": "A. Rao",
                "role": "Pilot",
                "subDistrict": "Chamorshi",
                "contact": "98220"
            }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = fixture
        .post(
            "/api/requests",
            json!({
                "phc": "PHC Chamorshi",
                "urgency": "Urgent",
                "item": "ORS Sachets",
                "qty": 10
            }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("urgency"));

    let (status, body) = fixture
        .post("/api/requests/101/dispatch", json!({ "confirm": "yes" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = fixture
        .post("/api/inventory/6/adjust", json!({ "amount": "lots" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, list) = fixture.get("/api/operators").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_returns_database_error() {
    let temp_dir = TempDir::new().unwrap();
    let options = FixtureOptions {
        psk: None,
        ..Default::default()
    };
    let app = create_router(build_state(&options, &temp_dir).await);

    let db_url = format!("sqlite:{}", temp_dir.path().join("test.sqlite").display());
    let pool = sqlx::SqlitePool::connect(&db_url).await.unwrap();
    sqlx::query("DROP TABLE operators")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let resp = app
        .oneshot(Request::get("/api/operators").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
}

// ==================== DISPATCH WORKFLOW ====================

#[tokio::test]
async fn test_seeded_requests_expose_pending_actions() {
    let fixture = TestFixture::new().await;

    let (status, list) = fixture.get("/api/requests").await;
    assert_eq!(status, 200);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["_id"], "101");
    assert_eq!(list[0]["urgency"], "Critical");
    assert_eq!(list[0]["availableActions"], json!(["approve", "reject"]));
    assert_eq!(list[1]["chat"][0]["sender"], "PHC");
}

#[tokio::test]
async fn test_full_dispatch_lifecycle() {
    let fixture = TestFixture::new().await;

    let (status, approved) = fixture.post("/api/requests/101/approve", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(approved["status"], "Approved");
    assert_eq!(approved["availableActions"], json!(["dispatch"]));

    let (status, mission) = fixture
        .post("/api/requests/101/dispatch", json!({ "confirm": true }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(mission["id"], "101");
    assert_eq!(mission["phc"], "PHC Chamorshi");
    assert!(mission["destination"]["lat"].is_number());

    let (_, request) = fixture.get("/api/requests/101").await;
    assert_eq!(request["status"], "Dispatched");
    assert_eq!(request["availableActions"], json!([]));

    let (_, missions) = fixture.get("/api/missions").await;
    assert_eq!(missions.as_array().unwrap().len(), 1);

    let (status, delivered) = fixture.post("/api/missions/101/complete", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(delivered["status"], "Delivered");
    assert_eq!(delivered["availableActions"], json!([]));

    let (_, missions) = fixture.get("/api/missions").await;
    assert!(missions.as_array().unwrap().is_empty());

    let (_, activity) = fixture.get("/api/activity").await;
    let activity = activity.as_array().unwrap();
    assert!(activity[0]["message"]
        .as_str()
        .unwrap()
        .contains("PHC Chamorshi"));
    assert_eq!(activity[0]["severity"], "success");
}

#[tokio::test]
async fn test_delivery_timer_marks_delivered() {
    let fixture = TestFixture::with_options(FixtureOptions {
        delivery_delay: Some(Duration::from_millis(100)),
        ..Default::default()
    })
    .await;

    fixture.post("/api/requests/102/approve", json!({})).await;
    let (status, _) = fixture
        .post("/api/requests/102/dispatch", json!({ "confirm": true }))
        .await;
    assert_eq!(status, 200);

    tokio::time::sleep(Duration::from_millis(500)).await;

    let (_, request) = fixture.get("/api/requests/102").await;
    assert_eq!(request["status"], "Delivered");
    let (_, missions) = fixture.get("/api/missions").await;
    assert!(missions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_dispatch_replaces_mission() {
    let fixture = TestFixture::new().await;

    fixture.post("/api/requests/101/approve", json!({})).await;
    fixture.post("/api/requests/102/approve", json!({})).await;
    fixture
        .post("/api/requests/101/dispatch", json!({ "confirm": true }))
        .await;
    fixture
        .post("/api/requests/102/dispatch", json!({ "confirm": true }))
        .await;

    let (_, missions) = fixture.get("/api/missions").await;
    let missions = missions.as_array().unwrap();
    assert_eq!(missions.len(), 1);
    assert_eq!(missions[0]["id"], "102");

    // The replaced request cannot be completed through the arrival hook.
    let (status, body) = fixture.post("/api/missions/101/complete", json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_transitions_and_confirmation() {
    let fixture = TestFixture::new().await;

    // Dispatch before approval
    let (status, body) = fixture
        .post("/api/requests/101/dispatch", json!({ "confirm": true }))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    // Dispatch without confirmation
    fixture.post("/api/requests/101/approve", json!({})).await;
    let (status, body) = fixture
        .post("/api/requests/101/dispatch", json!({ "confirm": false }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Rejected is terminal
    let (status, rejected) = fixture.post("/api/requests/102/reject", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(rejected["availableActions"], json!([]));
    let (status, _) = fixture.post("/api/requests/102/approve", json!({})).await;
    assert_eq!(status, 409);

    // Unknown request
    let (status, body) = fixture.post("/api/requests/999/approve", json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_request_and_chat() {
    let fixture = TestFixture::with_options(FixtureOptions {
        seed_demo: false,
        ..Default::default()
    })
    .await;

    let (status, created) = fixture
        .post(
            "/api/requests",
            json!({
                "phc": "PHC Gadhchiroli",
                "urgency": "Medium",
                "item": "Inj. Dexamethasone",
                "qty": 20
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["distance"], "30km");
    let id = created["_id"].as_str().unwrap();

    let (status, chatted) = fixture
        .post(
            &format!("/api/requests/{}/chat", id),
            json!({ "message": "Loading drone now" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(chatted["chat"][0]["sender"], "Hospital");
    assert_eq!(chatted["chat"][0]["message"], "Loading drone now");

    let (status, _) = fixture
        .post(
            &format!("/api/requests/{}/chat", id),
            json!({ "message": "   " }),
        )
        .await;
    assert_eq!(status, 400);
}

// ==================== INVENTORY ====================

#[tokio::test]
async fn test_inventory_adjust_clamps_and_add() {
    let fixture = TestFixture::new().await;

    let (_, items) = fixture.get("/api/inventory").await;
    assert_eq!(items.as_array().unwrap().len(), 6);

    let (status, item) = fixture
        .post("/api/inventory/6/adjust", json!({ "amount": -1000 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(item["stock"], 0);

    let (_, item) = fixture
        .post("/api/inventory/6/adjust", json!({ "amount": 250 }))
        .await;
    assert_eq!(item["stock"], 250);

    let (status, added) = fixture
        .post("/api/inventory", json!({ "name": "ORS Sachets", "stock": 40 }))
        .await;
    assert_eq!(status, 201);
    assert_eq!(added["id"], 26);
    assert_eq!(added["expiry"], "2025-01-01");

    let (status, _) = fixture
        .post("/api/inventory/12345/adjust", json!({ "amount": 1 }))
        .await;
    assert_eq!(status, 404);
}
