use reqwest::StatusCode;
use serde_json::{json, Value};

use rolegate_infra::StoreConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod (in-memory store), bound to an ephemeral port.
        let app = rolegate_api::app::build_app(StoreConfig::default())
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn add_role(&self, name: &str, permission_ids: &[i32]) -> i64 {
        let (status, body) = self
            .send(
                reqwest::Method::POST,
                "/api/Roles",
                json!({"name": name, "active": true, "permissionIds": permission_ids}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn add_user(&self, name: &str, role_id: i64) -> (StatusCode, Value) {
        self.send(
            reqwest::Method::POST,
            "/api/Users",
            json!({"name": name, "active": true, "roleId": role_id}),
        )
        .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public_and_tagged_with_request_id() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn permission_list_returns_the_seeded_catalogue() {
    let srv = TestServer::spawn().await;
    let (status, body) = srv.get("/api/Permission/list").await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 6);
    assert_eq!(data[0], json!({"name": "Commission", "active": true}));
    assert_eq!(data[5], json!({"name": "Inactive", "active": false}));
}

#[tokio::test]
async fn role_lifecycle_add_get_update_delete() {
    let srv = TestServer::spawn().await;
    let id = srv.add_role("Underwriting", &[1, 2]).await;

    let (status, body) = srv.get(&format!("/api/Roles?id={id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": id, "name": "Underwriting", "active": true, "permissionIds": [1, 2]})
    );

    let (status, body) = srv
        .send(
            reqwest::Method::PUT,
            "/api/Roles",
            json!({"id": id, "name": "Underwriting", "active": false, "permissionIds": [3]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Updated", "id": id}));

    let (_, body) = srv.get(&format!("/api/Roles?id={id}")).await;
    assert_eq!(body["permissionIds"], json!([3]));
    assert_eq!(body["active"], json!(false));

    let (status, body) = srv.send(reqwest::Method::DELETE, "/api/Roles", json!(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Deleted", "id": id}));

    let (status, body) = srv.get(&format!("/api/Roles?id={id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not_found", "message": "Role not found."}));
}

#[tokio::test]
async fn role_validation_errors_are_bad_requests() {
    let srv = TestServer::spawn().await;
    srv.add_role("Admin", &[4]).await;

    let cases = [
        (json!({"name": "Admin", "active": true, "permissionIds": [1]}), "Role name must be unique."),
        (json!({"name": " ", "active": true, "permissionIds": [1]}), "Role name cannot be empty."),
        (json!({"name": "Ops", "active": true, "permissionIds": []}), "Permission IDs cannot be empty."),
        (json!({"name": "Ops", "active": true}), "Permission IDs cannot be empty."),
        (json!({"name": "Ops", "active": true, "permissionIds": [1, 42]}), "One or more Permission IDs are invalid."),
    ];
    for (request, message) in cases {
        let (status, body) = srv.send(reqwest::Method::POST, "/api/Roles", request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn update_and_delete_of_unknown_role_are_not_found() {
    let srv = TestServer::spawn().await;

    let (status, _) = srv
        .send(
            reqwest::Method::PUT,
            "/api/Roles",
            json!({"id": 404, "name": "X", "active": true, "permissionIds": [1]}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = srv.send(reqwest::Method::DELETE, "/api/Roles", json!(404)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Role not found.");
}

#[tokio::test]
async fn role_list_filters_and_paginates() {
    let srv = TestServer::spawn().await;
    for n in 0..12 {
        srv.add_role(&format!("Desk {n:02}"), &[1, 3]).await;
    }
    srv.add_role("Auditor", &[2]).await;

    let (status, body) = srv.get("/api/Roles/list?search=Desk&pageNumber=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageNumber"], 2);
    assert_eq!(body["totalMatches"], 12);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(
        data[0],
        json!({"name": "Desk 10", "active": true, "permissions": ["Commission", "Risk Management"]})
    );

    let (_, body) = srv.get("/api/Roles/list?permissionId=2").await;
    assert_eq!(body["totalMatches"], 1);
    assert_eq!(body["data"][0]["name"], "Auditor");

    let (status, body) = srv.get("/api/Roles/list?active=false").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Page number exceeds the total number of available pages.");
}

#[tokio::test]
async fn role_list_rejects_bad_page_numbers() {
    let srv = TestServer::spawn().await;
    srv.add_role("Only", &[1]).await;

    let (status, body) = srv.get("/api/Roles/list?pageNumber=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid page number. Page number must be greater than 0.");

    let (status, body) = srv.get("/api/Roles/list?pageNumber=100").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Page number exceeds the total number of available pages.");
}

#[tokio::test]
async fn users_add_update_and_list() {
    let srv = TestServer::spawn().await;
    let agent = srv.add_role("Agent", &[1]).await;
    let lead = srv.add_role("Lead", &[1, 2]).await;

    let (status, body) = srv.add_user("alice", agent).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added");
    let alice = body["id"].as_i64().unwrap();
    srv.add_user("bob", agent).await;

    let (status, body) = srv
        .send(
            reqwest::Method::PUT,
            "/api/Users",
            json!({"id": alice, "name": "alice", "active": false, "roleId": lead}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Updated", "id": alice}));

    let (status, body) = srv.get(&format!("/api/Users/list?roleId={lead}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "pageNumber": 1,
            "matchesCount": 1,
            "data": [{"name": "alice", "role": "Lead", "active": false}]
        })
    );

    let (_, body) = srv.get("/api/Users/list?pageNumber=5").await;
    assert_eq!(body["pageNumber"], 5);
    assert_eq!(body["matchesCount"], 2);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn user_validation_errors() {
    let srv = TestServer::spawn().await;
    let agent = srv.add_role("Agent", &[1]).await;
    srv.add_user("alice", agent).await;

    let (status, body) = srv.add_user("carol", 9999).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Role ID.");

    let (status, body) = srv.add_user("alice", agent).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User name must be unique.");

    let (status, body) = srv
        .send(reqwest::Method::POST, "/api/Users", json!({"name": "dave", "active": true}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Role ID cannot be empty.");

    let (status, body) = srv
        .send(
            reqwest::Method::PUT,
            "/api/Users",
            json!({"id": 321, "name": "ghost", "active": true, "roleId": agent}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found.");
}

#[tokio::test]
async fn referenced_role_cannot_be_deleted() {
    let srv = TestServer::spawn().await;
    let agent = srv.add_role("Agent", &[1]).await;
    srv.add_user("alice", agent).await;

    let (status, body) = srv.send(reqwest::Method::DELETE, "/api/Roles", json!(agent)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete role as it is assigned to one or more users."
    );

    let (status, _) = srv.get(&format!("/api/Roles?id={agent}")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = srv.get("/api/Users/list").await;
    assert_eq!(body["data"][0]["role"], "Agent");
}
