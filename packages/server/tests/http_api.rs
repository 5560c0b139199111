//! HTTP API integration tests.
//!
//! Tests for the read-only HTTP endpoints (health check, room list, room
//! details) against a real server process.

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start(19180);
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_rooms_list_empty_before_any_join() {
    // テスト項目: /api/rooms は参加が一度もなければ空の一覧を返す
    // given (前提条件): ルームは Join でのみ生成される
    let server = TestServer::start(19181);
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/rooms", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body.is_array(), "Response should be an array");
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_room_detail_endpoint_not_found() {
    // テスト項目: /api/rooms/:room_id は存在しないルームに対して 404 を返す
    // given (前提条件):
    let server = TestServer::start(19182);
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/rooms/nonexistent", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_debug_rooms_endpoint() {
    // テスト項目: /debug/rooms が生のルーム状態（初期状態では空）を返す
    // given (前提条件):
    let server = TestServer::start(19183);
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/debug/rooms", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body.is_array());
    assert_eq!(body.as_array().unwrap().len(), 0);
}
