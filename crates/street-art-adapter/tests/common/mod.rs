/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for street-art-adapter tests

use street_art_adapter::SupabaseClient;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-anon-key";
pub const TEST_TABLE: &str = "street_art_submission";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&server.uri(), TEST_API_KEY).expect("client init")
}

/// Row shaped like a stored submission
pub fn submission_row(name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "5d0b0c8e-0000-4000-8000-000000000001",
        "artistName": name,
        "artistEmail": email,
        "artworkTitle": "Untitled",
    })
}
