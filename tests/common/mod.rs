//! Shared fixtures: one mock server per prediction service.
#![allow(dead_code)]

use rust_name_guesser::config::Config;
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct Upstreams {
    pub agify: MockServer,
    pub genderize: MockServer,
    pub nationalize: MockServer,
}

impl Upstreams {
    pub async fn start() -> Self {
        Self {
            agify: MockServer::start().await,
            genderize: MockServer::start().await,
            nationalize: MockServer::start().await,
        }
    }

    pub fn config(&self) -> Config {
        create_test_config(
            self.agify.uri(),
            self.genderize.uri(),
            self.nationalize.uri(),
        )
    }

    /// Mounts successful responses for `name` on all three services.
    pub async fn mount_all(&self, name: &str, age: Value, gender: Value, country: Value) {
        mount_json(
            &self.agify,
            name,
            serde_json::json!({"name": name, "age": age, "count": 1200}),
        )
        .await;
        mount_json(
            &self.genderize,
            name,
            serde_json::json!({"name": name, "gender": gender, "probability": 0.98}),
        )
        .await;
        mount_json(
            &self.nationalize,
            name,
            serde_json::json!({"name": name, "country": country}),
        )
        .await;
    }
}

/// Helper function to create test config
pub fn create_test_config(agify: String, genderize: String, nationalize: String) -> Config {
    Config {
        port: 8080,
        agify_base_url: agify,
        genderize_base_url: genderize,
        nationalize_base_url: nationalize,
        session_idle_secs: 60,
        session_capacity: 100,
    }
}

pub async fn mount_json(server: &MockServer, name: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream exploded"))
        .mount(server)
        .await;
}

/// Fails verification on drop if the server receives any request.
pub async fn expect_no_calls(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}
