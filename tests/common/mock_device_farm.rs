//! wiremock stand-in for the Device Farm JSON 1.1 endpoint

use serde_json::Value;
use testgrid_artifacts::catalog::SERVICE_TARGET_PREFIX;
use testgrid_artifacts::{AwsConfig, CredentialSource, Credentials, DeviceFarmClient};
use url::Url;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Static test credentials
pub fn test_credentials() -> Credentials {
    Credentials {
        access_key_id: "AKIDEXAMPLE".into(),
        secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
        session_token: None,
    }
}

/// Client pointed at `server`
pub fn client_for(server: &MockServer) -> DeviceFarmClient {
    DeviceFarmClient::new(AwsConfig {
        endpoint: Some(Url::parse(&server.uri()).unwrap()),
        credentials: CredentialSource::Static(test_credentials()),
        ..Default::default()
    })
}

/// A signed JSON 1.1 call of `operation` whose body contains `body`
pub fn operation(operation: &str, body: Value) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header(
            "x-amz-target",
            format!("{SERVICE_TARGET_PREFIX}.{operation}").as_str(),
        ))
        .and(header("content-type", "application/x-amz-json-1.1"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .and(body_partial_json(body))
}

/// Respond to `operation` calls matching `body` with `response`
pub async fn mount_operation(server: &MockServer, name: &str, body: Value, response: Value) {
    operation(name, body)
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Respond to `operation` calls matching `body` with a JSON protocol error
pub async fn mount_error(server: &MockServer, name: &str, body: Value, code: &str, message: &str) {
    operation(name, body)
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "__type": format!("com.amazonaws.devicefarm#{code}"),
            "message": message,
        })))
        .mount(server)
        .await;
}

/// Serve `content` as a presigned artifact download at `url_path`
pub async fn mount_download(server: &MockServer, url_path: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}
