//! Device Farm response fixtures

use serde_json::{Value, json};

/// Project ARN used by the fixtures
pub const PROJECT_ARN: &str =
    "arn:aws:devicefarm:us-west-2:123456789012:testgrid-project:fake-project-id";

/// ARN of the session named `session_id` in the fixture project
pub fn session_arn(session_id: &str) -> String {
    format!("arn:aws:devicefarm:us-west-2:123456789012:testgrid-session:fake-project-id/{session_id}")
}

/// A `testGridProject` object
pub fn project_json(arn: &str, name: &str) -> Value {
    json!({
        "arn": arn,
        "name": name,
        "created": 1_700_000_000.0,
    })
}

/// A `testGridSession` object with its selenium properties blob
pub fn session_json(session_id: &str, browser: &str, version: &str, platform: &str) -> Value {
    let properties = json!({
        "browser": browser,
        "browserVersion": version,
        "platform": platform,
    });
    json!({
        "arn": session_arn(session_id),
        "status": "CLOSED",
        "created": 1_700_000_100.0,
        "ended": 1_700_000_200.0,
        "billingMinutes": 2.0,
        "seleniumProperties": properties.to_string(),
    })
}

/// A `testGridSessionArtifact` object
pub fn artifact_json(filename: &str, kind: &str, url: &str) -> Value {
    json!({
        "filename": filename,
        "type": kind,
        "url": url,
    })
}
