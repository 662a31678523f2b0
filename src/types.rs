//! Core types for testgrid-artifacts

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Prefix that marks an identifier as an already-resolved ARN
pub const QUALIFIED_PREFIX: &str = "arn:";

/// Index of the resource segment in a `:`-separated ARN
const RESOURCE_SEGMENT: usize = 6;

/// Amazon Resource Name of a TestGrid project or session
///
/// A plain string wrapper: nothing is validated on construction, a malformed
/// ARN only surfaces once something tries to use it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arn(pub String);

impl Arn {
    /// Create a new Arn
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `identifier` is already a qualified ARN rather than a project name
    #[must_use]
    pub fn is_qualified(identifier: &str) -> bool {
        identifier.starts_with(QUALIFIED_PREFIX)
    }

    /// Resource segment of the ARN
    ///
    /// For `arn:aws:devicefarm:us-west-2:123:testgrid-project:abc` this is `abc`.
    pub fn resource_id(&self) -> Option<&str> {
        self.0.split(':').nth(RESOURCE_SEGMENT)
    }

    /// Session id carried in a session ARN's `<project-id>/<session-id>` suffix
    pub fn session_id(&self) -> Result<&str> {
        self.resource_id()
            .and_then(|resource| resource.split('/').nth(1))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidArn(self.0.clone()))
    }
}

impl std::fmt::Display for Arn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Arn {
    fn from(arn: &str) -> Self {
        Self(arn.to_string())
    }
}

impl From<String> for Arn {
    fn from(arn: String) -> Self {
        Self(arn)
    }
}

/// A TestGrid project as returned by the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ARN
    pub arn: Arn,
    /// Human-chosen project name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<f64>,
}

/// A single Selenium session run against a project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session ARN
    pub arn: Arn,
    /// JSON-encoded browser/platform properties of the session
    #[serde(default)]
    pub selenium_properties: String,
    /// Session status (ACTIVE, CLOSED, ERRORED)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Creation time, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<f64>,
    /// End time, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended: Option<f64>,
    /// Billed minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_minutes: Option<f64>,
}

impl Session {
    /// Decode the embedded selenium properties blob
    pub fn properties(&self) -> Result<SeleniumProperties> {
        Ok(serde_json::from_str(&self.selenium_properties)?)
    }
}

/// Browser, version and platform a session ran on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeleniumProperties {
    /// Browser name (e.g., "chrome")
    pub browser: String,
    /// Browser version (e.g., "119.0")
    pub browser_version: String,
    /// Platform (e.g., "linux")
    pub platform: String,
}

impl SeleniumProperties {
    /// Folder name for this browser combination: `browser-browserVersion-platform`
    pub fn folder_name(&self) -> String {
        format!("{}-{}-{}", self.browser, self.browser_version, self.platform)
    }
}

/// Category of artifact a session produces
///
/// The catalog only knows `VIDEO` and `LOG`; anything else is carried as-is
/// and left for the API to reject.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
    /// Screen recording of the session
    Video,
    /// Selenium driver log
    Log,
    /// Unrecognized value, forwarded uninterpreted
    Other(String),
}

impl ArtifactCategory {
    /// Every category the catalog knows about
    pub const ALL: [ArtifactCategory; 2] = [ArtifactCategory::Video, ArtifactCategory::Log];

    /// Sentinel input value that expands to [`ArtifactCategory::ALL`]
    pub const ALL_SENTINEL: &'static str = "ALL";

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            ArtifactCategory::Video => "VIDEO",
            ArtifactCategory::Log => "LOG",
            ArtifactCategory::Other(value) => value,
        }
    }
}

impl std::fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ArtifactCategory {
    fn from(value: &str) -> Self {
        match value {
            "VIDEO" => ArtifactCategory::Video,
            "LOG" => ArtifactCategory::Log,
            other => ArtifactCategory::Other(other.to_string()),
        }
    }
}

impl Serialize for ArtifactCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArtifactCategory {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(ArtifactCategory::from(value.as_str()))
    }
}

/// Expand the requested artifact types into the categories to list
///
/// A request of exactly `["ALL"]` becomes every known category. Anything else
/// is kept in order, untouched, so `ALL` mixed with other values is forwarded
/// literally.
pub fn expand_categories<S: AsRef<str>>(requested: &[S]) -> Vec<ArtifactCategory> {
    if let [only] = requested
        && only.as_ref() == ArtifactCategory::ALL_SENTINEL
    {
        return ArtifactCategory::ALL.to_vec();
    }
    requested
        .iter()
        .map(|value| ArtifactCategory::from(value.as_ref()))
        .collect()
}

/// An artifact listed for a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// File name to store the artifact under
    pub filename: String,
    /// Artifact type reported by the catalog (VIDEO, SELENIUM_LOG, UNKNOWN)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Presigned download URL
    pub url: String,
}

/// Local path an artifact is written to
///
/// `<root>/<sessionId>/<browser>-<browserVersion>-<platform>/<category>/<filename>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Directory that must exist before the write
    pub dir: PathBuf,
    /// Full file path
    pub path: PathBuf,
}

impl DownloadTarget {
    /// Derive the target for one artifact of a session
    pub fn new(
        root: &Path,
        session_id: &str,
        properties: &SeleniumProperties,
        category: &str,
        filename: &str,
    ) -> Self {
        let dir = root
            .join(session_id)
            .join(properties.folder_name())
            .join(category);
        let path = dir.join(filename);
        Self { dir, path }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const SESSION_ARN: &str =
        "arn:aws:devicefarm:us-west-2:account-id:testgrid-session:project-id/fake-session-id";

    #[test]
    fn test_is_qualified() {
        assert!(Arn::is_qualified("arn:fake-arn"));
        assert!(!Arn::is_qualified("fake-name"));
        assert!(!Arn::is_qualified("ARN:upper"));
        assert!(!Arn::is_qualified(""));
    }

    #[test]
    fn test_resource_id() {
        let arn = Arn::from("arn:aws:devicefarm:us-west-2:account-d:testgrid-project:project-id");
        assert_eq!(arn.resource_id(), Some("project-id"));
        assert_eq!(Arn::from("arn:fake-arn").resource_id(), None);
    }

    #[test]
    fn test_session_id_from_arn_suffix() {
        assert_eq!(Arn::from(SESSION_ARN).session_id().unwrap(), "fake-session-id");
    }

    #[test]
    fn test_session_id_missing_suffix_is_error() {
        let arn = Arn::from("arn:aws:devicefarm:us-west-2:account-id:testgrid-session:project-id");
        match arn.session_id() {
            Err(Error::InvalidArn(value)) => assert_eq!(value, arn.0),
            other => panic!("Expected InvalidArn, got {other:?}"),
        }
        assert!(Arn::from("arn:short").session_id().is_err());
    }

    #[test]
    fn test_session_properties_decode() {
        let session = Session {
            arn: Arn::from(SESSION_ARN),
            selenium_properties:
                r#"{"browser": "b", "browserVersion": "v", "platform": "p", "extra": 1}"#.into(),
            status: None,
            created: None,
            ended: None,
            billing_minutes: None,
        };
        let props = session.properties().unwrap();
        assert_eq!(props.folder_name(), "b-v-p");
    }

    #[test]
    fn test_session_properties_invalid_json() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "arn": SESSION_ARN,
            "seleniumProperties": "not json",
        }))
        .unwrap();
        assert!(matches!(session.properties(), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_expand_all_sentinel() {
        assert_eq!(
            expand_categories(&["ALL"]),
            vec![ArtifactCategory::Video, ArtifactCategory::Log]
        );
    }

    #[test]
    fn test_expand_keeps_given_values() {
        assert_eq!(expand_categories(&["VIDEO"]), vec![ArtifactCategory::Video]);
        // ALL is only a sentinel on its own
        assert_eq!(
            expand_categories(&["ALL", "LOG"]),
            vec![
                ArtifactCategory::Other("ALL".into()),
                ArtifactCategory::Log
            ]
        );
        assert_eq!(
            expand_categories(&["video"]),
            vec![ArtifactCategory::Other("video".into())]
        );
        assert!(expand_categories::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_artifact_category_serde() {
        let json = serde_json::to_string(&ArtifactCategory::Log).unwrap();
        assert_eq!(json, "\"LOG\"");
        let parsed: ArtifactCategory = serde_json::from_str("\"SELENIUM_LOG\"").unwrap();
        assert_eq!(parsed, ArtifactCategory::Other("SELENIUM_LOG".into()));
    }

    #[test]
    fn test_download_target_layout() {
        let props = SeleniumProperties {
            browser: "b".into(),
            browser_version: "v".into(),
            platform: "p".into(),
        };
        let target = DownloadTarget::new(Path::new("root"), "sid", &props, "VIDEO", "f");
        assert_eq!(target.dir, Path::new("root/sid/b-v-p/VIDEO"));
        assert_eq!(target.path, Path::new("root/sid/b-v-p/VIDEO/f"));
    }
}
