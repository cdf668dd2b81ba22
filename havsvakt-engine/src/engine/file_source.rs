use std::path::{Path, PathBuf};

use async_trait::async_trait;
use havsvakt_core::{Alert, Vessel};
use havsvakt_geometry::Geofence;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use super::error::SourceError;
use super::source::FleetSource;

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Reads `vessels`, `alerts` and `geofences` documents from a directory,
/// fresh on every call. Each document is a YAML or JSON list; a missing
/// document reads as an empty list.
#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn locate(&self, stem: &str) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.data_dir.join(format!("{stem}.{ext}")))
            .find(|path| path.is_file())
    }

    async fn read_list<T: DeserializeOwned>(&self, stem: &str) -> Result<Vec<T>, SourceError> {
        if !self.data_dir.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "data directory {} does not exist",
                self.data_dir.display()
            )));
        }

        let Some(path) = self.locate(stem) else {
            debug!("No {stem} document in {}", self.data_dir.display());
            return Ok(Vec::new());
        };

        let items: Vec<T> = read_document(&path).await?;
        trace!("Read {} {stem} from {}", items.len(), path.display());
        Ok(items)
    }
}

/// Parses one YAML or JSON list document, chosen by file extension. An
/// empty file is an empty list.
///
/// The document must be a list, otherwise it fails as a whole. Each entry is
/// decoded on its own: an entry that does not decode is logged and skipped,
/// the rest of the document is still returned.
pub async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let parse_error = |reason: String| SourceError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let entries: Vec<Result<T, String>> = if path.extension().is_some_and(|ext| ext == "json") {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string()))?;
        values
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(|e| e.to_string()))
            .collect()
    } else {
        let values: Vec<serde_yaml::Value> =
            serde_yaml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?;
        values
            .into_iter()
            .map(|value| serde_yaml::from_value(value).map_err(|e| e.to_string()))
            .collect()
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Ok(record) => records.push(record),
            Err(reason) => warn!("Skipping entry {index} of {}: {reason}", path.display()),
        }
    }
    Ok(records)
}

#[async_trait]
impl FleetSource for FileSource {
    async fn vessels(&self) -> Result<Vec<Vessel>, SourceError> {
        self.read_list("vessels").await
    }

    async fn alerts(&self) -> Result<Vec<Alert>, SourceError> {
        self.read_list("alerts").await
    }

    async fn geofences(&self) -> Result<Vec<Geofence>, SourceError> {
        self.read_list("geofences").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use havsvakt_geometry::{GeofenceKey, GeofenceKind, LatLng};
    use std::fs;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn reads_yaml_and_json_documents() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("vessels.yaml"),
            "- name: MV TEST\n  imo: 9321483\n  lat: 10.0005\n  lng: 10.0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("geofences.json"),
            r#"[{"name": "Port X", "kind": "circle", "center": {"lat": 10.0, "lng": 10.0}, "radius_meters": 100}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("alerts.yml"),
            "- vesselSelected: [9321483]\n  geofence: Port X | Circle\n  email: ops@example.com\n  message: Berth 4\n",
        )
        .unwrap();

        let source = FileSource::new(dir.path());
        let vessels = source.vessels().await.unwrap();
        let geofences = source.geofences().await.unwrap();
        let alerts = source.alerts().await.unwrap();

        assert_eq!(vessels[0].position(), Some(LatLng::new(10.0005, 10.0)));
        assert_eq!(geofences[0].kind(), GeofenceKind::Circle);
        assert_eq!(alerts[0].geofence, geofences[0].key());
        assert_eq!(alerts[0].recipients, vec!["ops@example.com".to_string()]);
    }

    #[tokio::test]
    async fn missing_document_is_empty() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path());
        assert!(source.alerts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_unavailable() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope"));
        assert!(matches!(source.vessels().await, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    #[traced_test]
    async fn undecodable_entries_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("geofences.yaml"),
            r#"
- name: Port X
  kind: circle
  center: { lat: 10.0, lng: 10.0 }
  radius_meters: 100
- name: Old Dock
  kind: rectangle
  corners: [{ lat: 0.0, lng: 0.0 }, { lat: 1.0, lng: 1.0 }]
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("vessels.json"),
            r#"[{"name": "MV TEST", "lat": 10.0, "lng": 10.0}, {"lat": 1.0}, {"name": "MV QUIET", "lng": 3.0}]"#,
        )
        .unwrap();
        let source = FileSource::new(dir.path());

        let geofences = source.geofences().await.unwrap();
        assert_eq!(geofences.len(), 1);
        assert_eq!(geofences[0].name, "Port X");
        assert!(logs_contain("Skipping entry 1"));

        let vessels = source.vessels().await.unwrap();
        let names: Vec<&str> = vessels.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["MV TEST", "MV QUIET"]);
        assert_eq!(vessels[1].position(), None);
    }

    #[tokio::test]
    async fn bare_geofence_reference_names_the_circle() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("alerts.yaml"),
            "- vessels: [MV TEST]\n  geofence: Old Dock\n  recipients: [ops@example.com]\n",
        )
        .unwrap();
        let alerts = FileSource::new(dir.path()).alerts().await.unwrap();
        assert_eq!(
            alerts[0].geofence,
            GeofenceKey::new("Old Dock", GeofenceKind::Circle)
        );
    }

    #[tokio::test]
    async fn document_that_is_not_a_list_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("alerts.yaml"), "geofence: Port X\n").unwrap();
        let source = FileSource::new(dir.path());
        assert!(matches!(source.alerts().await, Err(SourceError::Parse { .. })));
    }

    #[tokio::test]
    async fn malformed_document_reports_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("vessels.yaml"), "- name: [unterminated\n").unwrap();
        let source = FileSource::new(dir.path());

        match source.vessels().await {
            Err(SourceError::Parse { path, .. }) => assert!(path.ends_with("vessels.yaml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
