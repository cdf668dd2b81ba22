use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use havsvakt_core::{Alert, Vessel};
use havsvakt_geometry::{Geofence, GeofenceKey};
use parking_lot::RwLock;

use super::error::SourceError;
use super::source::FleetSource;

/// Fleet documents held in process memory. Used by tests and embedders
/// that push documents in themselves.
#[derive(Debug)]
pub struct InMemorySource {
    vessels: RwLock<Vec<Vessel>>,
    alerts: RwLock<Vec<Alert>>,
    geofences: RwLock<Vec<Geofence>>,
    available: AtomicBool,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self {
            vessels: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
            geofences: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vessels(&self, vessels: Vec<Vessel>) {
        *self.vessels.write() = vessels;
    }

    /// Replaces the vessel with the same name, or appends it.
    pub fn upsert_vessel(&self, vessel: Vessel) {
        let mut vessels = self.vessels.write();
        match vessels.iter_mut().find(|v| v.name == vessel.name) {
            Some(existing) => *existing = vessel,
            None => vessels.push(vessel),
        }
    }

    pub fn remove_vessel(&self, name: &str) -> bool {
        let mut vessels = self.vessels.write();
        let before = vessels.len();
        vessels.retain(|v| v.name != name);
        vessels.len() != before
    }

    /// Replaces the alert with the same id, or appends it. Alerts without an
    /// id are always appended.
    pub fn save_alert(&self, alert: Alert) {
        let mut alerts = self.alerts.write();
        let slot = alert
            .id
            .as_ref()
            .and_then(|id| alerts.iter().position(|a| a.id.as_ref() == Some(id)));
        match slot {
            Some(index) => alerts[index] = alert,
            None => alerts.push(alert),
        }
    }

    pub fn delete_alert(&self, id: &str) -> bool {
        let mut alerts = self.alerts.write();
        let before = alerts.len();
        alerts.retain(|a| a.id.as_deref() != Some(id));
        alerts.len() != before
    }

    /// Replaces the geofence with the same name and kind, or appends it.
    pub fn save_geofence(&self, geofence: Geofence) {
        let mut geofences = self.geofences.write();
        let key = geofence.key();
        match geofences.iter_mut().find(|g| g.key() == key) {
            Some(existing) => *existing = geofence,
            None => geofences.push(geofence),
        }
    }

    pub fn delete_geofence(&self, key: &GeofenceKey) -> bool {
        let mut geofences = self.geofences.write();
        let before = geofences.len();
        geofences.retain(|g| g.key() != *key);
        geofences.len() != before
    }

    /// While unavailable every read fails with `SourceError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), SourceError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SourceError::Unavailable("in-memory source switched off".into()))
        }
    }
}

#[async_trait]
impl FleetSource for InMemorySource {
    async fn vessels(&self) -> Result<Vec<Vessel>, SourceError> {
        self.ensure_available()?;
        Ok(self.vessels.read().clone())
    }

    async fn alerts(&self) -> Result<Vec<Alert>, SourceError> {
        self.ensure_available()?;
        Ok(self.alerts.read().clone())
    }

    async fn geofences(&self) -> Result<Vec<Geofence>, SourceError> {
        self.ensure_available()?;
        Ok(self.geofences.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use havsvakt_core::VesselSelector;
    use havsvakt_geometry::{GeofenceKind, LatLng};

    fn alert(id: &str, message: &str) -> Alert {
        Alert::new(
            vec![VesselSelector::Name("MV TEST".into())],
            GeofenceKey::new("Port X", GeofenceKind::Circle),
            vec!["ops@example.com".into()],
            message,
        )
        .with_id(id)
    }

    #[tokio::test]
    async fn save_alert_replaces_by_id() {
        let source = InMemorySource::new();
        source.save_alert(alert("a1", "first"));
        source.save_alert(alert("a1", "second"));
        source.save_alert(alert("a2", "other"));

        let alerts = source.alerts().await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].message, "second");

        assert!(source.delete_alert("a1"));
        assert!(!source.delete_alert("a1"));
        assert_eq!(source.alerts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn geofences_are_keyed_by_name_and_kind() {
        let source = InMemorySource::new();
        source.save_geofence(Geofence::circle("Port X", LatLng::new(10.0, 10.0), 100.0));
        source.save_geofence(Geofence::circle("Port X", LatLng::new(10.0, 10.0), 250.0));
        source.save_geofence(Geofence::polygon(
            "Port X",
            vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 1.0),
                LatLng::new(1.0, 1.0),
            ],
        ));
        assert_eq!(source.geofences().await.unwrap().len(), 2);

        assert!(source.delete_geofence(&GeofenceKey::new("Port X", GeofenceKind::Circle)));
        let left = source.geofences().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].kind(), GeofenceKind::Polygon);
    }

    #[tokio::test]
    async fn upsert_vessel_moves_existing_report() {
        let source = InMemorySource::new();
        source.upsert_vessel(Vessel::new("MV TEST", LatLng::new(0.0, 0.0)));
        source.upsert_vessel(Vessel::new("MV TEST", LatLng::new(1.0, 2.0)));

        let vessels = source.vessels().await.unwrap();
        assert_eq!(vessels.len(), 1);
        assert_eq!(vessels[0].position(), Some(LatLng::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn set_vessels_replaces_fleet() {
        let source = InMemorySource::new();
        source.upsert_vessel(Vessel::new("OLD", LatLng::new(0.0, 0.0)));
        source.set_vessels(vec![
            Vessel::new("A", LatLng::new(1.0, 1.0)),
            Vessel::new("B", LatLng::new(2.0, 2.0)),
        ]);

        let names: Vec<String> = source
            .vessels()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(!source.remove_vessel("OLD"));
    }

    #[tokio::test]
    async fn unavailable_source_fails_every_read() {
        let source = InMemorySource::new();
        source.set_available(false);
        assert!(matches!(source.vessels().await, Err(SourceError::Unavailable(_))));
        assert!(source.geofences().await.is_err());

        source.set_available(true);
        assert!(source.alerts().await.is_ok());
    }
}
