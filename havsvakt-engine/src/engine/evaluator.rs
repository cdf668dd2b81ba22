//! ## havsvakt-engine::evaluator
//! **One evaluation cycle**
//!
//! A cycle fetches every document first, then walks the watched
//! `(vessel, geofence)` pairs, commits each membership flag and only then
//! sends every notification of the cycle concurrently. A source failure
//! abandons the cycle before any state is touched; a delivery failure never
//! rolls a flag back.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use havsvakt_config::EvaluatorConfig;
use havsvakt_core::{Alert, Direction, MembershipKey, TransitionEvent, Vessel, VesselStateStore};
use futures::future::join_all;
use havsvakt_geometry::{Geofence, GeofenceKey, GeofenceKind, LatLng};
use havsvakt_notify::{DispatchReport, MessageTemplate, Notification, NotificationDispatcher};
use havsvakt_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::error::EvaluationError;
use super::source::{FleetSnapshot, FleetSource};

#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    /// Positions older than this count as not reporting.
    pub max_position_age: Option<Duration>,
    /// Keep flags of selected vessels that are missing from the snapshot.
    pub retain_absent_vessels: bool,
    /// Snapshot file written after every cycle that changed state.
    pub state_path: Option<PathBuf>,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_position_age: None,
            retain_absent_vessels: true,
            state_path: None,
        }
    }
}

impl From<&EvaluatorConfig> for EvaluatorOptions {
    fn from(config: &EvaluatorConfig) -> Self {
        Self {
            max_position_age: config.max_position_age(),
            retain_absent_vessels: config.retain_absent_vessels,
            state_path: config.state_path.clone(),
        }
    }
}

/// What one completed cycle did.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Active alerts whose geofence resolved and could be tested.
    pub alerts_evaluated: usize,
    /// Alerts or pairs skipped because of missing or unusable geofences.
    pub issues: Vec<EvaluationError>,
    /// Selected vessels without a usable, fresh position.
    pub not_reporting: Vec<EvaluationError>,
    pub pairs_evaluated: usize,
    pub transitions: Vec<TransitionEvent>,
    pub deliveries: DispatchReport,
    /// State entries dropped by reconciliation.
    pub reconciled: usize,
}

impl CycleReport {
    pub fn enters(&self) -> usize {
        self.count(Direction::Enter)
    }

    pub fn exits(&self) -> usize {
        self.count(Direction::Exit)
    }

    fn count(&self, direction: Direction) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.direction == direction)
            .count()
    }
}

/// Every alert interested in one membership key.
struct Watch<'a> {
    vessel: &'a Vessel,
    position: LatLng,
    geofence: &'a Geofence,
    alerts: Vec<&'a Alert>,
}

pub struct AlertEvaluator {
    source: Arc<dyn FleetSource>,
    state: Arc<VesselStateStore>,
    dispatcher: NotificationDispatcher,
    template: MessageTemplate,
    options: EvaluatorOptions,
    metrics: Option<Arc<MetricsRecorder>>,
    cycle_guard: Mutex<()>,
}

impl AlertEvaluator {
    pub fn new(
        source: Arc<dyn FleetSource>,
        state: Arc<VesselStateStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            source,
            state,
            dispatcher,
            template: MessageTemplate::default(),
            options: EvaluatorOptions::default(),
            metrics: None,
            cycle_guard: Mutex::new(()),
        }
    }

    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> &Arc<VesselStateStore> {
        &self.state
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    pub async fn run_cycle(&self) -> Result<CycleReport, EvaluationError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Runs one cycle with `now` as the evaluation time. Staleness checks
    /// and event timestamps use it.
    #[instrument(skip(self), fields(at = %now))]
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleReport, EvaluationError> {
        let _guard = self
            .cycle_guard
            .try_lock()
            .map_err(|_| EvaluationError::CycleInProgress)?;
        let started = Instant::now();

        let snapshot = match FleetSnapshot::fetch(self.source.as_ref()).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Abandoning cycle: {e}");
                if let Some(metrics) = &self.metrics {
                    metrics.failed_cycles.inc();
                }
                return Err(e.into());
            }
        };
        debug!(
            "Fetched {} vessels, {} alerts, {} geofences",
            snapshot.vessels.len(),
            snapshot.alerts.len(),
            snapshot.geofences.len()
        );

        let mut report = CycleReport::default();
        let entries_before = self.state.len();

        let geofences = index_geofences(&snapshot.geofences);
        let vessels = index_vessels(&snapshot.vessels);

        let mut watched: HashSet<GeofenceKey> = HashSet::new();
        let mut selected: HashSet<MembershipKey> = HashSet::new();
        let mut watches: BTreeMap<MembershipKey, Watch<'_>> = BTreeMap::new();

        for alert in &snapshot.alerts {
            if !alert.is_active() {
                debug!("Skipping inactive {}", alert.label());
                continue;
            }

            let Some(geofence) = geofences.get(&alert.geofence).copied() else {
                let issue = EvaluationError::GeofenceNotFound {
                    alert: alert.label(),
                    geofence: alert.geofence.clone(),
                };
                warn!("{issue}");
                report.issues.push(issue);
                continue;
            };

            // An existing geofence keeps its flags even while it cannot be
            // evaluated.
            watched.insert(alert.geofence.clone());
            let targets: Vec<&Vessel> = vessels
                .values()
                .copied()
                .filter(|v| alert.selects(v))
                .collect();
            for vessel in &targets {
                selected.insert(MembershipKey::new(vessel.key(), alert.geofence.clone()));
            }

            if let Err(e) = geofence.validate() {
                let issue = EvaluationError::from_geometry(geofence.key(), e);
                warn!("Skipping {}: {issue}", alert.label());
                report.issues.push(issue);
                continue;
            }
            if geofence.kind() == GeofenceKind::Polyline {
                let issue = EvaluationError::UnsupportedGeofenceKind {
                    geofence: geofence.key(),
                };
                warn!("Skipping {}: {issue}", alert.label());
                report.issues.push(issue);
                continue;
            }

            report.alerts_evaluated += 1;

            for vessel in targets.iter().copied() {
                let position = match vessel.position() {
                    Some(position) if vessel.is_reporting(now, self.options.max_position_age) => {
                        position
                    }
                    _ => {
                        debug!("{} has no fresh position", vessel.name);
                        report.not_reporting.push(EvaluationError::VesselNotReporting {
                            alert: alert.label(),
                            vessel: vessel.name.clone(),
                        });
                        continue;
                    }
                };

                watches
                    .entry(MembershipKey::new(vessel.key(), alert.geofence.clone()))
                    .or_insert_with(|| Watch {
                        vessel,
                        position,
                        geofence,
                        alerts: Vec::new(),
                    })
                    .alerts
                    .push(alert);
            }

            if targets.is_empty() {
                for selector in &alert.vessels {
                    debug!("{selector} selected by {} is not in the fleet", alert.label());
                    report.not_reporting.push(EvaluationError::VesselNotReporting {
                        alert: alert.label(),
                        vessel: selector.to_string(),
                    });
                }
            }
        }

        let mut pending: Vec<(TransitionEvent, Vec<&Alert>)> = Vec::new();
        for (key, watch) in watches {
            let position = watch.position;
            let inside = match watch.geofence.contains(position) {
                Ok(inside) => inside,
                Err(e) => {
                    let issue = EvaluationError::from_geometry(key.geofence.clone(), e);
                    warn!("Skipping {key}: {issue}");
                    report.issues.push(issue);
                    continue;
                }
            };
            report.pairs_evaluated += 1;

            let previous = self.state.set(key.clone(), inside);
            let direction = match (previous, inside) {
                (false, true) => Direction::Enter,
                (true, false) => Direction::Exit,
                _ => continue,
            };

            let event = TransitionEvent {
                vessel: key.vessel,
                imo: watch.vessel.imo,
                geofence: key.geofence,
                direction,
                position,
                timestamp: now,
            };
            info!("{event}");
            EventLogger::log_event(
                direction.as_str(),
                vec![
                    KeyValue::new("vessel", event.vessel.to_string()),
                    KeyValue::new("geofence", event.geofence.to_string()),
                    KeyValue::new("lat", position.lat),
                    KeyValue::new("lng", position.lng),
                    KeyValue::new("alerts", watch.alerts.len() as i64),
                ],
            )
            .await;
            if let Some(metrics) = &self.metrics {
                metrics.record_transition(direction.as_str());
            }

            report.transitions.push(event.clone());
            pending.push((event, watch.alerts));
        }

        let notifications: Vec<(Notification, &[String])> = pending
            .iter()
            .flat_map(|(event, alerts)| {
                alerts.iter().map(move |alert| {
                    let notification = self.template.render(event, &alert.label(), &alert.message);
                    (notification, alert.recipients.as_slice())
                })
            })
            .collect();
        let outcomes = join_all(
            notifications
                .iter()
                .map(|(notification, recipients)| self.dispatcher.dispatch(notification, recipients)),
        )
        .await;
        for outcome in outcomes {
            report.deliveries.merge(outcome);
        }

        let present: HashSet<&str> = vessels.keys().copied().collect();
        let retain_absent = self.options.retain_absent_vessels;
        report.reconciled = self.state.reconcile(|key| {
            if !watched.contains(&key.geofence) {
                return false;
            }
            if present.contains(key.vessel.as_str()) {
                selected.contains(key)
            } else {
                retain_absent
            }
        });
        if report.reconciled > 0 {
            debug!("Reconciliation dropped {} stale entries", report.reconciled);
        }

        let changed = !report.transitions.is_empty()
            || report.reconciled > 0
            || self.state.len() != entries_before;
        if changed {
            self.persist();
        }

        if let Some(metrics) = &self.metrics {
            metrics.cycles.inc();
            metrics.cycle_duration.observe(started.elapsed().as_secs_f64());
        }
        info!(
            "Cycle done: {} alerts, {} pairs, {} transitions, {} deliveries failed",
            report.alerts_evaluated,
            report.pairs_evaluated,
            report.transitions.len(),
            report.deliveries.failed.len()
        );
        Ok(report)
    }

    /// Writes the membership snapshot if a path is configured. Errors are
    /// logged only.
    pub fn persist(&self) {
        let Some(path) = &self.options.state_path else {
            return;
        };
        if let Err(e) = self.state.save(path) {
            error!("Failed to save state snapshot to {}: {e}", path.display());
        }
    }
}

/// First definition of each `(name, kind)` wins.
fn index_geofences(geofences: &[Geofence]) -> HashMap<GeofenceKey, &Geofence> {
    let mut index = HashMap::with_capacity(geofences.len());
    for geofence in geofences {
        let key = geofence.key();
        if index.contains_key(&key) {
            warn!("Duplicate geofence {key}, keeping the first definition");
            continue;
        }
        index.insert(key, geofence);
    }
    index
}

fn index_vessels(vessels: &[Vessel]) -> HashMap<&str, &Vessel> {
    let mut index = HashMap::with_capacity(vessels.len());
    for vessel in vessels {
        if index.contains_key(vessel.name.as_str()) {
            warn!("Duplicate report for {}, keeping the first", vessel.name);
            continue;
        }
        index.insert(vessel.name.as_str(), vessel);
    }
    index
}
