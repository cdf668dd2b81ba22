/*!
# Runtime

Wiring shared by frontends: builds an evaluator from configuration and runs
it as a long-lived service, as a single cycle, or answers one-off
containment questions against a geofence document.
*/

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use havsvakt_config::HavsvaktConfig;
use havsvakt_core::VesselStateStore;
use havsvakt_geometry::{haversine_km, Geofence, GeofenceKey, GeofenceShape, LatLng};
use havsvakt_notify::{build_notifier, MessageTemplate, NotificationDispatcher};
use havsvakt_telemetry::MetricsRecorder;
use tracing::{error, info, instrument};

use crate::engine::{
    read_document, AlertEvaluator, CycleReport, EvaluatorOptions, FileSource, Scheduler,
    SchedulerSummary,
};

pub type RuntimeResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Builds an evaluator reading from the configured data directory and
/// hydrated from the state snapshot, if one is configured.
pub fn build_evaluator(
    config: &HavsvaktConfig,
    metrics: Arc<MetricsRecorder>,
) -> RuntimeResult<AlertEvaluator> {
    let state = match &config.evaluator.state_path {
        Some(path) => VesselStateStore::load(path)?,
        None => VesselStateStore::new(),
    };
    let source = Arc::new(FileSource::new(&config.source.data_dir));
    let notifier = build_notifier(&config.notifier)?;
    let dispatcher = NotificationDispatcher::new(notifier, config.notifier.send_timeout())
        .with_metrics(Arc::clone(&metrics));

    info!(
        "Reading fleet documents from {}",
        config.source.data_dir.display()
    );
    Ok(AlertEvaluator::new(source, Arc::new(state), dispatcher)
        .with_template(MessageTemplate::from_config(&config.notifier))
        .with_options(EvaluatorOptions::from(&config.evaluator))
        .with_metrics(metrics))
}

/// Runs the scheduler until Ctrl-C, then saves state.
#[instrument(level = "info", name = "run_service", skip_all)]
pub async fn run_service(
    config: &HavsvaktConfig,
    metrics: Arc<MetricsRecorder>,
) -> RuntimeResult<SchedulerSummary> {
    let evaluator = Arc::new(build_evaluator(config, metrics)?);
    let scheduler = Scheduler::new(Arc::clone(&evaluator), config.evaluator.interval());

    let summary = scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Cannot listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    evaluator.persist();
    info!(
        "Stopped after {} cycles ({} failed)",
        summary.cycles_completed, summary.cycles_failed
    );
    Ok(summary)
}

/// Runs exactly one cycle and returns its report.
#[instrument(level = "info", name = "run_single_cycle", skip_all)]
pub async fn run_single_cycle(
    config: &HavsvaktConfig,
    metrics: Arc<MetricsRecorder>,
) -> RuntimeResult<CycleReport> {
    let evaluator = build_evaluator(config, metrics)?;
    Ok(evaluator.run_cycle().await?)
}

/// Answer to "is this point inside that geofence?".
#[derive(Debug, Clone)]
pub struct PointCheck {
    pub geofence: Geofence,
    pub point: LatLng,
    pub inside: bool,
    /// Distance to the centre, for circles.
    pub distance_meters: Option<f64>,
}

impl fmt::Display for PointCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is {} {}",
            self.point,
            if self.inside { "inside" } else { "outside" },
            self.geofence.key()
        )?;
        if let (Some(distance), GeofenceShape::Circle { radius_meters, .. }) =
            (self.distance_meters, &self.geofence.shape)
        {
            write!(f, " ({distance:.1} m from centre, radius {radius_meters:.1} m)")?;
        }
        Ok(())
    }
}

/// Looks up `key` in a geofence document and tests `point` against it.
pub async fn check_point(
    geofences_path: &Path,
    key: &GeofenceKey,
    point: LatLng,
) -> RuntimeResult<PointCheck> {
    let geofences: Vec<Geofence> = read_document(geofences_path).await?;
    let geofence = geofences
        .into_iter()
        .find(|g| g.key() == *key)
        .ok_or_else(|| format!("No geofence {key} in {}", geofences_path.display()))?;

    let inside = geofence.contains(point)?;
    let distance_meters = match &geofence.shape {
        GeofenceShape::Circle { center, .. } => Some(haversine_km(point, *center) * 1000.0),
        _ => None,
    };

    Ok(PointCheck {
        geofence,
        point,
        inside,
        distance_meters,
    })
}
