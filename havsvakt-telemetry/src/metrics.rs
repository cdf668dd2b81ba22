//! ## havsvakt-telemetry::metrics
//! **Prometheus counters for evaluation cycles and deliveries**

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub cycles: IntCounter,
    pub failed_cycles: IntCounter,
    pub transitions: IntCounterVec,
    pub failed_deliveries: IntCounter,
    pub cycle_duration: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles = IntCounter::new("havsvakt_cycles_total", "Completed evaluation cycles")?;
        let failed_cycles = IntCounter::new(
            "havsvakt_cycles_failed_total",
            "Evaluation cycles abandoned before completion",
        )?;
        let transitions = IntCounterVec::new(
            Opts::new("havsvakt_transitions_total", "Geofence transitions detected"),
            &["direction"],
        )?;
        let failed_deliveries = IntCounter::new(
            "havsvakt_delivery_failures_total",
            "Notification sends that failed or timed out",
        )?;
        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new(
                "havsvakt_cycle_duration_seconds",
                "Wall time of one evaluation cycle",
            )
            .buckets(vec![0.01, 0.05, 0.25, 1.0, 5.0, 30.0]),
        )?;

        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(failed_cycles.clone()))?;
        registry.register(Box::new(transitions.clone()))?;
        registry.register(Box::new(failed_deliveries.clone()))?;
        registry.register(Box::new(cycle_duration.clone()))?;

        Ok(Self {
            registry,
            cycles,
            failed_cycles,
            transitions,
            failed_deliveries,
            cycle_duration,
        })
    }

    pub fn record_transition(&self, direction: &str) {
        self.transitions.with_label_values(&[direction]).inc();
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
