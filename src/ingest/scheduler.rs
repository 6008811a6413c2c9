// src/ingest/scheduler.rs
use std::sync::Arc;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::ingest::{run_once, PipelineDeps};

#[derive(Clone, Copy, Debug)]
pub struct SchedulerCfg {
    pub interval_secs: u64,
}

/// Spawn the fixed-cadence pipeline loop.
///
/// Ticks run on one task, so a slow run delays the next tick instead of
/// overlapping with it. A failed run is logged and counted; the loop keeps
/// going.
pub fn spawn_pipeline_scheduler(cfg: SchedulerCfg, deps: Arc<PipelineDeps>) -> JoinHandle<()> {
    tokio::spawn(async move {
        // interval() panics on zero; config sanitizes, but guard here too.
        let secs = cfg.interval_secs.max(1);
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match run_once(&deps).await {
                Ok(summary) => {
                    tracing::info!(
                        target: "ingest",
                        matched = summary.matched,
                        created = summary.created,
                        updated = summary.updated,
                        "scheduled ingest tick"
                    );
                }
                Err(e) => {
                    counter!("ingest_run_errors_total").increment(1);
                    tracing::error!(target: "ingest", error = ?e, "pipeline run failed");
                }
            }
        }
    })
}
