//! Owns the session state and exposes the user-facing actions.
//!
//! State lives in a `watch` channel: the controller and the runner write
//! through the sender, the dashboard renders from receivers. Only one run
//! (mock or credential check) may be in flight; the busy flag is tested and
//! set in a single `send_modify`, so two callers racing for it cannot both win.

use crate::activity::LogKind;
use crate::config::{Config, ScheduleConfig};
use crate::engine::pipeline::{PipelineRunner, RunReport};
use crate::engine::probe::{primary_key_names, ConfigSnapshot, EnvProbe};
use crate::engine::tags::TagSelector;
use crate::error::PipelineError;
use crate::tui::state::AppState;
use anyhow::Result;
use tokio::sync::{watch, Mutex};

pub struct Controller {
    state_tx: watch::Sender<AppState>,
    runner: Mutex<PipelineRunner>,
    probe: EnvProbe,
}

/// Clears the busy flag when a run ends, however it ends.
struct BusyGuard<'a> {
    state_tx: &'a watch::Sender<AppState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state_tx.send_modify(|s| s.busy = false);
    }
}

impl Controller {
    pub fn new(config: &Config, probe: EnvProbe) -> Result<Self> {
        let tags = TagSelector::new(config.catalog.tags())?;
        let runner = PipelineRunner::simulated(&config.pipeline, tags);
        Ok(Self::with_runner(runner, probe, config.schedule.clone()))
    }

    pub fn with_runner(runner: PipelineRunner, probe: EnvProbe, schedule: ScheduleConfig) -> Self {
        let (state_tx, _) = watch::channel(AppState::new(schedule));
        Self {
            state_tx,
            runner: Mutex::new(runner),
            probe,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state_tx.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state_tx.borrow().clone()
    }

    /// Clear the log and status. A run in flight keeps the busy flag.
    pub fn reset(&self) {
        self.state_tx.send_modify(|s| s.reset());
    }

    /// Probe the environment once and record whether credentials are loaded.
    pub fn startup_check(&self) -> ConfigSnapshot {
        let mut snapshot = None;
        self.state_tx.send_modify(|s| {
            let result = self.probe.startup_report(&mut s.logs);
            s.env_loaded = result.any_primary();
            snapshot = Some(result);
        });
        snapshot.unwrap_or_else(|| self.probe.snapshot())
    }

    pub fn clear_logs(&self) {
        self.state_tx.send_modify(|s| s.logs.clear());
    }

    pub fn show_config_status(&self) -> ConfigSnapshot {
        let mut snapshot = None;
        self.state_tx.send_modify(|s| snapshot = Some(self.probe.report(&mut s.logs)));
        snapshot.unwrap_or_else(|| self.probe.snapshot())
    }

    pub async fn run_mock_pipeline(&self) -> Result<RunReport, PipelineError> {
        let _busy = self.begin_run()?;
        let mut runner = self.runner.lock().await;
        runner.run(&self.state_tx).await
    }

    /// Gate on the primary credentials, then run the simulated key check.
    /// With no primary key present this logs one error line and leaves the
    /// status untouched.
    pub async fn run_with_real_credentials(&self) -> Result<Vec<&'static str>, PipelineError> {
        let _busy = self.begin_run()?;

        let snapshot = self.probe.snapshot();
        if !snapshot.any_primary() {
            let required = primary_key_names();
            tracing::warn!(required = ?required, "real-credential run refused");
            self.state_tx.send_modify(|s| {
                s.logs.append(
                    format!(
                        "Please configure environment variables in your .env file. Required variables: {}",
                        required.join(", ")
                    ),
                    LogKind::Error,
                );
            });
            return Err(PipelineError::ConfigurationMissing { required });
        }

        let mut runner = self.runner.lock().await;
        runner.validate_credentials(&self.state_tx, &snapshot).await
    }

    fn begin_run(&self) -> Result<BusyGuard<'_>, PipelineError> {
        let mut acquired = false;
        self.state_tx.send_if_modified(|s| {
            if s.busy {
                return false;
            }
            s.busy = true;
            acquired = true;
            true
        });
        if !acquired {
            tracing::warn!("run rejected: another run is in flight");
            return Err(PipelineError::RunInProgress);
        }
        Ok(BusyGuard {
            state_tx: &self.state_tx,
        })
    }
}
