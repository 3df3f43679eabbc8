//! The simulated posting run: tag → fetch → pick → post → record → notify.
//!
//! Every stage appends to the shared activity log as it happens, so a
//! dashboard watching the state channel sees the run progress live. A run
//! either reaches the final success line or stops at the first failing stage;
//! lines already written are never rolled back.

use crate::activity::{LogKind, SystemStatus};
use crate::config::PipelineConfig;
use crate::engine::probe::ConfigSnapshot;
use crate::engine::tags::TagSelector;
use crate::error::PipelineError;
use crate::execution::simulated::{SimulatedNotifier, SimulatedPublisher, SimulatedTracker};
use crate::execution::{Notifier, Publisher, UsageTracker};
use crate::feed::mock::MockContentSource;
use crate::feed::types::Article;
use crate::feed::ContentSource;
use crate::tui::state::AppState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::time::Duration;
use tokio::sync::watch;

/// Stages of a run, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    SelectArticle,
    Post,
    Record,
    Notify,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch articles",
            Stage::SelectArticle => "select article",
            Stage::Post => "post to LinkedIn",
            Stage::Record => "update Airtable",
            Stage::Notify => "send Telegram notification",
            Stage::Validate => "validate API keys",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// What a successful mock run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub tag: String,
    pub article: Article,
    pub post_id: String,
}

pub struct PipelineRunner {
    tags: TagSelector,
    source: Box<dyn ContentSource>,
    publisher: Box<dyn Publisher>,
    tracker: Box<dyn UsageTracker>,
    notifier: Box<dyn Notifier>,
    rng: StdRng,
    validate_delay: Duration,
    state: RunState,
}

impl PipelineRunner {
    /// Runner wired to the mock source and dry-run stages.
    pub fn simulated(config: &PipelineConfig, tags: TagSelector) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            tags,
            source: Box::new(MockContentSource::new(config.fetch_delay())),
            publisher: Box::new(SimulatedPublisher::new(config.post_delay())),
            tracker: Box::new(SimulatedTracker::new(config.record_delay())),
            notifier: Box::new(SimulatedNotifier::new(config.notify_delay())),
            rng,
            validate_delay: config.validate_delay(),
            state: RunState::Idle,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_source(mut self, source: Box<dyn ContentSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn with_tracker(mut self, tracker: Box<dyn UsageTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the mock posting pipeline once, logging every stage to `state_tx`.
    ///
    /// On success the status becomes `Active`, on failure `Error` with a
    /// single error line naming the failing stage.
    pub async fn run(
        &mut self,
        state_tx: &watch::Sender<AppState>,
    ) -> Result<RunReport, PipelineError> {
        self.state = RunState::Running;
        emit(state_tx, LogKind::Info, "Starting LinkedIn automation test...");

        let result = self.execute(state_tx).await;
        match &result {
            Ok(report) => {
                self.state = RunState::Succeeded;
                tracing::info!(
                    tag = %report.tag,
                    article = %report.article.id,
                    post_id = %report.post_id,
                    "mock run succeeded"
                );
                finish(
                    state_tx,
                    SystemStatus::Active,
                    LogKind::Success,
                    "LinkedIn automation test completed successfully!".to_string(),
                );
            }
            Err(e) => {
                self.state = RunState::Failed;
                tracing::warn!(error = %e, "mock run failed");
                finish(
                    state_tx,
                    SystemStatus::Error,
                    LogKind::Error,
                    format!("Error during test: {}", e),
                );
            }
        }
        result
    }

    async fn execute(
        &mut self,
        state_tx: &watch::Sender<AppState>,
    ) -> Result<RunReport, PipelineError> {
        let tag = self.tags.pick(&mut self.rng).to_string();
        emit(state_tx, LogKind::Info, format!("Selected random tag: {}", tag));

        emit(state_tx, LogKind::Info, "Fetching articles from Medium API...");
        let articles = self
            .source
            .fetch(&tag)
            .await
            .map_err(|e| PipelineError::stage(Stage::Fetch, e))?;
        emit(
            state_tx,
            LogKind::Success,
            format!("Found {} articles", articles.len()),
        );

        let article = articles
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| PipelineError::StageFailure {
                stage: Stage::SelectArticle,
                message: format!("{} returned no articles for tag {}", self.source.name(), tag),
            })?;
        emit(
            state_tx,
            LogKind::Info,
            format!("Selected article: {}", article.title),
        );

        emit(state_tx, LogKind::Info, "Posting to LinkedIn...");
        let post_id = self
            .publisher
            .publish(&article)
            .await
            .map_err(|e| PipelineError::stage(Stage::Post, e))?;
        emit(
            state_tx,
            LogKind::Success,
            format!("Successfully posted to LinkedIn! Post ID: {}", post_id),
        );

        emit(state_tx, LogKind::Info, "Updating Airtable with used article...");
        self.tracker
            .record(&article, &post_id)
            .await
            .map_err(|e| PipelineError::stage(Stage::Record, e))?;
        emit(state_tx, LogKind::Success, "Airtable updated successfully");

        emit(state_tx, LogKind::Info, "Sending Telegram notification...");
        let note = format!("New LinkedIn post: {} ({})", article.title, post_id);
        self.notifier
            .notify(&note)
            .await
            .map_err(|e| PipelineError::stage(Stage::Notify, e))?;
        emit(state_tx, LogKind::Success, "Telegram notification sent successfully");

        Ok(RunReport { tag, article, post_id })
    }

    /// Simulated credential check used when real keys are configured.
    /// Returns the services whose keys are present.
    pub async fn validate_credentials(
        &mut self,
        state_tx: &watch::Sender<AppState>,
        snapshot: &ConfigSnapshot,
    ) -> Result<Vec<&'static str>, PipelineError> {
        self.state = RunState::Running;
        emit(state_tx, LogKind::Info, "Testing with real APIs...");

        let result = self.check_keys(state_tx, snapshot).await;
        match &result {
            Ok(services) => {
                self.state = RunState::Succeeded;
                tracing::info!(services = ?services, "credential check succeeded");
                state_tx.send_modify(|s| s.status = SystemStatus::Active);
            }
            Err(e) => {
                self.state = RunState::Failed;
                tracing::warn!(error = %e, "credential check failed");
                finish(
                    state_tx,
                    SystemStatus::Error,
                    LogKind::Error,
                    format!("API test failed: {}", e),
                );
            }
        }
        result
    }

    async fn check_keys(
        &mut self,
        state_tx: &watch::Sender<AppState>,
        snapshot: &ConfigSnapshot,
    ) -> Result<Vec<&'static str>, PipelineError> {
        emit(state_tx, LogKind::Info, "Validating API keys...");
        tokio::time::sleep(self.validate_delay).await;

        let services = snapshot.available_services();
        if services.is_empty() {
            return Err(PipelineError::StageFailure {
                stage: Stage::Validate,
                message: "no API keys available".to_string(),
            });
        }
        emit(
            state_tx,
            LogKind::Success,
            format!("Available APIs: {}", services.join(", ")),
        );
        for line in [
            "Note: This is a demo. In a real implementation, you would make actual API calls to:",
            "- Medium API for fetching articles",
            "- LinkedIn API for posting content",
            "- Airtable API for tracking used articles",
            "- Telegram API for notifications",
        ] {
            emit(state_tx, LogKind::Info, line);
        }
        Ok(services)
    }
}

fn emit(state_tx: &watch::Sender<AppState>, kind: LogKind, message: impl Into<String>) {
    let message = message.into();
    tracing::debug!(kind = kind.label(), %message, "activity");
    state_tx.send_modify(|s| s.logs.append(message, kind));
}

/// Write the closing line and the status in one state update.
fn finish(
    state_tx: &watch::Sender<AppState>,
    status: SystemStatus,
    kind: LogKind,
    message: String,
) {
    state_tx.send_modify(|s| {
        s.logs.append(message, kind);
        s.status = status;
    });
}
