//! Review Workflow
//!
//! The orchestrator sequences one review as a stream of progress events:
//!
//! ```text
//! [1/4] Initializing -> pause
//! [2/4] Scouting     -> Collector::collect   (error: Error event, stop)
//! [3/4] Synthesizing -> SynthesisClient::synthesize
//! [4/4] Finalizing   -> Complete { verdict }
//! ```
//!
//! Each `work` call spawns a producer task feeding a capacity-1 channel, so
//! the producer never runs more than one event ahead of the consumer. When
//! the consumer drops the stream, in-flight collection or synthesis is
//! abandoned and no further events are produced.

mod stream;

pub use stream::EventStream;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::constants::workflow as defaults;
use crate::hosting::GitHubClient;
use crate::scout::Collector;
use crate::synthesis::SynthesisClient;
use crate::types::{ProgressEvent, Result, WorkflowStage};

/// Review orchestrator; cheap to share across requests
#[derive(Clone)]
pub struct Orchestrator {
    collector: Collector,
    synthesis: Arc<SynthesisClient>,
    init_pause: Duration,
}

impl Orchestrator {
    pub fn new(collector: Collector, synthesis: SynthesisClient) -> Self {
        Self {
            collector,
            synthesis: Arc::new(synthesis),
            init_pause: Duration::from_millis(defaults::DEFAULT_INIT_PAUSE_MS),
        }
    }

    /// Wire the GitHub client and configured model provider
    pub fn from_config(config: &Config) -> Result<Self> {
        let hosting = GitHubClient::new(&config.hosting)?;
        let synthesis = SynthesisClient::from_config(config)?;

        Ok(Self::new(Collector::new(Arc::new(hosting)), synthesis)
            .with_init_pause(Duration::from_millis(config.workflow.init_pause_ms)))
    }

    pub fn with_init_pause(mut self, pause: Duration) -> Self {
        self.init_pause = pause;
        self
    }

    /// Start a review of `repo_url`
    ///
    /// Must be called within a Tokio runtime. The returned stream always ends
    /// with exactly one terminal event (Error or Complete) unless it is
    /// dropped first.
    pub fn work(&self, repo_url: impl Into<String>) -> EventStream {
        let repo_url = repo_url.into();
        let request_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(1);

        let span = info_span!("review", %request_id, repo = %repo_url);
        let run = Run {
            tx,
            collector: self.collector.clone(),
            synthesis: Arc::clone(&self.synthesis),
            init_pause: self.init_pause,
        };
        tokio::spawn(run.execute(repo_url).instrument(span));

        EventStream::new(rx, request_id)
    }
}

/// Producer side of one review
struct Run {
    tx: mpsc::Sender<ProgressEvent>,
    collector: Collector,
    synthesis: Arc<SynthesisClient>,
    init_pause: Duration,
}

impl Run {
    async fn execute(self, repo_url: String) {
        info!("Review started");

        if !self.emit(ProgressEvent::stage(WorkflowStage::Initializing)).await {
            return;
        }
        if !self.init_pause.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.init_pause) => {}
                _ = self.tx.closed() => return self.abandoned(WorkflowStage::Initializing),
            }
        }

        if !self.emit(ProgressEvent::stage(WorkflowStage::Scouting)).await {
            return;
        }
        let collected = tokio::select! {
            result = self.collector.collect(&repo_url) => result,
            _ = self.tx.closed() => return self.abandoned(WorkflowStage::Scouting),
        };
        let evidence = match collected {
            Ok(evidence) => evidence,
            Err(err) => {
                warn!("Collection failed ({}): {}", err.kind(), err);
                self.emit(ProgressEvent::Error(err.to_string())).await;
                return;
            }
        };

        if !self.emit(ProgressEvent::stage(WorkflowStage::Synthesizing)).await {
            return;
        }
        let Ok(verdict) = tokio::select! {
            result = self.synthesis.synthesize(&evidence) => result,
            _ = self.tx.closed() => return self.abandoned(WorkflowStage::Synthesizing),
        };

        if !self.emit(ProgressEvent::stage(WorkflowStage::Finalizing)).await {
            return;
        }
        if self.emit(ProgressEvent::complete(verdict)).await {
            info!("Review complete");
        }
    }

    /// Send one event; false when the consumer is gone
    async fn emit(&self, event: ProgressEvent) -> bool {
        match self.tx.send(event).await {
            Ok(()) => true,
            Err(_) => {
                debug!("Consumer disconnected, stopping review");
                false
            }
        }
    }

    fn abandoned(&self, stage: WorkflowStage) {
        debug!("Consumer disconnected during {:?}, abandoning review", stage);
    }
}
