//! Review Command
//!
//! Stream the review of one repository to the terminal.
//!
//! Usage:
//!   reporoast review <URL> [--format text|json|sse] [--provider P] [--model M]

use std::fmt;
use std::process::ExitCode;
use std::str::FromStr;

use futures::{Stream, StreamExt};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{ProgressEvent, Result, RoastError, Verdict};
use crate::workflow::Orchestrator;

/// How events are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Styled progress lines and a verdict card
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Raw `data: <json>` frames
    Sse,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "sse" => Ok(Self::Sse),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: text, json, sse",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Sse => "sse",
        };
        f.write_str(name)
    }
}

/// Options for a single review run
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub url: String,
    pub format: OutputFormat,
    /// LLM provider override
    pub provider: Option<String>,
    /// Model override
    pub model: Option<String>,
}

/// How the event stream ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Completed(Verdict),
    Failed(String),
    /// Stream ended or was cancelled before a terminal event
    Interrupted,
}

impl ReviewOutcome {
    fn from_terminal(event: &ProgressEvent) -> Option<Self> {
        match event {
            ProgressEvent::Status(_) => None,
            ProgressEvent::Error(message) => Some(Self::Failed(message.clone())),
            ProgressEvent::Complete { verdict, .. } => Some(Self::Completed(verdict.verdict)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn run(options: ReviewOptions) -> Result<ExitCode> {
    let mut config = ConfigLoader::load()?;
    ConfigLoader::apply_overrides(&mut config, options.provider, options.model, |key| {
        std::env::var(key).ok()
    })?;
    for warning in config.startup_warnings() {
        warn!("{}", warning);
    }

    let orchestrator = Orchestrator::from_config(&config)?;
    let format = options.format;
    let url = options.url;

    let runtime = Runtime::new()?;
    let outcome = runtime.block_on(async move {
        let events = orchestrator.work(url);
        info!(request_id = %events.request_id(), "Streaming review as {}", format);

        tokio::select! {
            outcome = render_stream(events, format) => Ok::<_, RoastError>(outcome),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                warn!("Interrupted, cancelling review");
                Ok(ReviewOutcome::Interrupted)
            }
        }
    })?;

    Ok(outcome.exit_code())
}

/// Write every event as it arrives and report how the stream ended
pub async fn render_stream<S>(mut events: S, format: OutputFormat) -> ReviewOutcome
where
    S: Stream<Item = ProgressEvent> + Unpin,
{
    let output = Output::new();
    let mut outcome = ReviewOutcome::Interrupted;

    while let Some(event) = events.next().await {
        match format_event(format, &event) {
            Some(frame) => print!("{}", frame),
            None => render_text(&output, &event),
        }
        if let Some(terminal) = ReviewOutcome::from_terminal(&event) {
            outcome = terminal;
        }
    }

    outcome
}

/// Machine-readable rendering; `None` for the text format
fn format_event(format: OutputFormat, event: &ProgressEvent) -> Option<String> {
    match format {
        OutputFormat::Text => None,
        OutputFormat::Json => Some(format!("{}\n", event.to_json())),
        OutputFormat::Sse => Some(event.to_sse_frame()),
    }
}

fn render_text(output: &Output, event: &ProgressEvent) {
    match event {
        ProgressEvent::Status(status) => output.status(status),
        ProgressEvent::Error(message) => output.error(message),
        ProgressEvent::Complete { status, verdict } => {
            output.success(status);
            output.verdict(verdict);
        }
    }
}
