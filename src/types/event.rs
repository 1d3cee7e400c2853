//! Progress Events
//!
//! Tagged union streamed to the caller while a review runs, plus the thin
//! wire adapter (`{"status": ..}` / `{"error": ..}` JSON in SSE frames).

use serde::Serialize;

use super::verdict::VerdictRecord;
use crate::constants::workflow::TOTAL_STEPS;

/// Visible workflow steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkflowStage {
    Initializing,
    Scouting,
    Synthesizing,
    Finalizing,
}

impl WorkflowStage {
    pub fn step(&self) -> u8 {
        match self {
            Self::Initializing => 1,
            Self::Scouting => 2,
            Self::Synthesizing => 3,
            Self::Finalizing => 4,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Initializing => "Orchestrator: Initializing workflow...",
            Self::Scouting => "Scout: Fetching repository from GitHub...",
            Self::Synthesizing => "Roaster: Analyzing architecture & judging code...",
            Self::Finalizing => "Orchestrator: Formatting verdict...",
        }
    }

    /// Status line, e.g. `[2/4] Scout: ...`
    pub fn status_text(&self) -> String {
        format!("[{}/{}] {}", self.step(), TOTAL_STEPS, self.description())
    }
}

/// Final status label attached to the success event
pub const COMPLETE_STATUS: &str = "Analysis Complete!";

/// One unit of the streamed feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Status(String),
    Error(String),
    Complete {
        status: String,
        verdict: VerdictRecord,
    },
}

impl ProgressEvent {
    pub fn stage(stage: WorkflowStage) -> Self {
        Self::Status(stage.status_text())
    }

    pub fn complete(verdict: VerdictRecord) -> Self {
        Self::Complete {
            status: COMPLETE_STATUS.to_string(),
            verdict,
        }
    }

    /// Error and Complete end the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Status(_))
    }

    fn wire(&self) -> WireFrame<'_> {
        match self {
            Self::Status(status) => WireFrame::Status { status },
            Self::Error(error) => WireFrame::Error { error },
            Self::Complete { status, verdict } => WireFrame::Complete {
                status,
                final_data: verdict,
            },
        }
    }

    /// JSON body of the frame
    pub fn to_json(&self) -> String {
        // Only strings and string lists are serialized, which cannot fail.
        serde_json::to_string(&self.wire()).unwrap_or_else(|_| "{}".to_string())
    }

    /// `data: <json>\n\n`
    pub fn to_sse_frame(&self) -> String {
        format!("data: {}\n\n", self.to_json())
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireFrame<'a> {
    Complete {
        status: &'a str,
        final_data: &'a VerdictRecord,
    },
    Status {
        status: &'a str,
    },
    Error {
        error: &'a str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::verdict::Verdict;
    use serde_json::Value;

    #[test]
    fn test_stage_status_text() {
        assert!(WorkflowStage::Initializing.status_text().starts_with("[1/4]"));
        assert!(WorkflowStage::Scouting.status_text().starts_with("[2/4]"));
        assert!(WorkflowStage::Synthesizing.status_text().starts_with("[3/4]"));
        assert!(WorkflowStage::Finalizing.status_text().starts_with("[4/4]"));
    }

    #[test]
    fn test_status_frame() {
        let event = ProgressEvent::Status("hello".into());
        assert_eq!(event.to_sse_frame(), "data: {\"status\":\"hello\"}\n\n");
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_error_frame() {
        let event = ProgressEvent::Error("Repo not found or Private.".into());
        let value: Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(value["error"], "Repo not found or Private.");
        assert!(value.get("status").is_none());
        assert!(event.is_terminal());
    }

    #[test]
    fn test_complete_frame() {
        let event = ProgressEvent::complete(VerdictRecord {
            verdict: Verdict::ShipIt,
            roast: vec!["clean".into()],
            good_things: vec!["tests".into()],
            suggestions: vec![],
        });
        let value: Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(value["status"], COMPLETE_STATUS);
        assert_eq!(value["final_data"]["verdict"], "Ship It");
        assert_eq!(value["final_data"]["good_things"][0], "tests");
        assert!(value.get("error").is_none());
        assert!(event.is_terminal());
    }
}
