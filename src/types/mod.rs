pub mod error;
pub mod event;
pub mod evidence;
pub mod repository;
pub mod utils;
pub mod verdict;

pub use error::{CollectorError, ErrorCategory, ErrorClassifier, LlmError, Result, RoastError};
pub use event::{COMPLETE_STATUS, ProgressEvent, WorkflowStage};
pub use evidence::{EvidencePackage, FileSample};
pub use repository::RepositoryReference;
pub use utils::{json_string_list, truncate_chars};
pub use verdict::{Verdict, VerdictRecord};
