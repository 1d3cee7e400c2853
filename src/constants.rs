//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Evidence collection budgets
pub mod evidence {
    /// Maximum number of tree entries kept in the structure sample
    pub const MAX_STRUCTURE_ENTRIES: usize = 40;

    /// Maximum number of files fetched in full
    pub const MAX_SAMPLED_FILES: usize = 3;

    /// Maximum characters kept per sampled file
    pub const MAX_FILE_CHARS: usize = 2500;

    /// Root-level files that always qualify for sampling
    pub const PRIORITY_FILES: &[&str] = &[
        "README.md",
        "app.py",
        "main.py",
        "index.js",
        "package.json",
        "requirements.txt",
        "Dockerfile",
    ];

    /// Source extensions that qualify a flat (root-level) file for sampling
    pub const SOURCE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".rs", ".go", ".java", ".c"];
}

/// Hosting API constants
pub mod hosting {
    /// Default REST API base
    pub const DEFAULT_API_BASE: &str = "https://api.github.com";

    /// Default raw-content base
    pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

    /// Timeout for metadata and tree requests (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

    /// Timeout for a single raw-file fetch (seconds)
    pub const DEFAULT_FILE_TIMEOUT_SECS: u64 = 5;

    /// Media type requested from the REST API
    pub const ACCEPT_HEADER: &str = "application/vnd.github+json";

    /// User agent sent with every request (GitHub rejects anonymous agents)
    pub const USER_AGENT: &str = concat!("reporoast/", env!("CARGO_PKG_VERSION"));
}

/// LLM constants
pub mod llm {
    /// Default model request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Default retries for transient model failures
    pub const DEFAULT_MAX_RETRIES: usize = 2;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 10;

    /// Default output budget
    pub const DEFAULT_MAX_TOKENS: usize = 8192;

    /// Gemini REST endpoint
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// OpenAI-compatible endpoint
    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
}

/// Workflow constants
pub mod workflow {
    /// Pacing pause after the initializing event (milliseconds)
    pub const DEFAULT_INIT_PAUSE_MS: u64 = 500;

    /// Number of visible workflow steps
    pub const TOTAL_STEPS: u8 = 4;
}
