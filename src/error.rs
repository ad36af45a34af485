//! Error types for the orchestrator

use thiserror::Error;

/// Result type alias using the orchestrator's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider API error
    #[error("Provider API error: {0}")]
    Provider(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// The LLM returned an empty or whitespace-only response
    #[error("empty_llm_response")]
    EmptyLlmResponse,

    /// The agent exhausted its JSON-recovery retry budget
    #[error("max_retries_exceeded")]
    MaxRetriesExceeded,

    /// A dangerous tool invocation was rejected pending confirmation
    #[error("user_denied")]
    UserDenied,

    /// The agent invoked the `task_error` control tool
    #[error("agent_declared_error: {0}")]
    AgentDeclaredError(String),

    /// A plan step failed during execution
    #[error("task_{step}_failed: {reason}")]
    TaskFailed {
        /// The step id that failed
        step: u32,
        /// Why the step failed
        reason: String,
    },

    /// A step's declared dependency was never completed
    #[error("dependency_not_met: step {step} depends on {depends_on}")]
    DependencyNotMet {
        /// The step waiting on a dependency
        step: u32,
        /// The unmet dependency's step id
        depends_on: u32,
    },

    /// The agent exhausted its iteration budget without a control tool call
    #[error("max_iterations_reached")]
    MaxIterationsReached,
}

impl Error {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::RateLimit(_) | Error::Timeout(_))
    }

    /// Check if error is a client error (caller's fault, not worth retrying)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::NotFound(_) | Error::Unauthorized(_)
        )
    }
}
