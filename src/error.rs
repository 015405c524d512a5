//! Error types for MenoGuide.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },
}

/// Settings-store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Account-service errors.
///
/// Message prefixes are part of the contract — the signup review screen shows
/// them to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Failed to create account: {0}")]
    CreateFailed(String),

    #[error("Failed to upload image: {0}")]
    ImageUploadFailed(String),

    #[error("Failed to save profile: {0}")]
    ProfileSaveFailed(String),

    #[error("Failed to sign in: {0}")]
    SignInFailed(String),

    #[error("Account not found: {0}")]
    NotFound(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Advice-flow errors.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Flow output was not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
