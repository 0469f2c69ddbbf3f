use crate::composer::GuardRejection;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Prova.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; glue code (CLI, config loading) keeps
/// using `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ProvaError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Edge function gateway ───────────────────────────────────────────
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),

    // ── Upstream LLM provider ───────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Profile store ───────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Onboarding conversation ─────────────────────────────────────────
    #[error("onboarding: {0}")]
    Onboarding(#[from] OnboardingError),

    // ── Goal composer guards ────────────────────────────────────────────
    #[error("{0}")]
    Guard(#[from] GuardRejection),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Gateway errors ─────────────────────────────────────────────────────────

/// Failure of a remote function call.
///
/// `Transport` and `Service` are the transport/service class; `Malformed`
/// is the semantic/parse class (body not JSON after cleanup, or JSON that
/// does not match the expected shape).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{function}: network error: {message}")]
    Transport { function: String, message: String },

    #[error("{function}: service returned {status}: {message}")]
    Service {
        function: String,
        status: u16,
        message: String,
    },

    #[error("{function}: malformed response: {message}")]
    Malformed { function: String, message: String },
}

impl GatewayError {
    pub fn function(&self) -> &str {
        match self {
            Self::Transport { function, .. }
            | Self::Service { function, .. }
            | Self::Malformed { function, .. } => function,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} authentication missing")]
    Auth { provider: String },

    #[error("provider {provider} returned no text")]
    EmptyResponse { provider: String },

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store request failed: {0}")]
    Request(String),

    #[error("profile store returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("profile store response could not be decoded: {0}")]
    Decode(String),
}

// ─── Onboarding errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("no extracted profile to confirm")]
    NoProfile,

    #[error("operation not allowed in phase {0}")]
    WrongPhase(String),

    #[error("message is empty")]
    EmptyMessage,

    #[error("still waiting for the coach to reply")]
    TurnInFlight,

    #[error("no signed-in user to save the profile for")]
    NotSignedIn,

    #[error("persisting the profile failed: {0}")]
    Persist(#[from] StoreError),
}

pub type ProvaResult<T> = std::result::Result<T, ProvaError>;
