mod backend;
mod client;
mod core;
mod functions;
mod gateway;
mod observability;

pub use backend::BackendConfig;
pub use client::{ComposerConfig, OnboardingConfig};
pub use core::Config;
pub use functions::{FunctionRoute, FunctionsConfig};
pub use gateway::GatewayConfig;
pub use observability::ObservabilityConfig;
