pub mod schema;

pub use schema::{
    BackendConfig, ComposerConfig, Config, FunctionRoute, FunctionsConfig, GatewayConfig,
    ObservabilityConfig, OnboardingConfig,
};
