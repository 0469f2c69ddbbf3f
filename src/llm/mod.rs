//! Upstream model access: one [`Provider`] per vendor plus the helpers every
//! function needs to turn a raw completion into typed JSON.

pub mod http_client;
pub mod json;
pub mod scrub;
pub mod traits;
pub mod types;

pub mod anthropic;
pub mod factory;
pub mod gemini;

pub use http_client::build_provider_client;
pub use json::{parse_model_json, strip_code_fences};
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{Provider, ProviderFuture};
pub use types::{ChatTurn, GenerateRequest};

pub use anthropic::AnthropicProvider;
pub use factory::{create_provider, resolve_api_key};
pub use gemini::GeminiProvider;
