//! Client side of the remote functions: the raw gateway and a typed API.

pub mod api;
pub mod gateway;
#[cfg(test)]
pub(crate) mod test_support;

pub use api::{FunctionClient, GOAL_PARSE, ONBOARDING_CHAT, REALITY_CHECK, SMART_GRADE};
pub use gateway::{FunctionGateway, GatewayFuture, HttpFunctionGateway};
