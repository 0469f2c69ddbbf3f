use super::gateway::{FunctionGateway, GatewayFuture};
use crate::error::GatewayError;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Scripted {
    delay: Duration,
    result: Result<Value, GatewayError>,
}

/// In-memory gateway: per-function queues of canned replies, optional
/// reply latency, and a log of every payload it was handed.
#[derive(Default)]
pub(crate) struct FakeGateway {
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeGateway {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, function: &str, result: Result<Value, GatewayError>) {
        self.reply_after(function, Duration::ZERO, result);
    }

    pub(crate) fn reply_after(
        &self,
        function: &str,
        delay: Duration,
        result: Result<Value, GatewayError>,
    ) {
        self.replies
            .lock()
            .unwrap()
            .entry(function.to_string())
            .or_default()
            .push_back(Scripted { delay, result });
    }

    pub(crate) fn calls(&self, function: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == function)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub(crate) fn call_count(&self, function: &str) -> usize {
        self.calls(function).len()
    }
}

pub(crate) fn service_error(function: &str) -> GatewayError {
    GatewayError::Service {
        function: function.to_string(),
        status: 500,
        message: format!("{function} failed"),
    }
}

impl FunctionGateway for FakeGateway {
    fn invoke<'a>(&'a self, function: &'a str, payload: Value) -> GatewayFuture<'a, Value> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((function.to_string(), payload));
            let scripted = self
                .replies
                .lock()
                .unwrap()
                .get_mut(function)
                .and_then(VecDeque::pop_front);
            let Some(scripted) = scripted else {
                return Err(GatewayError::Transport {
                    function: function.to_string(),
                    message: "no scripted reply".into(),
                });
            };
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.result
        })
    }
}
