use crate::llm::{GenerateRequest, Provider, ProviderFuture};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Provider that replays canned replies and records every request.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<anyhow::Result<String>>>,
    pub(crate) requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<anyhow::Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn arc(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
        Arc::new(Self::new(replies))
    }

    pub(crate) fn replying(reply: &str) -> Arc<Self> {
        Self::arc(vec![Ok(reply.to_string())])
    }

    pub(crate) fn recorded(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate<'a>(&'a self, request: &'a GenerateRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))
        })
    }
}
