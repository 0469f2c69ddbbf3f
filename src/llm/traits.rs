use super::types::GenerateRequest;
use std::future::Future;
use std::pin::Pin;

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

/// Upstream text-generation service used by the edge functions.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini", "anthropic").
    fn name(&self) -> &str;

    /// Run one completion and return the raw model text.
    fn generate<'a>(&'a self, request: &'a GenerateRequest) -> ProviderFuture<'a, String>;

    /// Warm up the HTTP connection pool.
    fn warmup(&self) -> ProviderFuture<'_, ()> {
        Box::pin(async move { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate<'a>(&'a self, request: &'a GenerateRequest) -> ProviderFuture<'a, String> {
            Box::pin(async move {
                Ok(request
                    .turns
                    .last()
                    .map(|turn| turn.text.clone())
                    .unwrap_or_default())
            })
        }
    }

    #[tokio::test]
    async fn default_warmup_is_noop() {
        assert!(EchoProvider.warmup().await.is_ok());
    }

    #[tokio::test]
    async fn provider_is_object_safe() {
        let provider: Box<dyn Provider> = Box::new(EchoProvider);
        let request = GenerateRequest::prompt("m", "hello");
        assert_eq!(provider.generate(&request).await.unwrap(), "hello");
        assert_eq!(provider.name(), "echo");
    }
}
