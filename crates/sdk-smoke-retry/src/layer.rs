use crate::{Retry, RetryConfig, RetryConfigBuilder};
use std::sync::Arc;
use tower::Layer;

/// Applies a [`RetryConfig`] to a [`tower::Service`].
///
/// For collaborators that are already services. Requests are retried the
/// same way [`run_with_retry`](crate::run_with_retry) retries a body, each
/// attempt calling a clone of the inner service with a clone of the request.
///
/// ```
/// use sdk_smoke_retry::RetryLayer;
/// use std::time::Duration;
/// use tower::{Service, ServiceBuilder, ServiceExt};
///
/// # #[derive(Debug, Clone)]
/// # struct RpcError;
/// # async fn example() {
/// let mut balances = ServiceBuilder::new()
///     .layer(
///         RetryLayer::<RpcError>::builder()
///             .name("balances")
///             .fixed_backoff(Duration::from_millis(500))
///             .build()
///             .layer(),
///     )
///     .service(tower::service_fn(|chain_id: u64| async move {
///         Ok::<_, RpcError>(vec![chain_id])
///     }));
///
/// let rows = balances.ready().await.unwrap().call(11155111).await;
/// # }
/// ```
pub struct RetryLayer<E> {
    config: Arc<RetryConfig<E>>,
}

impl<E> RetryLayer<E> {
    pub fn new(config: RetryConfig<E>) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Same as [`RetryConfig::builder`]; finish with `.build().layer()`.
    pub fn builder() -> RetryConfigBuilder<E> {
        RetryConfigBuilder::new()
    }

    /// The configuration every wrapped service shares.
    pub fn config(&self) -> &RetryConfig<E> {
        &self.config
    }
}

impl<E> Clone for RetryLayer<E> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, E> Layer<S> for RetryLayer<E> {
    type Service = Retry<S, E>;

    fn layer(&self, inner: S) -> Self::Service {
        Retry::new(inner, Arc::clone(&self.config))
    }
}
