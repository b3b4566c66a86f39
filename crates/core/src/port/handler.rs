// Handler Port (integrator-supplied business logic for one RPC method)

use crate::domain::{Call, Callback};
use crate::error::BoxError;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a handler invocation
///
/// Resolving to `Err` is a raised failure. The RPC result itself always
/// travels through the [`Callback`].
pub type HandlerFuture = BoxFuture<'static, Result<(), BoxError>>;

/// Method name -> handler, as supplied at registration
pub type MethodMap = BTreeMap<String, Arc<dyn Handler>>;

/// Business logic for one RPC method
pub trait Handler: Send + Sync + 'static {
    fn call(&self, call: Call, callback: Callback) -> HandlerFuture;
}

/// Handler backed by an async closure
pub struct FnHandler<F>(F);

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Call, Callback) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn call(&self, call: Call, callback: Callback) -> HandlerFuture {
        Box::pin((self.0)(call, callback))
    }
}

/// Wrap an async closure as a handler
pub fn from_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Call, Callback) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// Wrap a synchronous closure as a handler
///
/// Its outcome is known once the closure returns, so the returned future is
/// already resolved.
pub fn sync<F>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Call, Callback) -> Result<(), BoxError> + Send + Sync + 'static,
{
    from_fn(move |call, callback| futures::future::ready(f(call, callback)))
}
