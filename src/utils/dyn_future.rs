use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by drivers
pub type DynFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
