use futures::future::BoxFuture;

pub mod timestream;

/// A one-off check that the sink's destination is reachable and correctly configured.
pub type Healthcheck = BoxFuture<'static, crate::Result<()>>;
