use std::future::Future;
use std::time::Duration;

use super::error::ProbeError;
use crate::config::ProbeConfig;

/// One outbound `/meta` exchange pinned to a target IP.
///
/// Implementations must keep TLS SNI and `Host` on the fixed target host while
/// connecting to `target_ip`.
#[allow(async_fn_in_trait)]
pub trait MetaTransport {
    type Reply: MetaReply;
    type Timer: Future<Output = ()>;

    /// Wall-clock milliseconds, only compared against itself
    fn now_millis(&self) -> f64;

    /// Deadline future; dropping it must cancel the underlying timer
    fn timer(&self, after: Duration) -> Self::Timer;

    async fn send(&self, target_ip: &str, config: &ProbeConfig) -> Result<Self::Reply, ProbeError>;

    /// Cancel an in-flight `send`. Called at most once, after the deadline fires.
    fn abort(&self);
}

#[allow(async_fn_in_trait)]
pub trait MetaReply {
    fn status(&self) -> u16;

    async fn text(self) -> Result<String, ProbeError>;
}
