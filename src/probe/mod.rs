pub mod bounded;
pub mod edge;
pub mod error;
pub mod transport;
pub mod verdict;

pub use edge::EdgeTransport;
pub use error::ProbeError;
pub use transport::{MetaReply, MetaTransport};
pub use verdict::{EdgeMeta, EndpointStatus, ProbeVerdict};

use bounded::{run_bounded, Elapsed};

use crate::config::ProbeConfig;
use crate::logger::LogLevel;

/// Check whether `target_ip` serves Cloudflare's `/meta` endpoint.
///
/// Never fails: every error becomes an `INVALID_OR_UNREACHABLE` verdict.
/// Exactly one attempt is made.
pub async fn check_endpoint<T: MetaTransport>(
    transport: &T,
    target_ip: &str,
    config: &ProbeConfig,
    log_level: LogLevel,
) -> ProbeVerdict {
    let started = transport.now_millis();

    match fetch_meta(transport, target_ip, config, log_level).await {
        Ok(meta) => {
            let elapsed = transport.now_millis() - started;
            log_debug!(log_level, "{} answered in {:.0} ms", target_ip, elapsed);
            ProbeVerdict::valid(target_ip, meta, elapsed)
        }
        Err(e) => {
            log_debug!(log_level, "{} failed: {}", target_ip, e);
            ProbeVerdict::unreachable(target_ip, &e)
        }
    }
}

async fn fetch_meta<T: MetaTransport>(
    transport: &T,
    target_ip: &str,
    config: &ProbeConfig,
    log_level: LogLevel,
) -> Result<EdgeMeta, ProbeError> {
    log_debug!(
        log_level,
        "GET {} resolved to {} (deadline {} ms)",
        config.target_url(),
        target_ip,
        config.timeout.as_millis()
    );

    // The deadline only covers the exchange up to response headers.
    let deadline = transport.timer(config.timeout);
    let reply = match run_bounded(transport.send(target_ip, config), deadline).await {
        Ok(reply) => reply?,
        Err(Elapsed) => {
            transport.abort();
            return Err(ProbeError::Timeout(config.timeout.as_millis() as u64));
        }
    };

    let status = reply.status();
    log_debug!(log_level, "{} responded with status {}", target_ip, status);
    if !(200..300).contains(&status) {
        return Err(ProbeError::Status(status));
    }

    let body = reply.text().await?;
    EdgeMeta::parse(&body)
}
