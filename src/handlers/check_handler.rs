use anyhow::Context as AnyhowContext;
use ::http::StatusCode;
use serde_json::json;
use worker::*;

use crate::config::ProbeConfig;
use crate::logger::LogLevel;
use crate::probe::{self, EdgeTransport, ProbeVerdict};

pub const MISSING_IP_MESSAGE: &str = "Parameter 'ip' is required.";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A JSON body with its status, before it becomes a Workers `Response`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonReply {
    pub status: StatusCode,
    pub body: String,
}

impl JsonReply {
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }).to_string(),
        }
    }

    pub fn missing_ip() -> Self {
        Self::error(StatusCode::BAD_REQUEST, MISSING_IP_MESSAGE)
    }

    /// Pretty-printed verdict; failure verdicts are still a 200.
    pub fn from_verdict(verdict: &ProbeVerdict) -> anyhow::Result<Self> {
        let body =
            serde_json::to_string_pretty(verdict).context("Failed to serialize probe result")?;
        Ok(Self {
            status: StatusCode::OK,
            body,
        })
    }

    pub fn into_response(self) -> Result<Response> {
        let headers = Headers::new();
        headers.set("Content-Type", JSON_CONTENT_TYPE)?;

        Ok(Response::ok(self.body)?
            .with_status(self.status.as_u16())
            .with_headers(headers))
    }
}

/// Read the `ip` query parameter verbatim; only an empty value counts as missing
pub fn extract_ip(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "ip")
        .map(|(_, value)| value.into_owned())
        .filter(|ip| !ip.is_empty())
}

pub fn fault_message(ip: &str, err: &anyhow::Error) -> String {
    format!("An error occurred while processing the IP {}: {:#}", ip, err)
}

/// Probe the IP named in the query string and answer with JSON
///
/// Any method and any path are accepted.
pub async fn handle_check(req: &Request, config: &ProbeConfig, log_level: LogLevel) -> Result<Response> {
    let url = req.url()?;

    let Some(ip) = extract_ip(&url) else {
        log_info!("Rejected request without 'ip' parameter: {}", url.path());
        return JsonReply::missing_ip().into_response();
    };

    log_info!("Checking endpoint {}", ip);

    let transport = EdgeTransport::new();
    let verdict = probe::check_endpoint(&transport, &ip, config, log_level).await;
    log_info!("Endpoint {} verdict: {:?}", ip, verdict.status());

    let reply = match JsonReply::from_verdict(&verdict) {
        Ok(reply) => reply,
        Err(e) => {
            let message = fault_message(&ip, &e);
            log_error!("{}", message);
            JsonReply::error(StatusCode::INTERNAL_SERVER_ERROR, &message)
        }
    };

    reply.into_response()
}
