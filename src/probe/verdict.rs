use serde::Serialize;
use serde_json::Value;

use super::error::ProbeError;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointStatus {
    ValidCloudflareEndpoint,
    InvalidOrUnreachable,
}

/// Metadata reported by `speed.cloudflare.com/meta`
///
/// Every field is already defaulted to `"Unknown"` when the upstream value is
/// missing or falsy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMeta {
    pub isp: String,
    pub country_code: String,
    pub asn: String,
    pub colo: String,
    pub http_protocol: String,
    pub latitude: String,
    pub longitude: String,
}

impl EdgeMeta {
    /// Parse the upstream body. Only invalid JSON is an error; a document that
    /// is not an object yields all-`"Unknown"` metadata.
    pub fn parse(body: &str) -> Result<Self, ProbeError> {
        let data: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&data))
    }

    pub fn from_value(data: &Value) -> Self {
        let field = |key: &str| text_or_unknown(data.get(key));
        Self {
            isp: field("asOrganization"),
            country_code: field("country"),
            asn: field("asn"),
            colo: field("colo"),
            http_protocol: field("httpProtocol"),
            latitude: field("latitude"),
            longitude: field("longitude"),
        }
    }
}

fn text_or_unknown(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => UNKNOWN.to_string(),
        Some(Value::String(s)) if s.is_empty() => UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => UNKNOWN.to_string(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSuccess {
    pub ip: String,
    pub status: EndpointStatus,
    pub isp: String,
    pub country_code: String,
    pub asn: String,
    pub colo: String,
    pub http_protocol: String,
    /// Round trip including body transfer, formatted as `"<n> ms"`
    pub delay: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub ip: String,
    pub status: EndpointStatus,
    pub error: String,
}

/// Outcome of one probe. Both variants are reported with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProbeVerdict {
    Valid(ProbeSuccess),
    Unreachable(ProbeFailure),
}

impl ProbeVerdict {
    pub fn valid(ip: &str, meta: EdgeMeta, elapsed_ms: f64) -> Self {
        ProbeVerdict::Valid(ProbeSuccess {
            ip: ip.to_string(),
            status: EndpointStatus::ValidCloudflareEndpoint,
            isp: meta.isp,
            country_code: meta.country_code,
            asn: meta.asn,
            colo: meta.colo,
            http_protocol: meta.http_protocol,
            delay: format_delay(elapsed_ms),
            latitude: meta.latitude,
            longitude: meta.longitude,
        })
    }

    pub fn unreachable(ip: &str, error: &ProbeError) -> Self {
        ProbeVerdict::Unreachable(ProbeFailure {
            ip: ip.to_string(),
            status: EndpointStatus::InvalidOrUnreachable,
            error: error.to_string(),
        })
    }

    pub fn status(&self) -> EndpointStatus {
        match self {
            ProbeVerdict::Valid(s) => s.status,
            ProbeVerdict::Unreachable(f) => f.status,
        }
    }
}

fn format_delay(elapsed_ms: f64) -> String {
    format!("{} ms", elapsed_ms.max(0.0).round() as u64)
}
