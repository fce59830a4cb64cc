use std::cell::RefCell;
use std::time::Duration;

use serde::Serialize;
use worker::wasm_bindgen::JsValue;
use worker::*;

use super::error::ProbeError;
use super::transport::{MetaReply, MetaTransport};
use crate::config::{ProbeConfig, TARGET_HOST};

/// Workers `fetch` with `cf.resolve` pointing at the probed IP.
///
/// The URL and `cf.tls.sni` keep `speed.cloudflare.com`, so certificate
/// validation still targets the real hostname. One transport serves one probe.
pub struct EdgeTransport {
    controller: RefCell<Option<AbortController>>,
    signal: AbortSignal,
}

impl EdgeTransport {
    pub fn new() -> Self {
        let controller = AbortController::default();
        let signal = controller.signal();
        Self {
            controller: RefCell::new(Some(controller)),
            signal,
        }
    }
}

impl Default for EdgeTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// `cf` fetch options: connect to `resolve`, present `tls.sni.name` in the handshake
#[derive(Debug, Serialize)]
struct ResolveOptions<'a> {
    resolve: &'a str,
    tls: TlsOptions<'a>,
}

#[derive(Debug, Serialize)]
struct TlsOptions<'a> {
    sni: SniOptions<'a>,
}

#[derive(Debug, Serialize)]
struct SniOptions<'a> {
    name: &'a str,
}

impl<'a> ResolveOptions<'a> {
    fn new(target_ip: &'a str) -> Self {
        Self {
            resolve: target_ip,
            tls: TlsOptions {
                sni: SniOptions { name: TARGET_HOST },
            },
        }
    }
}

/// Build the `/meta` request pinned to `target_ip`
///
/// `CfProperties` only knows `resolveOverride`, which is ignored outside the
/// deployer's zone, so the `cf` object is attached to the raw init directly.
fn build_request(target_ip: &str, config: &ProbeConfig) -> Result<Request> {
    let headers = Headers::new();
    headers.set("Host", TARGET_HOST)?;
    headers.set("User-Agent", &config.user_agent)?;

    let mut init = RequestInit::new();
    init.method = Method::Get;
    init.headers = headers;

    let raw_init = web_sys::RequestInit::from(&init);
    let cf = js_sys::JSON::parse(&serde_json::to_string(&ResolveOptions::new(target_ip))?)?;
    js_sys::Reflect::set(raw_init.as_ref(), &JsValue::from("cf"), &cf)?;

    let request = web_sys::Request::new_with_str_and_init(&config.target_url(), &raw_init)?;
    Ok(Request::from(request))
}

impl MetaTransport for EdgeTransport {
    type Reply = EdgeReply;
    type Timer = Delay;

    fn now_millis(&self) -> f64 {
        Date::now().as_millis() as f64
    }

    fn timer(&self, after: Duration) -> Delay {
        Delay::from(after)
    }

    async fn send(&self, target_ip: &str, config: &ProbeConfig) -> std::result::Result<EdgeReply, ProbeError> {
        let request =
            build_request(target_ip, config).map_err(|e| ProbeError::Fetch(e.to_string()))?;

        let response = Fetch::Request(request)
            .send_with_signal(&self.signal)
            .await
            .map_err(|e| ProbeError::Fetch(e.to_string()))?;

        Ok(EdgeReply(response))
    }

    fn abort(&self) {
        if let Some(controller) = self.controller.borrow_mut().take() {
            controller.abort();
        }
    }
}

pub struct EdgeReply(Response);

impl MetaReply for EdgeReply {
    fn status(&self) -> u16 {
        self.0.status_code()
    }

    async fn text(mut self) -> std::result::Result<String, ProbeError> {
        self.0
            .text()
            .await
            .map_err(|e| ProbeError::Body(e.to_string()))
    }
}
