use worker::*;

#[macro_use]
mod logger;

mod config;
mod handlers;
mod probe;

use config::ProbeConfig;
use logger::LogLevel;

#[event(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[event(fetch)]
async fn fetch(
    req: HttpRequest,
    env: Env,
    _ctx: Context,
) -> Result<HttpResponse> {
    // Convert HttpRequest to worker::Request using try_from
    let worker_req = Request::try_from(req)?;

    // X-Log-Level header wins over the LOG_LEVEL var
    let env_level = env.var("LOG_LEVEL").ok().map(|v| v.to_string());
    let log_level = LogLevel::resolve(
        worker_req.headers().get("X-Log-Level")?.as_deref(),
        env_level.as_deref(),
    );

    // Datacenter running this worker, not the one being probed
    let colo = worker_req.cf().map(|cf| cf.colo()).unwrap_or("unknown".to_string());
    log_info!("Request received at datacenter: {}", colo);

    let config = ProbeConfig::from_env(&env);
    log_debug!(
        log_level,
        "Probe timeout: {} ms, user agent: {}",
        config.timeout.as_millis(),
        config.user_agent
    );

    handlers::handle_check(&worker_req, &config, log_level).await?.try_into()
}
