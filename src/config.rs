use std::time::Duration;

pub const TARGET_HOST: &str = "speed.cloudflare.com";
pub const TARGET_PATH: &str = "/meta";

const DEFAULT_TIMEOUT_MS: u64 = 3000;
// setTimeout takes a signed 32-bit delay
const MAX_TIMEOUT_MS: u64 = i32::MAX as u64;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for a single endpoint probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Deadline after which the outbound fetch is aborted
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProbeConfig {
    /// Build from Worker vars: `PROBE_TIMEOUT_MS` and `PROBE_USER_AGENT`.
    ///
    /// Missing, unparsable, or out-of-range values fall back to the defaults.
    pub fn from_env(env: &worker::Env) -> Self {
        Self::from_lookup(|key| env.var(key).ok().map(|v| v.to_string()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = lookup("PROBE_TIMEOUT_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| (1..=MAX_TIMEOUT_MS).contains(ms))
        {
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(agent) = lookup("PROBE_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }

        config
    }

    pub fn target_url(&self) -> String {
        format!("https://{}{}", TARGET_HOST, TARGET_PATH)
    }
}
