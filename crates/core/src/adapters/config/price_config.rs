#[derive(serde::Deserialize, Debug, Clone)]
pub struct CoingeckoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: Box<str>,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Box<str>,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: Box<str>,
    /// How far back the provider keeps daily history.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

fn default_base_url() -> Box<str> {
    "https://api.coingecko.com/api/v3".into()
}
fn default_api_key_env() -> Box<str> {
    "COINGECKO_API_KEY".into()
}
fn default_vs_currency() -> Box<str> {
    "usd".into()
}
fn default_retention_days() -> i64 {
    365
}

impl Default for CoingeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            vs_currency: default_vs_currency(),
            retention_days: default_retention_days(),
        }
    }
}

impl CoingeckoConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env.as_ref())
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Tunables shared by every outbound call.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct ParamsConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Seconds between two consecutive price API calls.
    #[serde(default = "default_sleep_time")]
    pub sleep_time: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}
fn default_sleep_time() -> f64 {
    1.5
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            sleep_time: default_sleep_time(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
