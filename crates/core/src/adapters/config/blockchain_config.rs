use std::collections::HashMap;

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct BlockchainConfig {
    #[serde(default)]
    pub evm_chains: Vec<Box<str>>,
    #[serde(default)]
    pub substrate_chains: Vec<Box<str>>,
    /// Per-chain metadata, keyed by chain identifier.
    #[serde(default)]
    pub chains: HashMap<String, ChainConfig>,
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub dora: DoraConfig,
    #[serde(default)]
    pub aura: AuraConfig,
    #[serde(default)]
    pub subscan: SubscanConfig,
}

impl BlockchainConfig {
    pub fn chain(&self, chain: &str) -> Option<&ChainConfig> {
        self.chains
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(chain.trim()))
            .map(|(_, config)| config)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ChainConfig {
    /// Name of the environment variable holding the JSON-RPC URL.
    pub rpc_url: Box<str>,
}

impl ChainConfig {
    pub fn resolve_rpc_url(&self) -> Option<String> {
        read_env(&self.rpc_url)
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SolanaConfig {
    #[serde(default = "default_solana_rpc_url_env")]
    pub rpc_url_env: Box<str>,
    #[serde(default = "default_solana_rpc_url")]
    pub default_rpc_url: Box<str>,
}

fn default_solana_rpc_url_env() -> Box<str> {
    "SOLANA_RPC_URL".into()
}
fn default_solana_rpc_url() -> Box<str> {
    "https://api.mainnet-beta.solana.com".into()
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url_env: default_solana_rpc_url_env(),
            default_rpc_url: default_solana_rpc_url(),
        }
    }
}

impl SolanaConfig {
    pub fn resolve_rpc_url(&self) -> String {
        read_env(&self.rpc_url_env).unwrap_or_else(|| self.default_rpc_url.to_string())
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct DoraConfig {
    #[serde(default = "default_dora_binary")]
    pub binary: Box<str>,
    #[serde(default = "default_dora_node")]
    pub node: Box<str>,
    #[serde(default = "default_dora_denom")]
    pub denom: Box<str>,
    #[serde(default = "default_dora_decimals")]
    pub decimals: u32,
}

fn default_dora_binary() -> Box<str> {
    "dorad".into()
}
fn default_dora_node() -> Box<str> {
    "https://vota-rpc.dorafactory.org:443".into()
}
fn default_dora_denom() -> Box<str> {
    "peaka".into()
}
fn default_dora_decimals() -> u32 {
    18
}

impl Default for DoraConfig {
    fn default() -> Self {
        Self {
            binary: default_dora_binary(),
            node: default_dora_node(),
            denom: default_dora_denom(),
            decimals: default_dora_decimals(),
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AuraConfig {
    #[serde(default = "default_aura_lcd_url")]
    pub lcd_url: Box<str>,
    #[serde(default = "default_aura_denom")]
    pub denom: Box<str>,
    #[serde(default = "default_aura_decimals")]
    pub decimals: u32,
}

fn default_aura_lcd_url() -> Box<str> {
    "https://lcd.aura.network".into()
}
fn default_aura_denom() -> Box<str> {
    "uaura".into()
}
fn default_aura_decimals() -> u32 {
    6
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            lcd_url: default_aura_lcd_url(),
            denom: default_aura_denom(),
            decimals: default_aura_decimals(),
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SubscanConfig {
    /// Base URL, `{chain}` is replaced by the chain identifier.
    #[serde(default = "default_subscan_url_template")]
    pub url_template: Box<str>,
    #[serde(default = "default_subscan_page_size")]
    pub page_size: u32,
}

fn default_subscan_url_template() -> Box<str> {
    "https://{chain}.api.subscan.io".into()
}
fn default_subscan_page_size() -> u32 {
    100
}

impl Default for SubscanConfig {
    fn default() -> Self {
        Self {
            url_template: default_subscan_url_template(),
            page_size: default_subscan_page_size(),
        }
    }
}

impl SubscanConfig {
    pub fn base_url(&self, chain: &str) -> String {
        self.url_template.replace("{chain}", chain)
    }
}
