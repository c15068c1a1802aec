use std::{collections::HashMap, sync::Arc};

use error_stack::{report, Result, ResultExt};
use ethers::{
    contract::abigen,
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
};

use crate::{
    adapters::config::blockchain_config::{BlockchainConfig, ChainConfig},
    domain::blockchain::chain::normalize_chain,
    ports::balance_reader::{BalanceQueryError, Erc20Contract, EvmConnector},
};

abigen!(
    Erc20,
    r#"[
        function balanceOf(address owner) external view returns (uint256)
        function decimals() external view returns (uint8)
    ]"#
);

/// Connects to EVM chains whose JSON-RPC URL is named in config.
pub struct EvmRpcConnector {
    client: reqwest::Client,
    chains: HashMap<String, ChainConfig>,
}

impl EvmRpcConnector {
    pub fn new(client: reqwest::Client, config: &BlockchainConfig) -> Self {
        let chains = config
            .chains
            .iter()
            .map(|(name, chain)| (normalize_chain(name), chain.clone()))
            .collect();
        Self { client, chains }
    }

    fn provider(&self, chain: &str) -> Result<Provider<Http>, BalanceQueryError> {
        let chain_config = self.chains.get(&normalize_chain(chain)).ok_or_else(|| {
            report!(BalanceQueryError::ConnectionError)
                .attach_printable(format!("No RPC configured for chain {chain}"))
        })?;

        let url = chain_config.resolve_rpc_url().ok_or_else(|| {
            report!(BalanceQueryError::ConnectionError).attach_printable(format!(
                "Environment variable {} is not set",
                chain_config.rpc_url
            ))
        })?;
        let url: reqwest::Url = url
            .parse::<reqwest::Url>()
            .change_context(BalanceQueryError::ConnectionError)
            .attach_printable_lazy(|| format!("Invalid RPC URL in {}", chain_config.rpc_url))?;

        Ok(Provider::new(Http::new_with_client(url, self.client.clone())))
    }
}

#[async_trait::async_trait]
impl EvmConnector for EvmRpcConnector {
    #[tracing::instrument(skip(self))]
    async fn connect(&self, chain: &str) -> Result<Box<dyn Erc20Contract>, BalanceQueryError> {
        let provider = self.provider(chain)?;

        let chain_id = provider
            .get_chainid()
            .await
            .change_context(BalanceQueryError::ConnectionError)
            .attach_printable_lazy(|| format!("Chain: {chain}"))?;
        tracing::debug!(chain_id = %chain_id, "Connected to EVM endpoint");

        Ok(Box::new(EthersErc20Contract {
            provider: Arc::new(provider),
        }))
    }
}

/// `abigen` binding for the two read-only ERC-20 methods.
pub struct EthersErc20Contract {
    provider: Arc<Provider<Http>>,
}

impl EthersErc20Contract {
    fn token(&self, token_address: &str) -> Result<Erc20<Provider<Http>>, BalanceQueryError> {
        Ok(Erc20::new(parse_address(token_address)?, self.provider.clone()))
    }
}

#[async_trait::async_trait]
impl Erc20Contract for EthersErc20Contract {
    async fn balance_of(&self, token_address: &str, owner: &str) -> Result<U256, BalanceQueryError> {
        let owner = parse_address(owner)?;
        self.token(token_address)?
            .balance_of(owner)
            .call()
            .await
            .change_context(BalanceQueryError::RequestError)
            .attach_printable("balanceOf call failed")
    }

    async fn decimals(&self, token_address: &str) -> Result<u8, BalanceQueryError> {
        self.token(token_address)?
            .decimals()
            .call()
            .await
            .change_context(BalanceQueryError::RequestError)
            .attach_printable("decimals call failed")
    }
}

/// Parses a hex address, `0x` prefixed, 20 bytes.
pub fn parse_address(address: &str) -> Result<Address, BalanceQueryError> {
    let address = address.trim();
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(report!(BalanceQueryError::InvalidAddress(address.to_string())));
    }

    address
        .parse::<Address>()
        .change_context_lazy(|| BalanceQueryError::InvalidAddress(address.to_string()))
}
