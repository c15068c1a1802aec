use ethers::types::U256;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceQueryError {
    #[error("Could not connect to the chain endpoint")]
    ConnectionError,
    #[error("Request to the chain endpoint failed")]
    RequestError,
    #[error("Chain endpoint returned data in an unexpected format")]
    DataFormatError,
    #[error("External chain query process failed")]
    ProcessError,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Fetches the human scaled balance of one holding on one chain family.
///
/// `Ok(None)` means the chain answered and the wallet holds nothing of the
/// token (no token account, no entry for the denomination). Every other
/// failure is an `Err`.
#[async_trait::async_trait]
pub trait BalanceReader: Send + Sync {
    async fn fetch_balance(
        &self,
        wallet_address: &str,
        token_address: &str,
        chain: &str,
    ) -> error_stack::Result<Option<f64>, BalanceQueryError>;
}

/// Read-only ERC-20 binding on one connected EVM chain.
#[async_trait::async_trait]
pub trait Erc20Contract: Send + Sync {
    async fn balance_of(
        &self,
        token_address: &str,
        owner: &str,
    ) -> error_stack::Result<U256, BalanceQueryError>;

    async fn decimals(&self, token_address: &str) -> error_stack::Result<u8, BalanceQueryError>;
}

/// Opens an [`Erc20Contract`] for an EVM chain, failing fast when the chain
/// endpoint is not configured or unreachable.
#[async_trait::async_trait]
pub trait EvmConnector: Send + Sync {
    async fn connect(
        &self,
        chain: &str,
    ) -> error_stack::Result<Box<dyn Erc20Contract>, BalanceQueryError>;
}
