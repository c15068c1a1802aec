use error_stack::{Result, ResultExt};
use ethers::{types::U256, utils::format_units};

use crate::ports::balance_reader::{BalanceQueryError, BalanceReader, EvmConnector};

/// Reads ERC-20 balances through any [`EvmConnector`].
pub struct Erc20BalanceReader<C> {
    connector: C,
}

impl<C: EvmConnector> Erc20BalanceReader<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }
}

#[async_trait::async_trait]
impl<C: EvmConnector> BalanceReader for Erc20BalanceReader<C> {
    #[tracing::instrument(skip(self))]
    async fn fetch_balance(
        &self,
        wallet_address: &str,
        token_address: &str,
        chain: &str,
    ) -> Result<Option<f64>, BalanceQueryError> {
        let contract = self
            .connector
            .connect(chain)
            .await
            .attach_printable_lazy(|| format!("Chain: {chain}"))?;

        let raw = contract
            .balance_of(token_address, wallet_address)
            .await
            .attach_printable_lazy(|| format!("Token: {token_address}"))?;
        let decimals = contract
            .decimals(token_address)
            .await
            .attach_printable_lazy(|| format!("Token: {token_address}"))?;

        tracing::trace!(raw = %raw, decimals, "ERC-20 balance fetched");

        to_f64(raw, decimals).map(Some)
    }
}

/// `raw / 10^decimals`, computed on the full 256-bit value.
fn to_f64(raw: U256, decimals: u8) -> Result<f64, BalanceQueryError> {
    format_units(raw, u32::from(decimals))
        .change_context(BalanceQueryError::DataFormatError)
        .attach_printable_lazy(|| format!("Cannot scale {raw} by 10^{decimals}"))?
        .parse::<f64>()
        .change_context(BalanceQueryError::DataFormatError)
}
