use error_stack::{Result, ResultExt};

use crate::{
    adapters::{config::blockchain_config::AuraConfig, http},
    domain::blockchain::token::TokenAmount,
    ports::balance_reader::{BalanceQueryError, BalanceReader},
};

const BANK_PATH: &str = "cosmos/bank/v1beta1";

pub mod bank_responses {
    #[derive(serde::Deserialize, Debug)]
    pub struct Coin {
        pub denom: String,
        pub amount: String,
    }

    #[derive(serde::Deserialize, Debug)]
    pub struct BalancesResponse {
        #[serde(default)]
        pub balances: Vec<Coin>,
    }
}

use bank_responses::BalancesResponse;

/// Amount of `denom` in a Cosmos SDK bank balances answer, `None` when the
/// account holds none of it.
pub fn denom_balance(
    resp: &BalancesResponse,
    denom: &str,
    decimals: u32,
) -> Result<Option<f64>, BalanceQueryError> {
    let Some(coin) = resp.balances.iter().find(|coin| coin.denom == denom) else {
        return Ok(None);
    };

    let amount = TokenAmount::parse(&coin.amount, decimals)
        .change_context(BalanceQueryError::DataFormatError)
        .attach_printable_lazy(|| format!("Amount: {} {}", coin.amount, coin.denom))?;
    Ok(Some(amount.to_f64()))
}

/// Native balances from a Cosmos SDK LCD (REST) endpoint.
pub struct CosmosLcdReader {
    client: reqwest::Client,
    config: AuraConfig,
}

impl CosmosLcdReader {
    pub fn new(client: reqwest::Client, config: AuraConfig) -> Self {
        Self { client, config }
    }

    fn balances_url(&self, address: &str) -> String {
        let lcd_url = self.config.lcd_url.trim_end_matches('/');
        format!("{lcd_url}/{BANK_PATH}/balances/{address}")
    }
}

#[async_trait::async_trait]
impl BalanceReader for CosmosLcdReader {
    #[tracing::instrument(skip(self, _token_address, _chain))]
    async fn fetch_balance(
        &self,
        wallet_address: &str,
        _token_address: &str,
        _chain: &str,
    ) -> Result<Option<f64>, BalanceQueryError> {
        let url = self.balances_url(wallet_address.trim());

        let resp: BalancesResponse = http::send_and_deserialize(self.client.get(&url))
            .await
            .change_context(BalanceQueryError::RequestError)
            .attach_printable_lazy(|| format!("URL: {url}"))?;

        denom_balance(&resp, &self.config.denom, self.config.decimals)
    }
}
