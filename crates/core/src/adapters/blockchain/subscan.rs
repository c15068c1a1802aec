use error_stack::{report, Result, ResultExt};

use crate::{
    adapters::{config::blockchain_config::SubscanConfig, http},
    domain::blockchain::{chain::normalize_chain, token::TokenAmount},
    ports::balance_reader::{BalanceQueryError, BalanceReader},
};

const TOKENS_PATH: &str = "api/scan/account/tokens";

mod subscan_responses {
    #[derive(serde::Deserialize, Debug)]
    pub struct NativeToken {
        pub balance: String,
        pub decimals: u32,
        #[serde(default)]
        pub symbol: Option<String>,
    }

    #[derive(serde::Deserialize, Debug, Default)]
    pub struct TokensData {
        #[serde(default)]
        pub native: Option<Vec<NativeToken>>,
    }

    #[derive(serde::Deserialize, Debug)]
    pub struct TokensResponse {
        pub code: i64,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub data: Option<TokensData>,
    }
}

use subscan_responses::TokensResponse;

/// Native balances of substrate chains through the Subscan indexer.
pub struct SubscanReader {
    client: reqwest::Client,
    config: SubscanConfig,
}

impl SubscanReader {
    pub fn new(client: reqwest::Client, config: SubscanConfig) -> Self {
        Self { client, config }
    }

    fn tokens_url(&self, chain: &str) -> String {
        let base_url = self.config.base_url(&normalize_chain(chain));
        format!("{}/{TOKENS_PATH}", base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl BalanceReader for SubscanReader {
    #[tracing::instrument(skip(self, _token_address))]
    async fn fetch_balance(
        &self,
        wallet_address: &str,
        _token_address: &str,
        chain: &str,
    ) -> Result<Option<f64>, BalanceQueryError> {
        let url = self.tokens_url(chain);
        let body = serde_json::json!({
            "address": wallet_address.trim(),
            "row": self.config.page_size,
            "page": 0,
        });

        let resp: TokensResponse = http::send_and_deserialize(
            self.client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .json(&body),
        )
        .await
        .change_context(BalanceQueryError::RequestError)
        .attach_printable_lazy(|| format!("URL: {url}"))?;

        native_balance(resp)
    }
}

/// First native entry, `balance / 10^decimals`.
fn native_balance(resp: TokensResponse) -> Result<Option<f64>, BalanceQueryError> {
    if resp.code != 0 {
        return Err(report!(BalanceQueryError::RequestError)
            .attach_printable(format!("Subscan error {}: {}", resp.code, resp.message)));
    }

    let Some(native) = resp
        .data
        .and_then(|data| data.native)
        .and_then(|tokens| tokens.into_iter().next())
    else {
        return Ok(None);
    };

    let amount = TokenAmount::parse(&native.balance, native.decimals)
        .change_context(BalanceQueryError::DataFormatError)
        .attach_printable_lazy(|| {
            format!(
                "Balance: {} {}",
                native.balance,
                native.symbol.as_deref().unwrap_or_default()
            )
        })?;
    Ok(Some(amount.to_f64()))
}
