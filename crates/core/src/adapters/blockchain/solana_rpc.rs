use std::time::Duration;

use error_stack::{report, Result, ResultExt};
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_request::TokenAccountsFilter};
use solana_sdk::pubkey::Pubkey;

use crate::ports::balance_reader::{BalanceQueryError, BalanceReader};

/// SPL token balances through the Solana RPC API.
pub struct SolanaRpcReader {
    rpc: RpcClient,
}

impl SolanaRpcReader {
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        Self::with_client(RpcClient::new_with_timeout(rpc_url, timeout))
    }

    pub fn with_client(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait::async_trait]
impl BalanceReader for SolanaRpcReader {
    #[tracing::instrument(skip(self, _chain), fields(url = %self.rpc.url()))]
    async fn fetch_balance(
        &self,
        wallet_address: &str,
        token_address: &str,
        _chain: &str,
    ) -> Result<Option<f64>, BalanceQueryError> {
        let owner = parse_pubkey(wallet_address)?;
        let mint = parse_pubkey(token_address)?;

        let accounts = self
            .rpc
            .get_token_accounts_by_owner(&owner, TokenAccountsFilter::Mint(mint))
            .await
            .change_context(BalanceQueryError::RequestError)
            .attach_printable("getTokenAccountsByOwner failed")?;

        let Some(account) = accounts.first() else {
            tracing::debug!("No token account for this mint");
            return Ok(None);
        };

        let account = account
            .pubkey
            .parse::<Pubkey>()
            .change_context(BalanceQueryError::DataFormatError)
            .attach_printable_lazy(|| format!("Invalid token account {}", account.pubkey))?;

        let amount = self
            .rpc
            .get_token_account_balance(&account)
            .await
            .change_context(BalanceQueryError::RequestError)
            .attach_printable("getTokenAccountBalance failed")?;

        ui_amount(amount.ui_amount, &amount.ui_amount_string)
            .map(Some)
            .ok_or_else(|| {
                report!(BalanceQueryError::DataFormatError).attach_printable(format!(
                    "Token amount without ui amount: {} / 10^{}",
                    amount.amount, amount.decimals
                ))
            })
    }
}

/// Trims and decodes a base58 public key.
pub fn parse_pubkey(key: &str) -> Result<Pubkey, BalanceQueryError> {
    let key = key.trim();
    key.parse::<Pubkey>()
        .change_context_lazy(|| BalanceQueryError::InvalidAddress(key.to_string()))
}

fn ui_amount(ui_amount: Option<f64>, ui_amount_string: &str) -> Option<f64> {
    ui_amount.or_else(|| ui_amount_string.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use solana_client::rpc_request::RpcRequest;

    use super::*;

    const OWNER: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";
    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const TOKEN_ACCOUNT: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    fn reader(mocks: Vec<(RpcRequest, serde_json::Value)>) -> SolanaRpcReader {
        SolanaRpcReader::with_client(RpcClient::new_mock_with_mocks(
            "succeeds".to_string(),
            HashMap::from_iter(mocks),
        ))
    }

    fn accounts(pubkeys: &[&str]) -> serde_json::Value {
        let accounts = pubkeys
            .iter()
            .map(|pubkey| {
                json!({
                    "pubkey": pubkey,
                    "account": {
                        "lamports": 2039280,
                        "data": ["", "base64"],
                        "owner": TOKEN_ACCOUNT,
                        "executable": false,
                        "rentEpoch": 0
                    }
                })
            })
            .collect::<Vec<_>>();
        json!({ "context": { "slot": 1 }, "value": accounts })
    }

    #[tokio::test]
    async fn test_no_token_account_is_none() {
        let reader = reader(vec![(RpcRequest::GetTokenAccountsByOwner, accounts(&[]))]);
        let balance = reader.fetch_balance(OWNER, MINT, "solana").await.unwrap();
        assert_eq!(balance, None);
    }

    #[tokio::test]
    async fn test_first_account_balance() {
        let reader = reader(vec![
            (
                RpcRequest::GetTokenAccountsByOwner,
                accounts(&[TOKEN_ACCOUNT]),
            ),
            (
                RpcRequest::GetTokenAccountBalance,
                json!({
                    "context": { "slot": 1 },
                    "value": {
                        "amount": "9864",
                        "decimals": 2,
                        "uiAmount": 98.64,
                        "uiAmountString": "98.64"
                    }
                }),
            ),
        ]);
        let balance = reader.fetch_balance(OWNER, MINT, "solana").await.unwrap();
        assert_eq!(balance, Some(98.64));
    }

    #[tokio::test]
    async fn test_invalid_owner_makes_no_request() {
        let reader = SolanaRpcReader::with_client(RpcClient::new_mock("fails".to_string()));
        let report = reader
            .fetch_balance("0x00000000219ab540356cBB839Cbe05303d7705Fa", MINT, "solana")
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            BalanceQueryError::InvalidAddress(_)
        ));
    }

    #[test]
    fn test_ui_amount_falls_back_to_string() {
        assert_eq!(ui_amount(Some(98.64), "98.64"), Some(98.64));
        assert_eq!(ui_amount(None, "1.5"), Some(1.5));
        assert_eq!(ui_amount(None, ""), None);
    }

    #[test]
    fn test_parse_pubkey() {
        assert!(parse_pubkey(&format!(" {MINT} ")).is_ok());
        assert!(parse_pubkey("11111111111111111111111111111111").is_ok());
        // Valid alphabet and length, but decodes to 43 bytes
        assert!(parse_pubkey("1111111111111111111111111111111111111111111").is_err());
        assert!(parse_pubkey("0x00000000219ab540356cBB839Cbe05303d7705Fa").is_err());
        assert!(parse_pubkey("short").is_err());
    }
}
