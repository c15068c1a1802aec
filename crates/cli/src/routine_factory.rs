use std::sync::Arc;

use crypto_portfolio_core::{
    adapters::{
        blockchain::{
            cosmos_lcd::CosmosLcdReader, dora_cli::DoraCliReader, erc20::Erc20BalanceReader,
            evm_rpc::EvmRpcConnector, solana_rpc::SolanaRpcReader, subscan::SubscanReader,
        },
        config::app_config::AppConfig,
        http,
        price::coingecko::CoinGeckoApi,
        sheets::spreadsheet_manager::SpreadsheetManager,
    },
    application::{
        balance::resolver::{ChainBalanceResolver, ChainReaders},
        portfolio::sync_portfolio_routine::{SyncOptions, SyncPortfolioRoutine},
        price::{
            history_fetcher::{PriceHistoryFetcher, RetryPolicy},
            rate_limiter::RateLimiter,
        },
    },
    domain::blockchain::chain::ChainClassifier,
    ports::routine::RoutineError,
};
use error_stack::ResultExt;

pub struct RoutineFactory;

impl RoutineFactory {
    pub async fn create(
        config: &AppConfig,
    ) -> error_stack::Result<SyncPortfolioRoutine, RoutineError> {
        let client = http::build_client(config.request_timeout()).change_context(
            RoutineError::routine_failure("Failed to build HTTP client"),
        )?;

        let spreadsheet_manager = Arc::new(
            SpreadsheetManager::new(config.sheets.clone())
                .await
                .change_context(RoutineError::spreadsheet_failure(
                    "Failed to connect to Google Sheets",
                ))?,
        );

        Ok(SyncPortfolioRoutine::new(
            spreadsheet_manager,
            Self::create_resolver(config, &client),
            Self::create_price_fetcher(config, &client),
            SyncOptions {
                change_style: config.output.change_style,
                apply_format: config.sheets.apply_format,
            },
        ))
    }

    fn create_resolver(config: &AppConfig, client: &reqwest::Client) -> ChainBalanceResolver {
        let blockchain = &config.blockchain;
        let classifier =
            ChainClassifier::new(&blockchain.evm_chains, &blockchain.substrate_chains);

        ChainBalanceResolver::new(
            classifier,
            ChainReaders {
                evm: Arc::new(Erc20BalanceReader::new(EvmRpcConnector::new(
                    client.clone(),
                    blockchain,
                ))),
                solana: Arc::new(SolanaRpcReader::new(
                    blockchain.solana.resolve_rpc_url(),
                    config.request_timeout(),
                )),
                dora: Arc::new(DoraCliReader::new(blockchain.dora.clone())),
                aura: Arc::new(CosmosLcdReader::new(
                    client.clone(),
                    blockchain.aura.clone(),
                )),
                substrate: Arc::new(SubscanReader::new(
                    client.clone(),
                    blockchain.subscan.clone(),
                )),
            },
        )
    }

    fn create_price_fetcher(config: &AppConfig, client: &reqwest::Client) -> PriceHistoryFetcher {
        PriceHistoryFetcher::new(
            Arc::new(CoinGeckoApi::new(client.clone(), config.coingecko.clone())),
            Arc::new(RateLimiter::new(config.sleep_interval())),
            RetryPolicy {
                max_retries: config.params.max_retries,
            },
            config.coingecko.retention_days,
        )
    }
}
