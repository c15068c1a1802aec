use std::sync::Arc;

use tracing::instrument;

use crate::{
    domain::blockchain::{
        balance::{BalanceOutcome, ResolvedBalance},
        chain::{ChainClassifier, ChainKind},
    },
    ports::balance_reader::BalanceReader,
};

/// One reader per chain family.
#[derive(Clone)]
pub struct ChainReaders {
    pub evm: Arc<dyn BalanceReader>,
    pub solana: Arc<dyn BalanceReader>,
    pub dora: Arc<dyn BalanceReader>,
    pub aura: Arc<dyn BalanceReader>,
    pub substrate: Arc<dyn BalanceReader>,
}

/// Classifies the chain of a holding and runs the matching reader. Never
/// fails: every problem ends up as a [`BalanceOutcome`].
pub struct ChainBalanceResolver {
    classifier: ChainClassifier,
    readers: ChainReaders,
}

impl ChainBalanceResolver {
    pub fn new(classifier: ChainClassifier, readers: ChainReaders) -> Self {
        Self {
            classifier,
            readers,
        }
    }

    fn reader(&self, kind: ChainKind) -> Option<&Arc<dyn BalanceReader>> {
        match kind {
            ChainKind::Evm => Some(&self.readers.evm),
            ChainKind::Solana => Some(&self.readers.solana),
            ChainKind::Dora => Some(&self.readers.dora),
            ChainKind::Aura => Some(&self.readers.aura),
            ChainKind::Substrate => Some(&self.readers.substrate),
            ChainKind::Unknown => None,
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        wallet_address: &str,
        token_address: &str,
        chain: &str,
    ) -> ResolvedBalance {
        let kind = self.classifier.classify(chain);

        let Some(reader) = self.reader(kind) else {
            tracing::warn!("Chain '{chain}' is not supported, balance set to 0");
            return ResolvedBalance {
                kind,
                outcome: BalanceOutcome::Unsupported,
            };
        };

        let outcome = match reader
            .fetch_balance(wallet_address.trim(), token_address.trim(), chain.trim())
            .await
        {
            Ok(balance) => BalanceOutcome::from(balance),
            Err(report) => {
                tracing::warn!(%kind, "Balance lookup failed, balance set to 0: {report:?}");
                BalanceOutcome::TransportError
            }
        };

        ResolvedBalance { kind, outcome }
    }

    /// Human scaled balance, `0` whenever no balance could be read.
    pub async fn resolve_balance(
        &self,
        wallet_address: &str,
        token_address: &str,
        chain: &str,
    ) -> f64 {
        self.resolve(wallet_address, token_address, chain)
            .await
            .outcome
            .value()
    }
}
