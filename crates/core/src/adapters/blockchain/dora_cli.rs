use error_stack::{report, Result, ResultExt};
use tokio::process::Command;

use super::cosmos_lcd::{bank_responses::BalancesResponse, denom_balance};
use crate::{
    adapters::{config::blockchain_config::DoraConfig, http},
    ports::balance_reader::{BalanceQueryError, BalanceReader},
};

/// Dora balances through the `dorad` query binary, which must be on `PATH`
/// or configured with an absolute path.
pub struct DoraCliReader {
    config: DoraConfig,
}

impl DoraCliReader {
    pub fn new(config: DoraConfig) -> Self {
        Self { config }
    }

    fn command(&self, address: &str) -> Command {
        let mut command = Command::new(&*self.config.binary);
        command
            .args(["query", "bank", "balances", address])
            .args(["--node", &*self.config.node])
            .args(["--output", "json"])
            .kill_on_drop(true);
        command
    }
}

#[async_trait::async_trait]
impl BalanceReader for DoraCliReader {
    #[tracing::instrument(skip(self, _token_address, _chain))]
    async fn fetch_balance(
        &self,
        wallet_address: &str,
        _token_address: &str,
        _chain: &str,
    ) -> Result<Option<f64>, BalanceQueryError> {
        let output = self
            .command(wallet_address.trim())
            .output()
            .await
            .change_context(BalanceQueryError::ProcessError)
            .attach_printable_lazy(|| format!("Failed to spawn {}", self.config.binary))?;

        if !output.status.success() {
            return Err(report!(BalanceQueryError::ProcessError)
                .attach_printable(format!("{} exited with {}", self.config.binary, output.status))
                .attach_printable(format!(
                    "stderr: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
        }

        let resp = parse_output(&output.stdout)?;
        denom_balance(&resp, &self.config.denom, self.config.decimals)
    }
}

fn parse_output(stdout: &[u8]) -> Result<BalancesResponse, BalanceQueryError> {
    http::parse_json(&String::from_utf8_lossy(stdout))
        .change_context(BalanceQueryError::DataFormatError)
        .attach_printable("Unexpected dorad output")
}
