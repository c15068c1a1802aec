use std::{collections::BTreeSet, sync::Arc};

use error_stack::ResultExt;
use indicatif::ProgressStyle;
use tracing::{instrument, Instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::{
    application::{
        balance::resolver::ChainBalanceResolver, price::history_fetcher::PriceHistoryFetcher,
    },
    domain::{
        blockchain::balance::BalanceOutcome,
        portfolio::{
            enrichment::{enrich, ChangeStyle},
            row::{columns, PortfolioRow, PortfolioTable},
        },
    },
    ports::{
        portfolio_sheet::{ColumnFormat, PortfolioSheet},
        routine::{Routine, RoutineError},
    },
};

/// What happened during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows_processed: usize,
    /// Rows whose balance came from a failed lookup or an unsupported chain.
    pub degraded_balances: usize,
    /// Rows with at least one price lookup that exhausted its retries.
    pub degraded_prices: usize,
    pub unsupported_chains: BTreeSet<String>,
    pub format_failures: usize,
}

impl SyncReport {
    /// The sheet was written but some values are sentinels for failures.
    pub fn is_partial(&self) -> bool {
        self.degraded_balances > 0
            || self.degraded_prices > 0
            || !self.unsupported_chains.is_empty()
            || self.format_failures > 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub change_style: ChangeStyle,
    pub apply_format: bool,
}

/// Reads the portfolio sheet, enriches every row with its balance and price
/// history, and writes the whole table back.
pub struct SyncPortfolioRoutine {
    sheet: Arc<dyn PortfolioSheet>,
    resolver: ChainBalanceResolver,
    prices: PriceHistoryFetcher,
    options: SyncOptions,
}

impl SyncPortfolioRoutine {
    pub fn new(
        sheet: Arc<dyn PortfolioSheet>,
        resolver: ChainBalanceResolver,
        prices: PriceHistoryFetcher,
        options: SyncOptions,
    ) -> Self {
        Self {
            sheet,
            resolver,
            prices,
            options,
        }
    }

    async fn enrich_row(&self, row: &mut PortfolioRow, report: &mut SyncReport) {
        let chain = row.chain();
        let resolved = self
            .resolver
            .resolve(&row.wallet_address(), &row.token_address(), &chain)
            .await;

        match resolved.outcome {
            BalanceOutcome::Unsupported => {
                report.degraded_balances += 1;
                report.unsupported_chains.insert(chain.to_lowercase());
            }
            BalanceOutcome::TransportError => report.degraded_balances += 1,
            BalanceOutcome::Found(_) | BalanceOutcome::NotFound => {}
        }

        let outcomes = self.prices.fetch_outcomes(&row.token_id()).await;
        if outcomes.is_degraded() {
            report.degraded_prices += 1;
        }
        let snapshot = outcomes.snapshot();
        tracing::debug!(?snapshot, "Price snapshot");

        let balance = resolved.outcome.value();
        tracing::info!("{} on {}: {balance}", row.symbol(), resolved.kind);

        enrich(balance, &snapshot).apply_to(row, self.options.change_style);
    }

    fn column_formats(&self) -> Vec<(&'static str, ColumnFormat)> {
        let mut formats = vec![
            (columns::BALANCE, ColumnFormat::Number),
            (columns::PRICE, ColumnFormat::Currency),
            (columns::VALUE, ColumnFormat::Currency),
        ];
        // Formatted changes are already strings
        if self.options.change_style == ChangeStyle::Numeric {
            formats.extend([
                (columns::CHANGE_24H, ColumnFormat::Percent),
                (columns::CHANGE_7D, ColumnFormat::Percent),
                (columns::CHANGE_30D, ColumnFormat::Percent),
            ]);
        }
        formats
    }

    #[instrument(skip(self, table, report))]
    async fn apply_formats(&self, table: &PortfolioTable, report: &mut SyncReport) {
        for (column, format) in self.column_formats() {
            if let Err(e) = self
                .sheet
                .apply_column_format(&table.headers, column, format)
                .await
            {
                tracing::warn!("Could not format column {column}: {e:?}");
                report.format_failures += 1;
            }
        }
    }
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{span_child_prefix}{spinner} {msg} [{wide_bar}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

#[async_trait::async_trait]
impl Routine for SyncPortfolioRoutine {
    type Output = SyncReport;

    fn name(&self) -> &str {
        "SyncPortfolioRoutine"
    }

    #[instrument(skip(self), name = "SyncPortfolioRoutine::run")]
    async fn run(&self) -> error_stack::Result<SyncReport, RoutineError> {
        tracing::info!("Sync: 📋 Reading portfolio sheet");
        let mut table = self
            .sheet
            .read_rows()
            .await
            .change_context(RoutineError::spreadsheet_failure(
                "Failed to read portfolio sheet",
            ))?;

        let added = table.ensure_derived_headers();
        if !added.is_empty() {
            tracing::info!("Sync: ➕ Adding missing columns {}", added.join(", "));
        }

        let mut report = SyncReport::default();
        let row_count = table.rows.len();

        let progress = tracing::info_span!("sync_rows");
        progress.pb_set_style(&progress_style());
        progress.pb_set_length(row_count as u64);
        progress.pb_set_message("Enriching rows");

        for (index, row) in table.rows.iter_mut().enumerate() {
            let row_span = tracing::info_span!(parent: &progress, "row", index = index + 2);
            self.enrich_row(row, &mut report)
                .instrument(row_span)
                .await;
            report.rows_processed += 1;
            progress.pb_set_position(report.rows_processed as u64);
        }
        drop(progress);

        tracing::info!("Sync: ✍️ Writing {row_count} rows to the portfolio sheet");
        self.sheet
            .write_rows(&table)
            .await
            .change_context(RoutineError::spreadsheet_failure(
                "Failed to write portfolio sheet",
            ))?;

        if self.options.apply_format {
            tracing::info!("Sync: 🎨 Formatting columns");
            self.apply_formats(&table, &mut report).await;
        }

        if report.is_partial() {
            tracing::warn!(?report, "Sync: ⚠️ Finished with degraded values");
        } else {
            tracing::info!(?report, "Sync: ✅ Finished");
        }

        Ok(report)
    }
}
