use std::fmt::Debug;

use error_stack::{report, ResultExt};
use google_sheets4::{
    api::{BatchUpdateSpreadsheetRequest, ClearValuesRequest, ValueRange},
    Sheets,
};
use serde_json::Value;
use tracing::instrument;

use super::{
    auth,
    format_request::column_format_request,
    http_client::{self, HttpsConnector},
    value_range_factory::ValueRangeFactory,
};
use crate::{
    adapters::config::sheets_config::SpreadsheetConfig,
    domain::{portfolio::row::PortfolioTable, sheets::a1_notation::{whole_sheet, A1Notation}},
    ports::portfolio_sheet::{ColumnFormat, PortfolioSheet, SheetError},
};

/// Read without rendering so numbers come back as numbers.
const VALUE_RENDER_OPTION: &str = "UNFORMATTED_VALUE";
/// Written back verbatim so text cells are never reparsed as formulas or dates.
const VALUE_INPUT_OPTION: &str = "RAW";

pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpreadsheetManager {{ config: {:?} }}", self.config)
    }
}

impl SpreadsheetManager {
    #[instrument(name = "SpreadsheetManager::new")]
    pub async fn new(config: SpreadsheetConfig) -> error_stack::Result<Self, SheetError> {
        let client = http_client::http_client();
        let auth = auth::auth(&config, client.clone()).await?;
        let hub = Sheets::new(client, auth);

        Ok(SpreadsheetManager { config, hub })
    }

    fn sheet_range(&self) -> A1Notation {
        whole_sheet(&self.config.sheet_name)
    }

    #[instrument]
    async fn read_values(
        &self,
        range: &A1Notation,
    ) -> error_stack::Result<Vec<Vec<Value>>, SheetError> {
        let response = self
            .hub
            .spreadsheets()
            .values_get(&self.config.spreadsheet_id, range.as_ref())
            .value_render_option(VALUE_RENDER_OPTION)
            .doit()
            .await
            .change_context(SheetError::ReadError)
            .attach_printable_lazy(|| format!("Failed to read range {range}"))?;

        // An empty sheet comes back without values
        Ok(response.1.values.unwrap_or_default())
    }

    #[instrument]
    async fn clear_range(&self, range: &A1Notation) -> error_stack::Result<(), SheetError> {
        self.hub
            .spreadsheets()
            .values_clear(
                ClearValuesRequest::default(),
                &self.config.spreadsheet_id,
                range.as_ref(),
            )
            .doit()
            .await
            .map(|_| ())
            .change_context(SheetError::WriteError)
            .attach_printable_lazy(|| format!("Failed to clear range {range}"))
    }

    #[instrument(skip(value_range))]
    async fn write_range(
        &self,
        range: &str,
        value_range: ValueRange,
    ) -> error_stack::Result<(), SheetError> {
        self.hub
            .spreadsheets()
            .values_update(value_range, &self.config.spreadsheet_id, range)
            .value_input_option(VALUE_INPUT_OPTION)
            .doit()
            .await
            .map(|_| ())
            .change_context(SheetError::WriteError)
            .attach_printable_lazy(|| format!("Failed to write to range {range}"))
    }

    #[instrument(skip(request))]
    async fn batch_update(
        &self,
        request: BatchUpdateSpreadsheetRequest,
    ) -> error_stack::Result<(), SheetError> {
        self.hub
            .spreadsheets()
            .batch_update(request, &self.config.spreadsheet_id)
            .doit()
            .await
            .map(|_| ())
            .change_context(SheetError::FormatError)
    }
}

#[async_trait::async_trait]
impl PortfolioSheet for SpreadsheetManager {
    #[instrument]
    async fn read_rows(&self) -> error_stack::Result<PortfolioTable, SheetError> {
        let values = self.read_values(&self.sheet_range()).await?;
        let table = PortfolioTable::from_values(&values).map_err(|e| {
            report!(SheetError::DuplicateHeader(e.0.clone()))
                .attach_printable("Headers must be unique, refusing to rewrite the sheet")
        })?;
        tracing::debug!(
            headers = table.headers.len(),
            rows = table.rows.len(),
            "Portfolio sheet read"
        );
        Ok(table)
    }

    #[instrument(skip(table), fields(rows = table.rows.len()))]
    async fn write_rows(&self, table: &PortfolioTable) -> error_stack::Result<(), SheetError> {
        let value_range = ValueRange::from_table(table, &self.config.sheet_name);
        let range = value_range.range.clone().ok_or_else(|| {
            report!(SheetError::WriteError).attach_printable("Value range without target range")
        })?;

        self.clear_range(&self.sheet_range()).await?;
        self.write_range(&range, value_range).await
    }

    #[instrument(skip(headers))]
    async fn apply_column_format(
        &self,
        headers: &[String],
        column_name: &str,
        format: ColumnFormat,
    ) -> error_stack::Result<(), SheetError> {
        let column_index = headers
            .iter()
            .position(|header| header == column_name)
            .ok_or_else(|| report!(SheetError::ColumnNotFound(column_name.to_string())))?;
        let column_index = i32::try_from(column_index)
            .change_context(SheetError::FormatError)
            .attach_printable_lazy(|| format!("Column index {column_index} out of range"))?;

        let request = column_format_request(self.config.sheet_gid, column_index, format);
        self.batch_update(request)
            .await
            .attach_printable_lazy(|| format!("Failed to format column {column_name} as {format}"))
    }
}
