use thiserror::Error;

use crate::domain::portfolio::row::PortfolioTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Failed to authenticate against the spreadsheet API")]
    AuthError,
    #[error("Failed to read the portfolio sheet")]
    ReadError,
    #[error("Failed to write the portfolio sheet")]
    WriteError,
    #[error("Failed to format the portfolio sheet")]
    FormatError,
    #[error("Column {0} not found in headers")]
    ColumnNotFound(String),
    #[error("Header {0} appears more than once")]
    DuplicateHeader(String),
}

/// Display format applied to a whole column below the header row.
#[derive(strum::Display, strum::EnumString, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnFormat {
    Number,
    Currency,
    Percent,
}

impl ColumnFormat {
    /// Sheets number format pattern.
    pub fn pattern(&self) -> &'static str {
        match self {
            ColumnFormat::Number => "#,##0.00######",
            ColumnFormat::Currency => "$#,##0.00",
            ColumnFormat::Percent => "0.00%",
        }
    }
}

/// Spreadsheet holding the portfolio: headers on the first row, one holding
/// per row below.
#[async_trait::async_trait]
pub trait PortfolioSheet: Send + Sync {
    async fn read_rows(&self) -> error_stack::Result<PortfolioTable, SheetError>;

    /// Replaces all prior content of the sheet with `table`.
    async fn write_rows(&self, table: &PortfolioTable) -> error_stack::Result<(), SheetError>;

    async fn apply_column_format(
        &self,
        headers: &[String],
        column_name: &str,
        format: ColumnFormat,
    ) -> error_stack::Result<(), SheetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_matches_api_type() {
        assert_eq!(ColumnFormat::Number.to_string(), "NUMBER");
        assert_eq!(ColumnFormat::Currency.to_string(), "CURRENCY");
        assert_eq!(ColumnFormat::Percent.to_string(), "PERCENT");
        assert_eq!("PERCENT".parse::<ColumnFormat>(), Ok(ColumnFormat::Percent));
    }
}
