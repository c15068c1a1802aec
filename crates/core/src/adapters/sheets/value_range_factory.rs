use google_sheets4::api::ValueRange;
use serde_json::Value;

use crate::domain::{
    portfolio::row::PortfolioTable,
    sheets::a1_notation::{CellRange, ToA1Notation},
};

pub trait ValueRangeFactory {
    fn from_rows(values: Vec<Vec<Value>>, range: Option<String>) -> Self;
    fn from_table(table: &PortfolioTable, sheet_name: &str) -> Self;
}

impl ValueRangeFactory for ValueRange {
    fn from_rows(values: Vec<Vec<Value>>, range: Option<String>) -> Self {
        Self {
            major_dimension: Some("ROWS".to_string()),
            range,
            values: Some(values),
        }
    }

    /// Header line plus every row, anchored at `A1` of `sheet_name`.
    fn from_table(table: &PortfolioTable, sheet_name: &str) -> Self {
        let values = table.to_values();
        let range = CellRange::from_origin(table.headers.len(), values.len())
            .to_a1_notation(Some(sheet_name));
        Self::from_rows(values, Some(range.0))
    }
}
