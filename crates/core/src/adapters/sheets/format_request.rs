use google_sheets4::{
    api::{
        BatchUpdateSpreadsheetRequest, CellData, CellFormat, GridRange, NumberFormat,
        RepeatCellRequest, Request,
    },
    FieldMask,
};

use crate::ports::portfolio_sheet::ColumnFormat;

const NUMBER_FORMAT_FIELDS: &str = "userEnteredFormat.numberFormat";

/// Number format for one whole column, header row excluded.
pub fn column_format_request(
    sheet_gid: i32,
    column_index: i32,
    format: ColumnFormat,
) -> BatchUpdateSpreadsheetRequest {
    let repeat_cell = RepeatCellRequest {
        range: Some(GridRange {
            sheet_id: Some(sheet_gid),
            start_row_index: Some(1),
            end_row_index: None,
            start_column_index: Some(column_index),
            end_column_index: Some(column_index + 1),
        }),
        cell: Some(CellData {
            user_entered_format: Some(CellFormat {
                number_format: Some(NumberFormat {
                    type_: Some(format.to_string()),
                    pattern: Some(format.pattern().to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        fields: Some(FieldMask::new(&[NUMBER_FORMAT_FIELDS])),
    };

    BatchUpdateSpreadsheetRequest {
        requests: Some(vec![Request {
            repeat_cell: Some(repeat_cell),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
