use std::fmt::Formatter;

use super::column::Column;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(pub String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub trait ToA1Notation {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation;
}

fn with_sheet(sheet_name: Option<&str>, local: String) -> A1Notation {
    match sheet_name {
        // Single quotes inside a sheet title are escaped by doubling them
        Some(sheet_name) => A1Notation(format!("'{}'!{}", sheet_name.replace('\'', "''"), local)),
        None => A1Notation(local),
    }
}

/// Single cell, row is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub col: Column,
    pub row: u32,
}

impl ToA1Notation for CellPosition {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        with_sheet(sheet_name, format!("{}{}", self.col, self.row))
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellPosition,
    pub end: CellPosition,
}

impl CellRange {
    /// Range starting at `A1` covering `row_count` rows by `column_count`
    /// columns. Empty grids still cover `A1`.
    pub fn from_origin(column_count: usize, row_count: usize) -> Self {
        CellRange {
            start: CellPosition {
                col: Column::from_index(0),
                row: 1,
            },
            end: CellPosition {
                col: Column::from_index(column_count.saturating_sub(1)),
                row: u32::try_from(row_count.max(1)).unwrap_or(u32::MAX),
            },
        }
    }
}

impl ToA1Notation for CellRange {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        with_sheet(
            sheet_name,
            format!(
                "{}{}:{}{}",
                self.start.col, self.start.row, self.end.col, self.end.row
            ),
        )
    }
}

/// The whole sheet, e.g. `'Portfolio'`.
pub fn whole_sheet(sheet_name: &str) -> A1Notation {
    A1Notation(format!("'{}'", sheet_name.replace('\'', "''")))
}
