use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use thiserror::Error;

/// Column names the pipeline reads from and writes to.
pub mod columns {
    pub const WALLET_ADDRESS: &str = "Wallet Address";
    pub const TOKEN_ADDRESS: &str = "Token Address";
    pub const CHAIN: &str = "Chain";
    pub const TOKEN_ID: &str = "TokenId";
    pub const SYMBOL: &str = "Symbol";

    pub const BALANCE: &str = "Balance";
    pub const PRICE: &str = "Price";
    pub const CHANGE_24H: &str = "24h Change";
    pub const CHANGE_7D: &str = "7d Change";
    pub const CHANGE_30D: &str = "30d Change";
    pub const VALUE: &str = "Value";

    pub const DERIVED: [&str; 6] = [BALANCE, PRICE, CHANGE_24H, CHANGE_7D, CHANGE_30D, VALUE];
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(number) => number.to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(number) => Some(*number),
            CellValue::Text(text) => text.trim().parse().ok(),
            CellValue::Empty => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from(value.to_string())
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::String(text) => CellValue::from(text.clone()),
            Value::Number(number) => number
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(number.to_string())),
            Value::Bool(flag) => CellValue::Text(flag.to_string().to_uppercase()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&CellValue> for Value {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Text(text) => Value::String(text.clone()),
            // NaN and infinities have no JSON representation
            CellValue::Number(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(String::new())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Header '{0}' appears more than once")]
pub struct DuplicateHeaderError(pub String);

/// One holding, keyed by column name. Identity is its position in the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioRow {
    cells: HashMap<String, CellValue>,
    /// Cells under blank headers, by column position. Carried through as is.
    unnamed: BTreeMap<usize, CellValue>,
}

impl PortfolioRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn text(&self, column: &str) -> String {
        self.get(column).map(CellValue::as_text).unwrap_or_default()
    }

    pub fn set<V: Into<CellValue>>(&mut self, column: &str, value: V) {
        self.cells.insert(column.to_string(), value.into());
    }

    pub fn wallet_address(&self) -> String {
        self.text(columns::WALLET_ADDRESS)
    }

    pub fn token_address(&self) -> String {
        self.text(columns::TOKEN_ADDRESS)
    }

    pub fn chain(&self) -> String {
        self.text(columns::CHAIN)
    }

    pub fn token_id(&self) -> String {
        self.text(columns::TOKEN_ID)
    }

    pub fn symbol(&self) -> String {
        self.text(columns::SYMBOL)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for PortfolioRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            unnamed: BTreeMap::new(),
        }
    }
}

/// Header row plus the records below it, as read from or written to a sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioTable {
    pub headers: Vec<String>,
    pub rows: Vec<PortfolioRow>,
}

impl PortfolioTable {
    /// Builds a table from a grid whose first line holds the headers. Short
    /// lines are padded with empty cells, and the header line is padded with
    /// blank headers up to the widest line.
    ///
    /// Non-blank headers must be unique, otherwise writing the table back
    /// would merge their columns.
    pub fn from_values(values: &[Vec<Value>]) -> Result<Self, DuplicateHeaderError> {
        let Some((header_line, records)) = values.split_first() else {
            return Ok(Self::default());
        };

        let mut headers = header_line
            .iter()
            .map(|header| CellValue::from(header).as_text())
            .collect::<Vec<_>>();
        let width = values.iter().map(Vec::len).max().unwrap_or_default();
        headers.resize(width, String::new());

        let mut seen = HashSet::new();
        if let Some(duplicate) = headers
            .iter()
            .filter(|header| !header.is_empty())
            .find(|header| !seen.insert(header.as_str()))
        {
            return Err(DuplicateHeaderError(duplicate.clone()));
        }

        let rows = records
            .iter()
            .map(|record| {
                let mut row = PortfolioRow::default();
                for (i, header) in headers.iter().enumerate() {
                    let cell = record.get(i).map(CellValue::from).unwrap_or_default();
                    if !header.is_empty() {
                        row.cells.insert(header.clone(), cell);
                    } else if cell != CellValue::Empty {
                        row.unnamed.insert(i, cell);
                    }
                }
                row
            })
            .collect();

        Ok(Self { headers, rows })
    }

    /// Serializes the header row and one line per record, following header
    /// order. Cells missing from a record are written empty.
    pub fn to_values(&self) -> Vec<Vec<Value>> {
        let header_line = self
            .headers
            .iter()
            .map(|header| Value::String(header.clone()))
            .collect();

        std::iter::once(header_line)
            .chain(self.rows.iter().map(|row| {
                self.headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let cell = if header.is_empty() {
                            row.unnamed.get(&i)
                        } else {
                            row.get(header)
                        };
                        cell.map(Value::from)
                            .unwrap_or_else(|| Value::String(String::new()))
                    })
                    .collect()
            }))
            .collect()
    }

    /// Appends every derived column missing from the headers, keeping the
    /// existing order.
    pub fn ensure_derived_headers(&mut self) -> Vec<&'static str> {
        let missing = columns::DERIVED
            .into_iter()
            .filter(|column| !self.headers.iter().any(|h| h == column))
            .collect::<Vec<_>>();
        self.headers
            .extend(missing.iter().map(|column| column.to_string()));
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheet_values() -> Vec<Vec<Value>> {
        vec![
            vec![
                json!("Wallet Address"),
                json!("Token Address"),
                json!("Chain"),
                json!("TokenId"),
                json!("Symbol"),
                json!("Balance"),
            ],
            vec![
                json!("0xabc"),
                json!("0xdef"),
                json!("ethereum"),
                json!("usd-coin"),
                json!("USDC"),
                json!(12.5),
            ],
            vec![json!("addr"), json!(""), json!("dora")],
        ]
    }

    #[test]
    fn test_from_values_maps_by_header() {
        let table = PortfolioTable::from_values(&sheet_values()).unwrap();
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.rows.len(), 2);

        let row = &table.rows[0];
        assert_eq!(row.wallet_address(), "0xabc");
        assert_eq!(row.chain(), "ethereum");
        assert_eq!(row.token_id(), "usd-coin");
        assert_eq!(row.get("Balance"), Some(&CellValue::Number(12.5)));
    }

    #[test]
    fn test_from_values_pads_short_lines() {
        let table = PortfolioTable::from_values(&sheet_values()).unwrap();
        let row = &table.rows[1];
        assert_eq!(row.chain(), "dora");
        assert_eq!(row.get("Token Address"), Some(&CellValue::Empty));
        assert_eq!(row.get("Symbol"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_from_values_empty_grid() {
        let table = PortfolioTable::from_values(&[]).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_to_values_follows_header_order() {
        let mut row = PortfolioRow::default();
        row.set("Symbol", "ETH");
        row.set("Value", 20.0);
        let table = PortfolioTable {
            headers: vec!["Value".to_string(), "Symbol".to_string(), "Chain".to_string()],
            rows: vec![row],
        };

        assert_eq!(
            table.to_values(),
            vec![
                vec![json!("Value"), json!("Symbol"), json!("Chain")],
                vec![json!(20.0), json!("ETH"), json!("")],
            ]
        );
    }

    #[test]
    fn test_non_finite_numbers_are_written_empty() {
        assert_eq!(Value::from(&CellValue::Number(f64::NAN)), json!(""));
    }

    #[test]
    fn test_values_round_trip() {
        let table = PortfolioTable::from_values(&sheet_values()).unwrap();
        let reparsed = PortfolioTable::from_values(&table.to_values()).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_ensure_derived_headers() {
        let mut table = PortfolioTable::from_values(&sheet_values()).unwrap();
        let added = table.ensure_derived_headers();
        assert_eq!(added, vec!["Price", "24h Change", "7d Change", "30d Change", "Value"]);
        assert_eq!(table.headers[5], "Balance");
        assert_eq!(table.headers[10], "Value");
        assert!(table.ensure_derived_headers().is_empty());
    }

    #[test]
    fn test_duplicate_headers_are_rejected() {
        let values = vec![
            vec![json!("Symbol"), json!("Note"), json!(" Note "), json!("")],
            vec![json!("ETH"), json!("first"), json!("second"), json!("scratch")],
        ];
        assert_eq!(
            PortfolioTable::from_values(&values),
            Err(DuplicateHeaderError("Note".to_string()))
        );
    }

    #[test]
    fn test_blank_header_cells_are_kept() {
        let values = vec![
            vec![json!("Symbol"), json!(""), json!("Note"), json!("")],
            vec![json!("ETH"), json!("scratch"), json!("first"), json!(7)],
            vec![json!("BTC"), json!(""), json!("second"), json!(""), json!("tail")],
        ];
        let mut table = PortfolioTable::from_values(&values).unwrap();
        assert_eq!(table.headers, ["Symbol", "", "Note", "", ""]);

        table.ensure_derived_headers();
        let written = table.to_values();

        assert_eq!(written[0].len(), 11);
        assert_eq!(
            written[1][..5],
            [json!("ETH"), json!("scratch"), json!("first"), json!(7.0), json!("")]
        );
        assert_eq!(
            written[2][..5],
            [json!("BTC"), json!(""), json!("second"), json!(""), json!("tail")]
        );
    }

    #[test]
    fn test_text_is_trimmed() {
        let row: PortfolioRow = [("Chain", " Solana ")].into_iter().collect();
        assert_eq!(row.chain(), "Solana");
    }

    #[test]
    fn test_numeric_cell_as_text() {
        let row: PortfolioRow = [("TokenId", CellValue::Number(42.0))].into_iter().collect();
        assert_eq!(row.token_id(), "42");
    }
}
