use crate::domain::price::snapshot::{Lookback, PriceSnapshot};

use super::row::{columns, CellValue, PortfolioRow};

/// How change columns are persisted.
#[derive(serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStyle {
    /// Relative fraction, `0.1` for +10%.
    #[default]
    Numeric,
    /// Two decimal percentage string, `"10.00%"`.
    Formatted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enrichment {
    pub balance: f64,
    pub price: f64,
    pub change_24h: f64,
    pub change_7d: f64,
    pub change_30d: f64,
    pub value: f64,
}

/// `(current - past) / past`, or zero without a usable baseline.
pub fn relative_change(current: f64, past: Option<f64>) -> f64 {
    match past {
        Some(past) if past != 0.0 => (current - past) / past,
        _ => 0.0,
    }
}

pub fn format_change(change: f64) -> String {
    format!("{:.2}%", change * 100.0)
}

pub fn enrich(balance: f64, snapshot: &PriceSnapshot) -> Enrichment {
    let price = snapshot.current.unwrap_or(0.0);
    let change = |lookback: Lookback| relative_change(price, snapshot.past(lookback));

    Enrichment {
        balance,
        price,
        change_24h: change(Lookback::OneDay),
        change_7d: change(Lookback::SevenDays),
        change_30d: change(Lookback::ThirtyDays),
        value: balance * price,
    }
}

impl Enrichment {
    pub fn apply_to(&self, row: &mut PortfolioRow, style: ChangeStyle) {
        let change_cell = |change: f64| match style {
            ChangeStyle::Numeric => CellValue::Number(change),
            ChangeStyle::Formatted => CellValue::Text(format_change(change)),
        };

        row.set(columns::BALANCE, self.balance);
        row.set(columns::PRICE, self.price);
        row.set(columns::CHANGE_24H, change_cell(self.change_24h));
        row.set(columns::CHANGE_7D, change_cell(self.change_7d));
        row.set(columns::CHANGE_30D, change_cell(self.change_30d));
        row.set(columns::VALUE, self.value);
    }
}
