pub mod balance_reader;
pub mod portfolio_sheet;
pub mod price_source;
pub mod routine;
