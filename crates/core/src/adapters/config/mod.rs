pub mod app_config;
pub mod blockchain_config;
pub mod price_config;
pub mod sheets_config;
