pub mod auth;
pub mod format_request;
pub mod http_client;
pub mod spreadsheet_manager;
pub mod value_range_factory;
