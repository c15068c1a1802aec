pub mod blockchain;
pub mod config;
pub mod http;
pub mod price;
pub mod sheets;
