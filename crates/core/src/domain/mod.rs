pub mod blockchain;
pub mod portfolio;
pub mod price;
pub mod sheets;
