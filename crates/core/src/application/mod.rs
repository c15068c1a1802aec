pub mod balance;
pub mod portfolio;
pub mod price;
