pub mod balance;
pub mod chain;
pub mod token;
