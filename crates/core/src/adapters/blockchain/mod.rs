pub mod cosmos_lcd;
pub mod dora_cli;
pub mod erc20;
pub mod evm_rpc;
pub mod solana_rpc;
pub mod subscan;
