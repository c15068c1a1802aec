pub mod enrichment;
pub mod row;
