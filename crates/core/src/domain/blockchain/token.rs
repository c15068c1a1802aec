use std::num::ParseIntError;

/// Integer amount in a token's smallest unit together with its decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub raw: u128,
    pub decimals: u32,
}

impl TokenAmount {
    pub fn new(raw: u128, decimals: u32) -> Self {
        Self { raw, decimals }
    }

    pub fn parse(raw: &str, decimals: u32) -> Result<Self, ParseIntError> {
        Ok(Self::new(raw.trim().parse::<u128>()?, decimals))
    }

    /// Human readable amount, `raw / 10^decimals`.
    pub fn to_f64(&self) -> f64 {
        let exponent = i32::try_from(self.decimals).unwrap_or(i32::MAX);
        self.raw as f64 / 10f64.powi(exponent)
    }
}
