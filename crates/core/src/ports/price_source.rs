use chrono::NaiveDate;
use thiserror::Error;

/// Transport-level failure of a price request. These are the only failures
/// the price history fetcher retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceSourceError {
    #[error("Price request failed")]
    RequestError,
    #[error("Price API answered with an error status")]
    StatusError,
    #[error("Price response could not be parsed")]
    DataFormatError,
}

/// Upstream price provider.
///
/// `Ok(None)` is an authoritative "no price for this token/date" answer.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn current_price(
        &self,
        token_id: &str,
    ) -> error_stack::Result<Option<f64>, PriceSourceError>;

    async fn price_on(
        &self,
        token_id: &str,
        date: NaiveDate,
    ) -> error_stack::Result<Option<f64>, PriceSourceError>;
}
