pub mod history_fetcher;
pub mod rate_limiter;
