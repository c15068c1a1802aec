use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;

use super::rate_limiter::RateLimiter;
use crate::{
    domain::price::snapshot::{Lookback, PriceOutcome, PriceSnapshot},
    ports::price_source::PriceSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl RetryPolicy {
    /// Total number of attempts per lookup, at least one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Outcome of the four lookups behind a [`PriceSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOutcomes {
    pub current: PriceOutcome,
    pub one_day_ago: PriceOutcome,
    pub seven_days_ago: PriceOutcome,
    pub thirty_days_ago: PriceOutcome,
}

impl SnapshotOutcomes {
    fn all(outcome: PriceOutcome) -> Self {
        Self {
            current: outcome.clone(),
            one_day_ago: outcome.clone(),
            seven_days_ago: outcome.clone(),
            thirty_days_ago: outcome,
        }
    }

    pub fn snapshot(&self) -> PriceSnapshot {
        PriceSnapshot {
            current: self.current.price(),
            one_day_ago: self.one_day_ago.price(),
            seven_days_ago: self.seven_days_ago.price(),
            thirty_days_ago: self.thirty_days_ago.price(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        [
            &self.current,
            &self.one_day_ago,
            &self.seven_days_ago,
            &self.thirty_days_ago,
        ]
        .iter()
        .any(|outcome| outcome.is_degraded())
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Current and past prices of a token, one rate limited and retried lookup
/// at a time.
pub struct PriceHistoryFetcher {
    source: Arc<dyn PriceSource>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    retention_days: i64,
    today: fn() -> NaiveDate,
}

impl PriceHistoryFetcher {
    pub fn new(
        source: Arc<dyn PriceSource>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
        retention_days: i64,
    ) -> Self {
        Self {
            source,
            limiter,
            retry,
            retention_days,
            today: local_today,
        }
    }

    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn is_out_of_retention(&self, date: NaiveDate) -> bool {
        ((self.today)() - date).num_days() > self.retention_days
    }

    /// Price now (`date` is `None`) or on `date`.
    #[instrument(skip(self))]
    pub async fn fetch_price_at(&self, token_id: &str, date: Option<NaiveDate>) -> PriceOutcome {
        if let Some(date) = date {
            if self.is_out_of_retention(date) {
                tracing::debug!("{date} is older than {} days", self.retention_days);
                return PriceOutcome::OutOfRetention;
            }
        }

        let attempts = self.retry.attempts();
        for attempt in 1..=attempts {
            self.limiter.acquire().await;

            let result = match date {
                Some(date) => self.source.price_on(token_id, date).await,
                None => self.source.current_price(token_id).await,
            };

            match result {
                Ok(Some(price)) => return PriceOutcome::Found(price),
                Ok(None) => {
                    tracing::debug!("No price data");
                    return PriceOutcome::NoData;
                }
                Err(report) => {
                    tracing::warn!("Price request failed, attempt {attempt}/{attempts}: {report:?}");
                }
            }
        }

        tracing::warn!("Giving up after {attempts} attempts");
        PriceOutcome::TransportError
    }

    #[instrument(skip(self))]
    pub async fn fetch_outcomes(&self, token_id: &str) -> SnapshotOutcomes {
        let token_id = token_id.trim();
        if token_id.is_empty() {
            return SnapshotOutcomes::all(PriceOutcome::NoData);
        }

        let today = (self.today)();
        let past = |lookback: Lookback| Some(lookback.date_before(today));

        SnapshotOutcomes {
            current: self.fetch_price_at(token_id, None).await,
            one_day_ago: self.fetch_price_at(token_id, past(Lookback::OneDay)).await,
            seven_days_ago: self.fetch_price_at(token_id, past(Lookback::SevenDays)).await,
            thirty_days_ago: self.fetch_price_at(token_id, past(Lookback::ThirtyDays)).await,
        }
    }

    pub async fn fetch_price_snapshot(&self, token_id: &str) -> PriceSnapshot {
        self.fetch_outcomes(token_id).await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
        time::Duration,
    };

    use error_stack::report;
    use tokio::time::Instant;

    use super::*;
    use crate::ports::price_source::PriceSourceError;

    type Answer = std::result::Result<Option<f64>, PriceSourceError>;

    /// Answers from a script, then with `fallback`. Records every call.
    struct ScriptedSource {
        script: Mutex<VecDeque<Answer>>,
        fallback: Answer,
        calls: Mutex<Vec<Option<NaiveDate>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Answer>, fallback: Answer) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn answer(&self, date: Option<NaiveDate>) -> error_stack::Result<Option<f64>, PriceSourceError> {
            self.calls.lock().unwrap().push(date);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
                .map_err(|e| report!(e))
        }

        fn calls(&self) -> Vec<Option<NaiveDate>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl PriceSource for ScriptedSource {
        async fn current_price(
            &self,
            _token_id: &str,
        ) -> error_stack::Result<Option<f64>, PriceSourceError> {
            self.answer(None)
        }

        async fn price_on(
            &self,
            _token_id: &str,
            date: NaiveDate,
        ) -> error_stack::Result<Option<f64>, PriceSourceError> {
            self.answer(Some(date))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn fetcher(source: Arc<ScriptedSource>, max_retries: u32) -> PriceHistoryFetcher {
        PriceHistoryFetcher::new(
            source,
            Arc::new(RateLimiter::new(Duration::from_millis(1500))),
            RetryPolicy { max_retries },
            365,
        )
        .with_today(today)
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_retention_makes_no_call() {
        let source = ScriptedSource::new(vec![], Ok(Some(1.0)));
        let fetcher = fetcher(source.clone(), 3);

        let old = today() - chrono::Days::new(366);
        assert_eq!(
            fetcher.fetch_price_at("ethereum", Some(old)).await,
            PriceOutcome::OutOfRetention
        );
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retention_boundary_is_inclusive() {
        let source = ScriptedSource::new(vec![], Ok(Some(1.0)));
        let fetcher = fetcher(source.clone(), 3);

        let edge = today() - chrono::Days::new(365);
        assert_eq!(
            fetcher.fetch_price_at("ethereum", Some(edge)).await,
            PriceOutcome::Found(1.0)
        );
        assert_eq!(source.calls(), vec![Some(edge)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let source = ScriptedSource::new(
            vec![
                Err(PriceSourceError::RequestError),
                Err(PriceSourceError::StatusError),
            ],
            Ok(Some(42.0)),
        );
        let fetcher = fetcher(source.clone(), 3);
        let start = Instant::now();

        assert_eq!(
            fetcher.fetch_price_at("ethereum", None).await,
            PriceOutcome::Found(42.0)
        );
        assert_eq!(source.calls().len(), 3);
        // Attempts are spaced by the limiter interval
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let source = ScriptedSource::new(vec![], Err(PriceSourceError::RequestError));
        let fetcher = fetcher(source.clone(), 4);

        assert_eq!(
            fetcher.fetch_price_at("ethereum", Some(today())).await,
            PriceOutcome::TransportError
        );
        assert_eq!(source.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_data_is_not_retried() {
        let source = ScriptedSource::new(vec![Ok(None)], Ok(Some(1.0)));
        let fetcher = fetcher(source.clone(), 3);

        assert_eq!(
            fetcher.fetch_price_at("ethereum", Some(today())).await,
            PriceOutcome::NoData
        );
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_dates() {
        let source = ScriptedSource::new(
            vec![Ok(Some(2.0)), Ok(Some(1.0)), Ok(None), Ok(Some(4.0))],
            Ok(None),
        );
        let fetcher = fetcher(source.clone(), 3);

        let snapshot = fetcher.fetch_price_snapshot("ethereum").await;

        assert_eq!(
            snapshot,
            PriceSnapshot {
                current: Some(2.0),
                one_day_ago: Some(1.0),
                seven_days_ago: None,
                thirty_days_ago: Some(4.0),
            }
        );
        assert_eq!(
            source.calls(),
            vec![
                None,
                NaiveDate::from_ymd_opt(2024, 6, 14),
                NaiveDate::from_ymd_opt(2024, 6, 8),
                NaiveDate::from_ymd_opt(2024, 5, 16),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_degraded_snapshot() {
        let source = ScriptedSource::new(
            vec![Err(PriceSourceError::DataFormatError)],
            Ok(Some(3.0)),
        );
        let fetcher = fetcher(source.clone(), 1);

        let outcomes = fetcher.fetch_outcomes("ethereum").await;

        assert_eq!(outcomes.current, PriceOutcome::TransportError);
        assert!(outcomes.is_degraded());
        assert_eq!(outcomes.snapshot().current, None);
        assert_eq!(outcomes.snapshot().one_day_ago, Some(3.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_token_id_skips_lookups() {
        let source = ScriptedSource::new(vec![], Ok(Some(1.0)));
        let fetcher = fetcher(source.clone(), 3);

        let outcomes = fetcher.fetch_outcomes("  ").await;

        assert_eq!(outcomes.snapshot(), PriceSnapshot::default());
        assert!(!outcomes.is_degraded());
        assert!(source.calls().is_empty());
    }

    #[test]
    fn test_retry_policy_attempts() {
        assert_eq!(RetryPolicy { max_retries: 3 }.attempts(), 3);
        assert_eq!(RetryPolicy { max_retries: 0 }.attempts(), 1);
    }
}
