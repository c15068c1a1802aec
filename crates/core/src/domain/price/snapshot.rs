use chrono::{Days, NaiveDate};

/// Result of a single price lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceOutcome {
    Found(f64),
    /// The provider answered but had no price for the requested date.
    NoData,
    /// The requested date is older than the provider keeps history for.
    OutOfRetention,
    /// Every attempt failed at the transport level.
    TransportError,
}

impl PriceOutcome {
    pub fn price(&self) -> Option<f64> {
        match self {
            PriceOutcome::Found(price) => Some(*price),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, PriceOutcome::TransportError)
    }
}

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    #[strum(serialize = "1d")]
    OneDay,
    #[strum(serialize = "7d")]
    SevenDays,
    #[strum(serialize = "30d")]
    ThirtyDays,
}

impl Lookback {
    pub fn days(&self) -> u64 {
        match self {
            Lookback::OneDay => 1,
            Lookback::SevenDays => 7,
            Lookback::ThirtyDays => 30,
        }
    }

    pub fn date_before(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.days()))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceSnapshot {
    pub current: Option<f64>,
    pub one_day_ago: Option<f64>,
    pub seven_days_ago: Option<f64>,
    pub thirty_days_ago: Option<f64>,
}

impl PriceSnapshot {
    pub fn past(&self, lookback: Lookback) -> Option<f64> {
        match lookback {
            Lookback::OneDay => self.one_day_ago,
            Lookback::SevenDays => self.seven_days_ago,
            Lookback::ThirtyDays => self.thirty_days_ago,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            Lookback::OneDay.date_before(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            Lookback::SevenDays.date_before(today),
            NaiveDate::from_ymd_opt(2024, 2, 23).unwrap()
        );
        assert_eq!(
            Lookback::ThirtyDays.date_before(today),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_snapshot_past_accessor() {
        let snapshot = PriceSnapshot {
            current: Some(4.0),
            one_day_ago: Some(1.0),
            seven_days_ago: None,
            thirty_days_ago: Some(3.0),
        };
        assert_eq!(snapshot.past(Lookback::OneDay), Some(1.0));
        assert_eq!(snapshot.past(Lookback::SevenDays), None);
        assert_eq!(snapshot.past(Lookback::ThirtyDays), Some(3.0));
    }

    #[test]
    fn test_outcome_price() {
        assert_eq!(PriceOutcome::Found(2.0).price(), Some(2.0));
        assert_eq!(PriceOutcome::NoData.price(), None);
        assert_eq!(PriceOutcome::OutOfRetention.price(), None);
        assert!(PriceOutcome::TransportError.is_degraded());
        assert!(!PriceOutcome::NoData.is_degraded());
    }
}
