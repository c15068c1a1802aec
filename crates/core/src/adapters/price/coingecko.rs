use std::collections::HashMap;

use chrono::NaiveDate;
use error_stack::{Report, Result, ResultExt};

use crate::{
    adapters::{config::price_config::CoingeckoConfig, http},
    ports::price_source::{PriceSourceError, PriceSource},
};

const API_KEY_HEADER: &str = "X-CoinGecko-Api-Key";

/// `{ "<id>": { "<vs_currency>": price } }`
#[derive(Debug, serde::Deserialize)]
pub struct SimplePriceResponse(pub HashMap<String, HashMap<String, Option<f64>>>);

#[derive(Debug, serde::Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: HashMap<String, Option<f64>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub market_data: Option<MarketData>,
}

impl SimplePriceResponse {
    pub fn price(&self, token_id: &str, vs_currency: &str) -> Option<f64> {
        self.0
            .get(token_id)
            .and_then(|prices| prices.get(vs_currency).copied().flatten())
    }
}

impl HistoryResponse {
    pub fn price(&self, vs_currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|data| data.current_price.get(vs_currency).copied().flatten())
    }
}

pub struct CoinGeckoApi {
    client: reqwest::Client,
    config: CoingeckoConfig,
    api_key: Option<String>,
}

impl CoinGeckoApi {
    pub fn new(client: reqwest::Client, config: CoingeckoConfig) -> Self {
        let api_key = config.api_key();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set, CoinGecko requests are unauthenticated",
                config.api_key_env
            );
        }

        Self {
            client,
            config,
            api_key,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

fn to_price_error(report: Report<http::HttpError>) -> Report<PriceSourceError> {
    let context = match report.current_context() {
        http::HttpError::StatusError => PriceSourceError::StatusError,
        http::HttpError::DataFormatError => PriceSourceError::DataFormatError,
        http::HttpError::ClientError | http::HttpError::RequestError => {
            PriceSourceError::RequestError
        }
    };
    report.change_context(context)
}

/// Day-month-year, the only date shape the history endpoint accepts.
pub fn history_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[async_trait::async_trait]
impl PriceSource for CoinGeckoApi {
    #[tracing::instrument(skip(self))]
    async fn current_price(&self, token_id: &str) -> Result<Option<f64>, PriceSourceError> {
        let url = format!("{}/simple/price", self.base_url());
        let vs_currency = self.config.vs_currency.as_ref();

        let resp: SimplePriceResponse = http::send_and_deserialize(
            self.get(&url)
                .query(&[("ids", token_id), ("vs_currencies", vs_currency)]),
        )
        .await
        .map_err(to_price_error)
        .attach_printable_lazy(|| format!("Token: {token_id}"))?;

        Ok(resp.price(token_id, vs_currency))
    }

    #[tracing::instrument(skip(self))]
    async fn price_on(
        &self,
        token_id: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, PriceSourceError> {
        let url = format!("{}/coins/{token_id}/history", self.base_url());
        let date = history_date(date);

        let resp: HistoryResponse = http::send_and_deserialize(
            self.get(&url)
                .query(&[("date", date.as_str()), ("localization", "false")]),
        )
        .await
        .map_err(to_price_error)
        .attach_printable_lazy(|| format!("Token: {token_id}, date: {date}"))?;

        Ok(resp.price(&self.config.vs_currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_price() {
        let resp: SimplePriceResponse =
            http::parse_json(r#"{ "ethereum": { "usd": 3150.42 } }"#).unwrap();
        assert_eq!(resp.price("ethereum", "usd"), Some(3150.42));
        assert_eq!(resp.price("bitcoin", "usd"), None);
        assert_eq!(resp.price("ethereum", "eur"), None);
    }

    #[test]
    fn test_simple_price_unknown_id() {
        let resp: SimplePriceResponse = http::parse_json("{}").unwrap();
        assert_eq!(resp.price("not-a-coin", "usd"), None);
    }

    #[test]
    fn test_history_price() {
        let resp: HistoryResponse = http::parse_json(
            r#"{
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum",
                "market_data": {
                    "current_price": { "usd": 2999.5, "eur": 2750.1 },
                    "market_cap": { "usd": 1.0 }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(resp.price("usd"), Some(2999.5));
    }

    #[test]
    fn test_history_without_market_data() {
        let resp: HistoryResponse =
            http::parse_json(r#"{ "id": "tiny-coin", "symbol": "tiny", "name": "Tiny" }"#).unwrap();
        assert_eq!(resp.price("usd"), None);
    }

    #[test]
    fn test_history_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(history_date(date), "07-03-2024");
    }

    #[test]
    fn test_error_mapping() {
        let report = to_price_error(error_stack::report!(http::HttpError::StatusError));
        assert_eq!(report.current_context(), &PriceSourceError::StatusError);

        let report = to_price_error(error_stack::report!(http::HttpError::RequestError));
        assert_eq!(report.current_context(), &PriceSourceError::RequestError);
    }
}
