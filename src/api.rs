use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{format_date, DailyResult, ExchangeRates};

pub const PRIVATBANK_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Source of daily exchange rates. Implementations must tolerate concurrent calls.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Rates for `date` restricted to `currencies`. An HTTP error status is a
    /// normal result; only transport and decoding failures are errors.
    async fn fetch(&self, date: NaiveDate, currencies: &[&str]) -> Result<DailyResult, FetchError>;
}

/// PrivatBank archive rates (`exchange_rates?date=dd.mm.yyyy`).
#[derive(Debug, Clone)]
pub struct PrivatBankApi {
    client: Client,
    base_url: String,
}

impl PrivatBankApi {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl RateSource for PrivatBankApi {
    async fn fetch(&self, date: NaiveDate, currencies: &[&str]) -> Result<DailyResult, FetchError> {
        let formatted = format_date(date);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("date", formatted.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let rates: ExchangeRates = response.json().await?;
                debug!(date = %formatted, records = rates.exchange_rate.len(), "rates received");
                Ok(DailyResult::rates(date, rates.filter(currencies)))
            }
            status => {
                debug!(date = %formatted, status = status.as_u16(), "upstream returned error status");
                Ok(DailyResult::failed(format!("HTTP Error {}", status.as_u16())))
            }
        }
    }
}
