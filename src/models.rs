use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Currencies reported for every requested day.
pub const DEFAULT_CURRENCIES: [&str; 2] = ["USD", "EUR"];

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 10;

/// Sent back (and audited) when the day count is missing a valid value.
pub const INVALID_DAYS_MESSAGE: &str = "Ошибка: количество дней должно быть от 1 до 10.";

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Formats a date the way the upstream API and the response keys expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Number of days requested by an `exchange` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount(u8);

impl DayCount {
    /// Parses the optional argument of the command. A missing argument means one day;
    /// anything that is not an integer in range is rejected.
    pub fn parse(arg: Option<&str>) -> Option<Self> {
        let days = match arg {
            None => MIN_DAYS,
            Some(raw) => raw.parse::<i64>().ok()?,
        };

        if (MIN_DAYS..=MAX_DAYS).contains(&days) {
            Some(DayCount(days as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// `today`, `today - 1`, ... newest first.
    pub fn dates(self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..self.0 as i64)
            .map(|offset| today - Duration::days(offset))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub sale: Option<f64>,
    pub purchase: Option<f64>,
}

/// One slot of the aggregate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DailyResult {
    Failed { error: String },
    Rates(IndexMap<String, IndexMap<String, RateEntry>>),
}

impl DailyResult {
    pub fn rates(date: NaiveDate, entries: IndexMap<String, RateEntry>) -> Self {
        let mut day = IndexMap::with_capacity(1);
        day.insert(format_date(date), entries);
        DailyResult::Rates(day)
    }

    pub fn failed(error: impl Into<String>) -> Self {
        DailyResult::Failed {
            error: error.into(),
        }
    }
}

/// Body of a successful `exchange_rates` call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRates {
    #[serde(default)]
    pub exchange_rate: Vec<UpstreamRate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamRate {
    pub currency: Option<String>,
    pub sale_rate: Option<f64>,
    pub purchase_rate: Option<f64>,
}

impl ExchangeRates {
    /// Keeps only the requested currencies, in upstream order.
    pub fn filter(self, currencies: &[&str]) -> IndexMap<String, RateEntry> {
        self.exchange_rate
            .into_iter()
            .filter_map(|rate| {
                let currency = rate.currency?;
                if !currencies.contains(&currency.as_str()) {
                    return None;
                }
                let entry = RateEntry {
                    sale: rate.sale_rate,
                    purchase: rate.purchase_rate,
                };
                Some((currency, entry))
            })
            .collect()
    }
}
