use chrono::{Local, NaiveDate};
use futures_util::{future::join_all, Sink, SinkExt};
use std::{fmt::Display, sync::Arc};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::api::RateSource;
use crate::audit::AuditLog;
use crate::config::FaultPolicy;
use crate::error::HandlerError;
use crate::models::{format_date, DailyResult, DayCount, DEFAULT_CURRENCIES, INVALID_DAYS_MESSAGE};

pub const COMMAND: &str = "exchange";

/// What gets sent back to the client and what goes into the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub audit: String,
}

impl Reply {
    fn invalid_days() -> Self {
        Reply {
            text: INVALID_DAYS_MESSAGE.to_string(),
            audit: INVALID_DAYS_MESSAGE.to_string(),
        }
    }
}

pub struct ExchangeHandler {
    source: Arc<dyn RateSource>,
    audit: Arc<AuditLog>,
    on_fault: FaultPolicy,
}

impl ExchangeHandler {
    pub fn new(source: Arc<dyn RateSource>, audit: Arc<AuditLog>) -> Self {
        Self {
            source,
            audit,
            on_fault: FaultPolicy::default(),
        }
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.on_fault = policy;
        self
    }

    /// Answers one client message on `conn`. Messages that are not an `exchange`
    /// command get no response and no audit entry.
    pub async fn handle<S>(&self, message: &str, conn: &mut S) -> Result<(), HandlerError>
    where
        S: Sink<Message> + Unpin,
        S::Error: Display,
    {
        let today = Local::now().date_naive();
        let Some(reply) = self.respond(message, today).await? else {
            return Ok(());
        };

        conn.send(Message::Text(reply.text.into()))
            .await
            .map_err(|e| HandlerError::Send(e.to_string()))?;
        self.audit.append(&reply.audit).await?;
        Ok(())
    }

    /// Builds the reply for `message` as of `today` without touching the
    /// connection or the audit log.
    pub async fn respond(&self, message: &str, today: NaiveDate) -> Result<Option<Reply>, HandlerError> {
        let mut tokens = message.split_whitespace();
        if tokens.next() != Some(COMMAND) {
            return Ok(None);
        }

        let arg = tokens.next();
        let Some(days) = DayCount::parse(arg) else {
            debug!(arg = ?arg, "rejected day count");
            return Ok(Some(Reply::invalid_days()));
        };

        let results = self.fetch_all(days, today).await?;
        let text = serde_json::to_string_pretty(&results)?;
        let audit = format!("{} {}: {}", COMMAND, days.get(), text);
        Ok(Some(Reply { text, audit }))
    }

    /// Issues every lookup before awaiting any; results keep date order.
    async fn fetch_all(&self, days: DayCount, today: NaiveDate) -> Result<Vec<DailyResult>, HandlerError> {
        let currencies: &[&str] = &DEFAULT_CURRENCIES;
        let dates = days.dates(today);
        let lookups = dates
            .iter()
            .map(|&date| self.source.fetch(date, currencies));
        let outcomes = join_all(lookups).await;

        dates
            .into_iter()
            .zip(outcomes)
            .map(|(date, outcome)| match outcome {
                Ok(result) => Ok(result),
                Err(source) => {
                    let date = format_date(date);
                    match self.on_fault {
                        FaultPolicy::Placeholder => {
                            warn!(date = %date, error = %source, "rate lookup failed, answering with placeholder");
                            Ok(DailyResult::failed(format!("Request Error: {}", source)))
                        }
                        FaultPolicy::Abort => Err(HandlerError::Fetch { date, source }),
                    }
                }
            })
            .collect()
    }
}
