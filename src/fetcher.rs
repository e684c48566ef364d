use crate::config::AppConfig;
use crate::model::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of raw provent payloads, keyed by ticker.
#[async_trait]
pub trait ProventSource: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<Value, FetchError>;
}

pub struct StatusInvestClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl StatusInvestClient {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    fn build_url(&self, ticker: &str) -> String {
        format!("{}?ticker={}&chartProventsType=2", self.base_url, ticker)
    }
}

#[async_trait]
impl ProventSource for StatusInvestClient {
    /// Fetches the provent payload with bounded retries on transport errors
    /// and retryable statuses (429 and 5xx).
    async fn fetch(&self, ticker: &str) -> Result<Value, FetchError> {
        let url = self.build_url(ticker);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay).await;
                debug!(ticker, attempt, "retrying fetch");
            }

            match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<Value>().await.map_err(|e| FetchError::Http {
                            ticker: ticker.to_string(),
                            message: e.to_string(),
                        });
                    }
                    let error = FetchError::Status {
                        ticker: ticker.to_string(),
                        status: status.as_u16(),
                    };
                    if status.as_u16() == 429 || status.is_server_error() {
                        warn!(ticker, %status, "retryable status");
                        last_error = Some(error);
                        continue;
                    }
                    return Err(error);
                }
                Err(e) => {
                    warn!(ticker, error = %e, "request failed");
                    last_error = Some(FetchError::Http {
                        ticker: ticker.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::RetriesExhausted {
            ticker: ticker.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_provent_url() {
        let client = StatusInvestClient::new(&AppConfig::default()).unwrap();
        assert_eq!(
            client.build_url("BBAS3"),
            "https://statusinvest.com.br/acao/companytickerprovents?ticker=BBAS3&chartProventsType=2"
        );
    }
}
