use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub cache_db: String,
    pub cache_ttl_hours: i64,
    pub tickers: Vec<String>,
    /// Trailing window for monthly statistics; 0 means full history.
    pub years_to_analyze: u32,
    pub markdown_output: String,
    pub json_output: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://statusinvest.com.br/acao/companytickerprovents".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
            cache_db: "dividend_cache.db".to_string(),
            cache_ttl_hours: 24,
            tickers: [
                "BBSE3", "BBDC3", "BBAS3", "VIVT3", "SAPR11", "CMIG3", "ISAE3", "VALE3",
                "PETR4", "CMIN3",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            years_to_analyze: 3,
            markdown_output: "PREVISAO_DIVIDENDOS.md".to_string(),
            json_output: "dividendos_data.json".to_string(),
        }
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
