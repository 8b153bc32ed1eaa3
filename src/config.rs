use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: String,
    pub model_name: String,
    pub model_base_url: String,
    pub min_request_delay_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_secs: u64,
    pub exit_keywords: Vec<String>,
    pub min_technical_questions: usize,
    pub max_technical_questions: usize,
    pub data_dir: PathBuf,
    pub message_cooldown_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub const DEFAULT_EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye", "goodbye", "end"];

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let exit_keywords = match env::var("EXIT_KEYWORDS") {
            Ok(raw) => parse_keyword_list(&raw),
            Err(_) => DEFAULT_EXIT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };

        let config = Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            openai_api_key: get_env("OPENAI_API_KEY")?,
            model_name: get_env_or("MODEL_NAME", "gpt-4o"),
            model_base_url: get_env_or("MODEL_BASE_URL", "https://api.openai.com/v1"),
            min_request_delay_secs: get_env_parse_or("MIN_REQUEST_DELAY_SECS", 6)?,
            max_retries: get_env_parse_or("MAX_RETRIES", 3)?,
            retry_backoff_secs: get_env_parse_or("RETRY_BACKOFF_SECS", 6)?,
            exit_keywords,
            min_technical_questions: get_env_parse_or("MIN_TECHNICAL_QUESTIONS", 3)?,
            max_technical_questions: get_env_parse_or("MAX_TECHNICAL_QUESTIONS", 5)?,
            data_dir: PathBuf::from(get_env_or("DATA_DIR", "data")),
            message_cooldown_secs: get_env_parse_or("MESSAGE_COOLDOWN_SECS", 5)?,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(Error::Config("MAX_RETRIES must be at least 1".to_string()));
        }
        if self.min_technical_questions > self.max_technical_questions {
            return Err(Error::Config(format!(
                "MIN_TECHNICAL_QUESTIONS ({}) exceeds MAX_TECHNICAL_QUESTIONS ({})",
                self.min_technical_questions, self.max_technical_questions
            )));
        }
        if self.exit_keywords.is_empty() {
            return Err(Error::Config("EXIT_KEYWORDS must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Lowercased, trimmed, comma-separated keywords; blanks dropped.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_list_is_normalized() {
        assert_eq!(
            parse_keyword_list(" Exit, QUIT ,,bye "),
            vec!["exit".to_string(), "quit".to_string(), "bye".to_string()]
        );
    }
}
