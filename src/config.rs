use crate::error::{Error, Result};
use crate::services::session_service::DEFAULT_SESSION_TTL_MINUTES;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_RESULTS_PATH: &str = "quiz_results.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub results_path: PathBuf,
    pub public_rps: u32,
    pub shuffle_options: bool,
    pub session_ttl_minutes: i64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            gemini_api_key: get_env("GEMINI_API_KEY")?,
            gemini_model: get_env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: get_env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            results_path: PathBuf::from(get_env_or("RESULTS_PATH", DEFAULT_RESULTS_PATH)),
            public_rps: get_env_parse("PUBLIC_RPS")?,
            shuffle_options: match env::var("SHUFFLE_OPTIONS") {
                Ok(_) => get_env_parse("SHUFFLE_OPTIONS")?,
                Err(_) => false,
            },
            session_ttl_minutes: match env::var("SESSION_TTL_MINUTES") {
                Ok(_) => get_env_parse("SESSION_TTL_MINUTES")?,
                Err(_) => DEFAULT_SESSION_TTL_MINUTES,
            },
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
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
