use crate::error::AppError;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub region: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").map_err(|_| {
            AppError::ConfigError(
                "RIOT_API_KEY not found in environment or .env file".to_string(),
            )
        })?;

        let region = env::var("RIOT_REGION").unwrap_or_else(|_| "na1".to_string());

        let db_path = match env::var("LOLSCOUT_DB") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_db_path(),
        };

        Ok(Config {
            api_key,
            region,
            db_path,
        })
    }
}

pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lolscout")
        .join("lolscout.json")
}
