use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    pub auth_service_url: String,
    pub storage_service_url: String,
    pub storage_bucket: String,
    pub listings_service_url: String,
    pub api_key: String,
    pub session_poll_seconds: u64,
}

pub fn create_test_config() -> Config {
    Config {
        auth_service_url: "http://localhost:9099".to_string(),
        storage_service_url: "http://localhost:9199".to_string(),
        storage_bucket: "homelist-test".to_string(),
        listings_service_url: "http://localhost:8080".to_string(),
        api_key: "xxx".to_string(),
        session_poll_seconds: 60,
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
