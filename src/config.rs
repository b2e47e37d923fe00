use std::env;

/// Server configuration, read from the environment with local-dev defaults.
pub struct Config {
    pub bind_addr: String,
    pub mongodb_uri: String,
    pub database: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("STAMPBID_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string()),
            database: env::var("STAMPBID_DB").unwrap_or_else(|_| "stampbid".to_string()),
        }
    }
}
