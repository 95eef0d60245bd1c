use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_upload_per_min: u32,
    pub rate_query_per_min: u32,

    /// Upper bound on uploaded spreadsheet size, in bytes
    pub max_upload_bytes: usize,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_upload_per_min: env::var("RATE_UPLOAD_PER_MIN")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap(),
            rate_query_per_min: env::var("RATE_QUERY_PER_MIN")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap(),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string()) // default 10 MiB
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
