use std::env;

/// Immutable process configuration, built once in `main` and carried in
/// the application state. Business logic never reads the environment.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub admin_key: String,
    pub bind_addr: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/rsvps.db?mode=rwc".into());
        let admin_key = env::var("ADMIN_KEY").expect("ADMIN_KEY is not set in .env file");
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "debug".into());

        Ok(Self {
            database_url,
            admin_key,
            bind_addr,
            rust_log,
        })
    }
}
