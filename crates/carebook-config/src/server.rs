use std::env;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_port(env::var("APP_PORT").ok().as_deref()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    match raw.map(str::parse::<u16>) {
        Some(Ok(port)) => port,
        Some(Err(_)) => {
            warn!(
                "failed to parse APP_PORT, defaulting to {}",
                DEFAULT_PORT
            );
            DEFAULT_PORT
        }
        None => DEFAULT_PORT,
    }
}
