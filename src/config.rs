use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub cors_allow: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = match std::env::var("HOST") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid HOST: {}", raw))?,
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid PORT: {}", raw))?,
            Err(_) => 3001,
        };
        let db_path = std::env::var("DB_FILE")
            .unwrap_or_else(|_| "db.json".to_string())
            .into();
        let cors_allow = parse_origins(
            &std::env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            db_path,
            cors_allow,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
