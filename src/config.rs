use anyhow::Result;
use chrono::NaiveTime;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Start of the organizational operating window (turnos must fit inside it).
    pub hora_abertura: NaiveTime,
    /// End of the organizational operating window.
    pub hora_fechamento: NaiveTime,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/calendario".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "troque-este-segredo-em-producao-0987654321".to_string()
            }),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            hora_abertura: parse_hora("CALENDARIO_ABERTURA", "08:00"),
            hora_fechamento: parse_hora("CALENDARIO_FECHAMENTO", "18:00"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_hora(var: &str, default: &str) -> NaiveTime {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
        log::warn!("Invalid {} value {:?}, falling back to {}", var, raw, default);
        NaiveTime::parse_from_str(default, "%H:%M").unwrap()
    })
}
