use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub session_secret: String,
    pub smtp_sender: String,
    pub smtp_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_timeout_secs: u64,
    pub http_addr: String,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_request_timeout_secs: u64,
    pub secure_cookies: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;

        let session_secret =
            get_required("SESSION_SECRET").context("SESSION_SECRET is required")?;
        // the session layer builds its cookie signing key from this value,
        // and the key needs 64 bytes of material
        if session_secret.len() < 64 {
            return Err(anyhow!("SESSION_SECRET must be at least 64 bytes"));
        }

        let smtp_sender = get_required("SMTP_SENDER").context("SMTP_SENDER is required")?;
        let smtp_password = get_required("SMTP_PASSWORD").context("SMTP_PASSWORD is required")?;
        let smtp_host =
            std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_port: u16 = parse_env("SMTP_PORT", 465)?;
        let smtp_timeout_secs: u64 = parse_env("SMTP_TIMEOUT_SECS", 10)?;

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes: usize =
            parse_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_request_timeout_secs: u64 = parse_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;
        let secure_cookies: bool = parse_env("SECURE_COOKIES", false)?;

        for (key, value) in [
            ("SMTP_PORT", u64::from(smtp_port)),
            ("SMTP_TIMEOUT_SECS", smtp_timeout_secs),
            (
                "HTTP_REQUEST_BODY_LIMIT_BYTES",
                http_request_body_limit_bytes as u64,
            ),
            ("HTTP_REQUEST_TIMEOUT_SECS", http_request_timeout_secs),
        ] {
            if value == 0 {
                return Err(anyhow!("{key} must be > 0"));
            }
        }

        Ok(Self {
            database_url,
            session_secret,
            smtp_sender,
            smtp_password,
            smtp_host,
            smtp_port,
            smtp_timeout_secs,
            http_addr,
            log_level,
            http_request_body_limit_bytes,
            http_request_timeout_secs,
            secure_cookies,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("failed to parse {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
