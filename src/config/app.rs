use anyhow::{bail, Result};
use std::env;

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub upload_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        Ok(AppConfig {
            host,
            port,
            environment,
            jwt_secret,
            upload_dir,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// The development fallback secret must never sign production tokens
    pub fn validate(&self) -> Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            bail!("JWT_SECRET must be set explicitly in production");
        }
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, jwt_secret: &str) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: environment.to_string(),
            jwt_secret: jwt_secret.to_string(),
            upload_dir: "uploads".to_string(),
        }
    }

    #[test]
    fn test_default_jwt_secret_rejected_in_production() {
        assert!(config("production", DEV_JWT_SECRET).validate().is_err());
        assert!(config("production", "an-actual-secret").validate().is_ok());
        assert!(config("development", DEV_JWT_SECRET).validate().is_ok());
    }
}
