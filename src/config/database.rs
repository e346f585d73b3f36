//! Database configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// PostgreSQL connection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string (postgresql://...).
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::invalid_value(
                "database.url",
                "must be a postgresql:// connection string",
            ));
        }
        if self.max_connections == 0 {
            return Err(ValidationError::invalid_value(
                "database.max_connections",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_url_passes() {
        let config = DatabaseConfig {
            url: "postgresql://app@localhost/beatstack".to_string(),
            max_connections: 10,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_url_fails() {
        assert!(DatabaseConfig::default().validate().is_err());
    }

    #[test]
    fn non_postgres_url_fails() {
        let config = DatabaseConfig {
            url: "mysql://localhost".to_string(),
            max_connections: 10,
        };
        assert!(config.validate().is_err());
    }
}
