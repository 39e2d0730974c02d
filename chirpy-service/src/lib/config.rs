use std::env;

use auth::AuthConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Platform name under which destructive admin endpoints are enabled.
pub const DEV_PLATFORM: &str = "dev";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub polka: PolkaConfig,
    pub platform: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub filepath_root: String,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Settings for the Polka payment provider webhooks.
#[derive(Deserialize, Clone)]
pub struct PolkaConfig {
    pub key: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for PolkaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolkaConfig").finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, POLKA__KEY, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must be set".to_string()));
        }
        if self.polka.key.is_empty() {
            return Err(ConfigError::Message("polka.key must be set".to_string()));
        }
        Ok(())
    }

    /// Secrets and lifetimes for the authentication core.
    pub fn auth(&self) -> AuthConfig {
        AuthConfig::new(self.jwt.secret.clone(), self.polka.key.clone())
    }

    pub fn is_dev_platform(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, key: &str) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/chirpy".to_string(),
            },
            server: ServerConfig {
                http_port: 8080,
                filepath_root: "static".to_string(),
            },
            jwt: JwtConfig {
                secret: secret.to_string(),
            },
            polka: PolkaConfig {
                key: key.to_string(),
            },
            platform: "production".to_string(),
        }
    }

    #[test]
    fn test_environment_overrides_files() {
        env::set_var("RUN_MODE", "production");
        env::set_var("JWT__SECRET", "secret-from-environment-at-least-32-bytes");
        env::set_var("POLKA__KEY", "polka-key-from-environment");
        env::set_var("PLATFORM", "dev");
        env::set_var("SERVER__HTTP_PORT", "9191");

        let loaded = Config::load();

        for var in ["RUN_MODE", "JWT__SECRET", "POLKA__KEY", "PLATFORM", "SERVER__HTTP_PORT"] {
            env::remove_var(var);
        }

        let loaded = loaded.unwrap();
        assert_eq!(loaded.jwt.secret, "secret-from-environment-at-least-32-bytes");
        assert_eq!(loaded.polka.key, "polka-key-from-environment");
        assert_eq!(loaded.server.http_port, 9191);
        assert_eq!(loaded.server.filepath_root, "static");
        assert!(loaded.is_dev_platform());
    }

    #[test]
    fn test_validate_rejects_missing_secrets() {
        assert!(config("", "key").validate().is_err());
        assert!(config("secret", "").validate().is_err());
        assert!(config("secret", "key").validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", config("jwt-signing-secret", "polka-api-key"));

        assert!(!rendered.contains("jwt-signing-secret"));
        assert!(!rendered.contains("polka-api-key"));
    }
}
